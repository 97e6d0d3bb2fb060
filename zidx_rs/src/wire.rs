//! Wire sections for the succinct structures
//! 简洁结构的线上段格式
//!
//! Every structure serializes as a fixed zerocopy head followed by an
//! 8-byte aligned payload, so a reader can walk a concatenation of
//! sections zero-copy.
//! 每个结构序列化为固定的 zerocopy 头加 8 字节对齐的载荷，读取方可以
//! 零拷贝地顺序遍历多个段。

use zerocopy::{
  FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
  little_endian::{U32, U64},
};

use crate::{Error, Result, Words};

/// Head of a dense bit-sequence section.
/// 稠密位序列段头。
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct BitsHead {
  /// Length in bits
  pub bits: U64,
  /// Count of ones
  pub ones: U64,
  /// Payload length in 64-bit words
  pub words: U64,
}

impl BitsHead {
  pub const SIZE: usize = size_of::<Self>();
}

const _: () = assert!(BitsHead::SIZE == 24);

/// Head of a sparse position-list section.
/// 稀疏位置列表段头。
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct SparseHead {
  /// Length in bits
  pub bits: U64,
  /// Count of stored positions
  pub count: U64,
}

impl SparseHead {
  pub const SIZE: usize = size_of::<Self>();
}

const _: () = assert!(SparseHead::SIZE == 16);

/// Head of a packed fixed-width integer section.
/// 定宽压缩整数段头。
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct PackedHead {
  /// Element count
  pub len: U64,
  /// Bits per element
  pub width: U32,
  pub reserved: U32,
  /// Payload length in 64-bit words
  pub words: U64,
}

impl PackedHead {
  pub const SIZE: usize = size_of::<Self>();
}

const _: () = assert!(PackedHead::SIZE == 24);

/// Round `n` up to a multiple of 8.
/// 将 `n` 向上取整到 8 的倍数。
#[inline]
pub fn align8(n: usize) -> usize {
  (n + 7) & !7
}

/// Write zero padding up to an 8-byte boundary.
/// 写入零填充直到 8 字节边界。
pub fn pad8(w: &mut impl std::io::Write, written: usize) -> std::io::Result<usize> {
  let pad = align8(written) - written;
  if pad > 0 {
    w.write_all(&[0u8; 8][..pad])?;
  }
  Ok(pad)
}

/// Split a typed head off the front of `mem`.
/// 从 `mem` 头部切出一个类型化段头。
pub fn take_head<T: FromBytes + KnownLayout + Immutable + Unaligned>(mem: &[u8]) -> Result<(&T, &[u8])> {
  T::ref_from_prefix(mem).map_err(|_| Error::Truncated {
    need: size_of::<T>(),
    have: mem.len(),
  })
}

/// Split `words` little-endian u64 words off the front of `mem`.
/// 从 `mem` 头部切出 `words` 个小端 u64 字。
pub fn take_words(mem: &[u8], words: usize) -> Result<(Words<'_>, &[u8])> {
  let need = words * 8;
  if mem.len() < need {
    return Err(Error::Truncated { need, have: mem.len() });
  }
  let (raw, rest) = mem.split_at(need);
  let slice = <[zerocopy::little_endian::U64]>::ref_from_bytes(raw).map_err(|_| Error::InvalidHead)?;
  Ok((Words::Loaded(slice), rest))
}

/// Split `len` raw bytes plus padding to 8 off the front of `mem`.
/// 从 `mem` 头部切出 `len` 字节及其补齐填充。
pub fn take_bytes(mem: &[u8], len: usize) -> Result<(&[u8], &[u8])> {
  let need = align8(len);
  if mem.len() < need {
    return Err(Error::Truncated { need, have: mem.len() });
  }
  Ok((&mem[..len], &mem[need..]))
}
