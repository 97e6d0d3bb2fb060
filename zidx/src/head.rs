//! Fixed 128-byte artifact header
//! 固定 128 字节工件头

use zerocopy::{
  FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
  little_endian::{U32, U64},
};

use crate::{Error, Result};

/// ASCII magic, at most 19 bytes.
/// ASCII 魔数，最长 19 字节。
pub const MAGIC: &[u8] = b"zidx-composite";

/// Current artifact version.
/// 当前工件版本。
pub const VERSION: u32 = 1;

/// Artifact header, 128 bytes little-endian.
/// 工件头，128 字节小端。
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct IndexHeader {
  pub magic_len: u8,
  pub magic: [u8; 19],
  pub class_name: [u8; 60],

  pub reserved_80: U32,
  pub header_size: U32,
  pub version: U32,
  pub reserved_92: U32,

  pub file_size: U64,
  pub reserved_104: [u8; 24],
}

impl IndexHeader {
  pub const SIZE: usize = size_of::<Self>();

  pub fn new(class_name: &str, file_size: u64) -> Self {
    debug_assert!(class_name.len() < 60);
    let mut magic = [0u8; 19];
    magic[..MAGIC.len()].copy_from_slice(MAGIC);
    let mut class = [0u8; 60];
    class[..class_name.len()].copy_from_slice(class_name.as_bytes());
    Self {
      magic_len: MAGIC.len() as u8,
      magic,
      class_name: class,
      reserved_80: 0.into(),
      header_size: (Self::SIZE as u32).into(),
      version: VERSION.into(),
      reserved_92: 0.into(),
      file_size: file_size.into(),
      reserved_104: [0u8; 24],
    }
  }

  /// Validate magic and sizes, return the NUL-trimmed class name.
  /// 校验魔数与尺寸，返回去除 NUL 的类名。
  pub fn check(&self, mem_len: usize) -> Result<&str> {
    let mlen = self.magic_len as usize;
    if mlen != MAGIC.len() || &self.magic[..mlen] != MAGIC {
      return Err(Error::BadMagic);
    }
    if self.header_size.get() as usize != Self::SIZE {
      return Err(Error::Corrupt("header size mismatch"));
    }
    let file_size = self.file_size.get() as usize;
    if file_size > mem_len {
      return Err(Error::Truncated {
        need: file_size,
        have: mem_len,
      });
    }
    let end = self.class_name.iter().position(|&b| b == 0).unwrap_or(60);
    std::str::from_utf8(&self.class_name[..end]).map_err(|_| Error::Corrupt("class name not ascii"))
  }
}

const _: () = assert!(IndexHeader::SIZE == 128);
