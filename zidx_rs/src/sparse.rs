//! Sparse rank/select over minority-position lists
//! 基于少数位位置列表的稀疏 rank/select
//!
//! When one bit value is rare the whole sequence is represented by the
//! sorted positions of that value: `FewOne` stores the ones, `FewZero` the
//! zeros, in 32- or 64-bit entries. Rank is a `partition_point`, select of
//! the minority bit is an array read, select of the majority bit is an
//! arithmetic binary search.
//! 当某一位值稀少时，整个序列用该值的有序位置列表表示：`FewOne` 存 1 的
//! 位置，`FewZero` 存 0 的位置，条目为 32 或 64 位。rank 即
//! `partition_point`；少数位的 select 是一次数组读取，多数位的 select 是
//! 算术二分查找。

use std::io::Write;

use zerocopy::{
  FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
  little_endian::{U32, U64},
};

use crate::{
  Error, RankSelect, Result,
  wire::{SparseHead, align8, pad8, take_head},
};

/// Position word of a sparse list.
/// 稀疏列表的位置字。
pub trait Word: Copy + Ord + std::fmt::Debug + 'static {
  type Le: Copy + std::fmt::Debug + FromBytes + IntoBytes + Immutable + KnownLayout + Unaligned + 'static;
  const BYTES: usize;

  fn to_usize(self) -> usize;
  fn from_usize(v: usize) -> Self;
  fn le_to_usize(le: Self::Le) -> usize;
  fn write_le(self, w: &mut impl Write) -> std::io::Result<()>;
}

impl Word for u32 {
  type Le = U32;
  const BYTES: usize = 4;

  #[inline]
  fn to_usize(self) -> usize {
    self as usize
  }

  #[inline]
  fn from_usize(v: usize) -> Self {
    v as u32
  }

  #[inline]
  fn le_to_usize(le: U32) -> usize {
    le.get() as usize
  }

  fn write_le(self, w: &mut impl Write) -> std::io::Result<()> {
    w.write_all(&self.to_le_bytes())
  }
}

impl Word for u64 {
  type Le = U64;
  const BYTES: usize = 8;

  #[inline]
  fn to_usize(self) -> usize {
    self as usize
  }

  #[inline]
  fn from_usize(v: usize) -> Self {
    v as u64
  }

  #[inline]
  fn le_to_usize(le: U64) -> usize {
    le.get() as usize
  }

  fn write_le(self, w: &mut impl Write) -> std::io::Result<()> {
    w.write_all(&self.to_le_bytes())
  }
}

#[derive(Debug, Clone)]
enum List<'a, W: Word> {
  Owned(Vec<W>),
  Loaded(&'a [W::Le]),
}

impl<W: Word> List<'_, W> {
  #[inline]
  fn len(&self) -> usize {
    match self {
      List::Owned(v) => v.len(),
      List::Loaded(s) => s.len(),
    }
  }

  #[inline]
  fn get(&self, i: usize) -> usize {
    match self {
      List::Owned(v) => v[i].to_usize(),
      List::Loaded(s) => W::le_to_usize(s[i]),
    }
  }
}

/// Shared core: sorted positions of the minority bit.
/// 共享核心：少数位的有序位置。
#[derive(Debug, Clone)]
struct Sparse<'a, W: Word> {
  list: List<'a, W>,
  bits: usize,
}

impl<W: Word> Sparse<'_, W> {
  fn build(positions: &[usize], bits: usize) -> Sparse<'static, W> {
    debug_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    Sparse {
      list: List::Owned(positions.iter().map(|&p| W::from_usize(p)).collect()),
      bits,
    }
  }

  /// Count of stored positions < `pos`.
  /// 小于 `pos` 的已存位置数。
  fn rank(&self, pos: usize) -> usize {
    let mut lo = 0;
    let mut hi = self.list.len();
    while lo < hi {
      let mid = lo + (hi - lo) / 2;
      if self.list.get(mid) < pos { lo = mid + 1 } else { hi = mid }
    }
    lo
  }

  #[inline]
  fn contains(&self, pos: usize) -> bool {
    let i = self.rank(pos);
    i < self.list.len() && self.list.get(i) == pos
  }

  /// Position of the k-th minority bit.
  /// 第 k 个少数位的位置。
  #[inline]
  fn select_minority(&self, k: usize) -> usize {
    self.list.get(k)
  }

  /// Position of the k-th majority bit: `k + j` for the smallest `j` with
  /// `list[j] - j > k`.
  /// 第 k 个多数位的位置：取最小的 `j` 使 `list[j] - j > k`，结果为 `k + j`。
  fn select_majority(&self, k: usize) -> usize {
    let mut lo = 0;
    let mut hi = self.list.len();
    while lo < hi {
      let mid = lo + (hi - lo) / 2;
      if self.list.get(mid) - mid <= k { lo = mid + 1 } else { hi = mid }
    }
    k + lo
  }

  /// Run of minority bits starting at `pos`.
  /// 从 `pos` 开始的少数位游程。
  fn run_len(&self, pos: usize) -> usize {
    let i = self.rank(pos);
    let mut c = 0;
    while i + c < self.list.len() && self.list.get(i + c) == pos + c {
      c += 1;
    }
    c
  }

  /// Run of minority bits ending just before `pos`.
  /// 在 `pos` 之前结束的少数位游程。
  fn run_revlen(&self, pos: usize) -> usize {
    let i = self.rank(pos);
    let mut c = 0;
    while i > c && self.list.get(i - c - 1) == pos - c - 1 {
      c += 1;
    }
    c
  }

  /// Run of majority bits starting at `pos`.
  /// 从 `pos` 开始的多数位游程。
  fn gap_len(&self, pos: usize) -> usize {
    if pos >= self.bits {
      return 0;
    }
    let i = self.rank(pos);
    if i < self.list.len() {
      let next = self.list.get(i);
      if next == pos { 0 } else { next - pos }
    } else {
      self.bits - pos
    }
  }

  /// Run of majority bits ending just before `pos`.
  /// 在 `pos` 之前结束的多数位游程。
  fn gap_revlen(&self, pos: usize) -> usize {
    let i = self.rank(pos);
    if i == 0 { pos } else { pos - self.list.get(i - 1) - 1 }
  }

  fn save(&self, w: &mut impl Write) -> Result<usize> {
    let head = SparseHead {
      bits: (self.bits as u64).into(),
      count: (self.list.len() as u64).into(),
    };
    w.write_all(head.as_bytes())?;
    match &self.list {
      List::Owned(v) => {
        for &x in v {
          x.write_le(w)?;
        }
      }
      List::Loaded(s) => {
        w.write_all(s.as_bytes())?;
      }
    }
    let body = self.list.len() * W::BYTES;
    let pad = pad8(w, body)?;
    Ok(SparseHead::SIZE + body + pad)
  }

  fn load(mem: &[u8]) -> Result<(Sparse<'_, W>, usize)> {
    let (head, rest) = take_head::<SparseHead>(mem)?;
    let count = head.count.get() as usize;
    let body = count * W::BYTES;
    if rest.len() < align8(body) {
      return Err(Error::Truncated { need: align8(body), have: rest.len() });
    }
    let slice = <[W::Le]>::ref_from_bytes(&rest[..body]).map_err(|_| Error::InvalidHead)?;
    Ok((
      Sparse {
        list: List::Loaded(slice),
        bits: head.bits.get() as usize,
      },
      SparseHead::SIZE + align8(body),
    ))
  }
}

/// Sparse sequence storing the positions of its ones.
/// 存储 1 位置的稀疏序列。
#[derive(Debug, Clone)]
pub struct FewOne<'a, W: Word> {
  s: Sparse<'a, W>,
}

impl<W: Word> FewOne<'_, W> {
  /// Build from the sorted positions of the ones.
  /// 从有序的 1 位置构建。
  pub fn build(ones: &[usize], bits: usize) -> FewOne<'static, W> {
    FewOne { s: Sparse::build(ones, bits) }
  }

  pub fn save(&self, w: &mut impl Write) -> Result<usize> {
    self.s.save(w)
  }

  pub fn load(mem: &[u8]) -> Result<(FewOne<'_, W>, usize)> {
    let (s, n) = Sparse::load(mem)?;
    Ok((FewOne { s }, n))
  }
}

impl<W: Word> RankSelect for FewOne<'_, W> {
  #[inline]
  fn size(&self) -> usize {
    self.s.bits
  }

  #[inline]
  fn max_rank1(&self) -> usize {
    self.s.list.len()
  }

  #[inline]
  fn get(&self, pos: usize) -> bool {
    self.s.contains(pos)
  }

  #[inline]
  fn rank1(&self, pos: usize) -> usize {
    self.s.rank(pos)
  }

  #[inline]
  fn select1(&self, k: usize) -> usize {
    self.s.select_minority(k)
  }

  #[inline]
  fn select0(&self, k: usize) -> usize {
    self.s.select_majority(k)
  }

  fn zero_seq_len(&self, pos: usize) -> usize {
    self.s.gap_len(pos)
  }

  fn one_seq_len(&self, pos: usize) -> usize {
    self.s.run_len(pos)
  }

  fn zero_seq_revlen(&self, pos: usize) -> usize {
    self.s.gap_revlen(pos)
  }

  fn one_seq_revlen(&self, pos: usize) -> usize {
    self.s.run_revlen(pos)
  }
}

/// Sparse sequence storing the positions of its zeros.
/// 存储 0 位置的稀疏序列。
#[derive(Debug, Clone)]
pub struct FewZero<'a, W: Word> {
  s: Sparse<'a, W>,
}

impl<W: Word> FewZero<'_, W> {
  /// Build from the sorted positions of the zeros.
  /// 从有序的 0 位置构建。
  pub fn build(zeros: &[usize], bits: usize) -> FewZero<'static, W> {
    FewZero { s: Sparse::build(zeros, bits) }
  }

  pub fn save(&self, w: &mut impl Write) -> Result<usize> {
    self.s.save(w)
  }

  pub fn load(mem: &[u8]) -> Result<(FewZero<'_, W>, usize)> {
    let (s, n) = Sparse::load(mem)?;
    Ok((FewZero { s }, n))
  }
}

impl<W: Word> RankSelect for FewZero<'_, W> {
  #[inline]
  fn size(&self) -> usize {
    self.s.bits
  }

  #[inline]
  fn max_rank1(&self) -> usize {
    self.s.bits - self.s.list.len()
  }

  #[inline]
  fn get(&self, pos: usize) -> bool {
    !self.s.contains(pos)
  }

  #[inline]
  fn rank1(&self, pos: usize) -> usize {
    pos - self.s.rank(pos)
  }

  #[inline]
  fn select1(&self, k: usize) -> usize {
    self.s.select_majority(k)
  }

  #[inline]
  fn select0(&self, k: usize) -> usize {
    self.s.select_minority(k)
  }

  fn zero_seq_len(&self, pos: usize) -> usize {
    self.s.run_len(pos)
  }

  fn one_seq_len(&self, pos: usize) -> usize {
    self.s.gap_len(pos)
  }

  fn zero_seq_revlen(&self, pos: usize) -> usize {
    self.s.run_revlen(pos)
  }

  fn one_seq_revlen(&self, pos: usize) -> usize {
    self.s.gap_revlen(pos)
  }
}
