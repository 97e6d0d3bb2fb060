//! Implicit all-ones sequence
//! 隐式全一序列
//!
//! When every value in a dense range is occupied the bitmap carries no
//! information; only the length is stored.
//! 当稠密区间内每个值都被占用时，位图不携带信息；仅存储长度。

use std::io::Write;

use crate::{
  BitVec, RankSelect, Result,
  wire::{BitsHead, take_head},
};

#[derive(Debug, Clone, Default)]
pub struct AllOne {
  bits: usize,
}

impl AllOne {
  /// An implicit run of `bits` ones.
  /// `bits` 个 1 的隐式游程。
  pub fn new(bits: usize) -> Self {
    Self { bits }
  }

  /// Build from a finished bit vector; every bit must be set.
  /// 从已完成的位向量构建；要求所有位均为 1。
  pub fn from_bitvec(bv: &BitVec) -> Self {
    debug_assert_eq!(bv.count_ones(), bv.len());
    Self { bits: bv.len() }
  }

  pub fn save(&self, w: &mut impl Write) -> Result<usize> {
    let head = BitsHead {
      bits: (self.bits as u64).into(),
      ones: (self.bits as u64).into(),
      words: 0.into(),
    };
    w.write_all(zerocopy::IntoBytes::as_bytes(&head))?;
    Ok(BitsHead::SIZE)
  }

  pub fn load(mem: &[u8]) -> Result<(Self, usize)> {
    let (head, _) = take_head::<BitsHead>(mem)?;
    Ok((
      Self {
        bits: head.bits.get() as usize,
      },
      BitsHead::SIZE,
    ))
  }
}

impl RankSelect for AllOne {
  #[inline]
  fn size(&self) -> usize {
    self.bits
  }

  #[inline]
  fn max_rank1(&self) -> usize {
    self.bits
  }

  #[inline]
  fn get(&self, pos: usize) -> bool {
    debug_assert!(pos < self.bits);
    true
  }

  #[inline]
  fn rank1(&self, pos: usize) -> usize {
    pos
  }

  #[inline]
  fn select1(&self, k: usize) -> usize {
    debug_assert!(k < self.bits);
    k
  }

  fn select0(&self, _k: usize) -> usize {
    // No zeros exist.
    // 不存在 0。
    debug_assert!(false, "select0 on AllOne");
    self.bits
  }

  #[inline]
  fn zero_seq_len(&self, _pos: usize) -> usize {
    0
  }

  #[inline]
  fn one_seq_len(&self, pos: usize) -> usize {
    self.bits - pos
  }

  #[inline]
  fn zero_seq_revlen(&self, _pos: usize) -> usize {
    0
  }

  #[inline]
  fn one_seq_revlen(&self, pos: usize) -> usize {
    pos
  }
}
