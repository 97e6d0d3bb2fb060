//! Packed fixed-width integer array
//! 定宽压缩整数数组
//!
//! Stores `len` integers of `width` bits back to back in 64-bit words;
//! the width is chosen from the maximum value at build time.
//! 将 `len` 个 `width` 位整数背靠背存入 64 位字；宽度在构建时由最大值
//! 决定。

use std::io::Write;

use crate::{
  BitVec, Error, Result, Words,
  wire::{PackedHead, take_head, take_words},
};

#[derive(Debug, Clone)]
pub struct PackedUints<'a> {
  words: Words<'a>,
  len: usize,
  width: usize,
}

impl PackedUints<'_> {
  /// Pack `values` with the minimal width for their maximum.
  /// 以最大值所需的最小宽度打包 `values`。
  pub fn build(values: &[u64]) -> PackedUints<'static> {
    let max = values.iter().copied().max().unwrap_or(0);
    let width = (64 - max.leading_zeros() as usize).max(1);
    let mut bv = BitVec::new();
    for &v in values {
      bv.push_int(v, width);
    }
    PackedUints {
      words: bv.into_words(),
      len: values.len(),
      width,
    }
  }

  /// Element count.
  /// 元素个数。
  #[inline]
  pub fn len(&self) -> usize {
    self.len
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Bits per element.
  /// 每元素位数。
  #[inline]
  pub fn width(&self) -> usize {
    self.width
  }

  /// The i-th value. Panics if out of bounds.
  /// 第 i 个值。越界则恐慌。
  #[inline]
  pub fn get(&self, i: usize) -> u64 {
    assert!(i < self.len, "PackedUints index out of bounds: {} >= {}", i, self.len);
    let index = i * self.width;
    let word_idx = index / 64;
    let bit_offset = index & 63;
    let mut result = self.words.word(word_idx) >> bit_offset;
    let available = 64 - bit_offset;
    if self.width > available {
      result |= self.words.word(word_idx + 1) << available;
    }
    if self.width < 64 {
      result &= (1u64 << self.width) - 1;
    }
    result
  }

  pub fn save(&self, w: &mut impl Write) -> Result<usize> {
    let head = PackedHead {
      len: (self.len as u64).into(),
      width: (self.width as u32).into(),
      reserved: 0.into(),
      words: (self.words.len() as u64).into(),
    };
    w.write_all(zerocopy::IntoBytes::as_bytes(&head))?;
    self.words.write_to(w)?;
    Ok(PackedHead::SIZE + self.words.len() * 8)
  }

  pub fn load(mem: &[u8]) -> Result<(PackedUints<'_>, usize)> {
    let (head, rest) = take_head::<PackedHead>(mem)?;
    let width = head.width.get() as usize;
    if width == 0 || width > 64 {
      return Err(Error::InvalidWidth(head.width.get()));
    }
    let nwords = head.words.get() as usize;
    let (words, _) = take_words(rest, nwords)?;
    Ok((
      PackedUints {
        words,
        len: head.len.get() as usize,
        width,
      },
      PackedHead::SIZE + nwords * 8,
    ))
  }
}
