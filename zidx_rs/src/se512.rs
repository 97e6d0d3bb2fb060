//! Separate-storage dense rank/select, 512-bit blocks
//! 分离存储稠密 rank/select，512 位块
//!
//! Data words and a 64-bit cumulative rank per 512-bit block live in two
//! runs of the same wire section, so lengths beyond 2^32 bits are fine.
//! 数据字与每 512 位块一个的 64 位累计秩分放在同一线上段的两个区间中，
//! 因此可以支持超过 2^32 位的长度。

use std::io::Write;

use crate::{
  BitVec, RankSelect, Result, Words,
  utils::{select64, seq_len, seq_revlen},
  wire::{BitsHead, take_head, take_words},
};

const BLOCK_BITS: usize = 512;
const BLOCK_WORDS: usize = 8;

#[derive(Debug, Clone)]
pub struct Se512<'a> {
  data: Words<'a>,
  /// Cumulative ones before each block, with a trailing total.
  /// 每块之前的累计 1 数，末尾附总数。
  ranks: Words<'a>,
  bits: usize,
}

impl Se512<'_> {
  /// Build from a finished bit vector.
  /// 从已完成的位向量构建。
  pub fn new(bv: &BitVec) -> Se512<'static> {
    let bits = bv.len();
    let nblocks = bits.div_ceil(BLOCK_BITS);
    let mut data = bv.data.clone();
    data.resize(nblocks * BLOCK_WORDS, 0);
    let mut ranks = Vec::with_capacity(nblocks + 1);
    let mut abs = 0u64;
    for blk in 0..nblocks {
      ranks.push(abs);
      for w in 0..BLOCK_WORDS {
        abs += data[blk * BLOCK_WORDS + w].count_ones() as u64;
      }
    }
    ranks.push(abs);
    Se512 {
      data: Words::Owned(data),
      ranks: Words::Owned(ranks),
      bits,
    }
  }

  #[inline]
  fn nblocks(&self) -> usize {
    self.bits.div_ceil(BLOCK_BITS)
  }

  #[inline]
  fn block_rank(&self, blk: usize) -> usize {
    self.ranks.word(blk) as usize
  }

  fn search_block(&self, k: usize, zeros: bool) -> usize {
    let mut lo = 0;
    let mut hi = self.nblocks();
    while lo < hi {
      let mid = lo + (hi - lo) / 2;
      let r = if zeros {
        mid * BLOCK_BITS - self.block_rank(mid)
      } else {
        self.block_rank(mid)
      };
      if r <= k { lo = mid + 1 } else { hi = mid }
    }
    lo - 1
  }

  fn select_in_block(&self, blk: usize, mut rem: usize, zeros: bool) -> usize {
    for w in 0..BLOCK_WORDS {
      let raw = self.data.word(blk * BLOCK_WORDS + w);
      let word = if zeros { !raw } else { raw };
      let c = word.count_ones() as usize;
      if rem < c {
        return blk * BLOCK_BITS + w * 64 + select64(word, rem);
      }
      rem -= c;
    }
    // Unreachable for a valid rank.
    // 对合法的秩不可达。
    debug_assert!(false, "select past block end");
    self.bits
  }

  /// Serialize as one 8-aligned wire section; returns bytes written.
  /// 序列化为一个 8 字节对齐的线上段；返回写出字节数。
  pub fn save(&self, w: &mut impl Write) -> Result<usize> {
    let head = BitsHead {
      bits: (self.bits as u64).into(),
      ones: (self.max_rank1() as u64).into(),
      words: ((self.data.len() + self.ranks.len()) as u64).into(),
    };
    w.write_all(zerocopy::IntoBytes::as_bytes(&head))?;
    self.data.write_to(w)?;
    self.ranks.write_to(w)?;
    Ok(BitsHead::SIZE + (self.data.len() + self.ranks.len()) * 8)
  }

  /// Zero-copy load; returns the structure and consumed byte count.
  /// 零拷贝加载；返回结构及消费的字节数。
  pub fn load(mem: &[u8]) -> Result<(Se512<'_>, usize)> {
    let (head, rest) = take_head::<BitsHead>(mem)?;
    let bits = head.bits.get() as usize;
    let nblocks = bits.div_ceil(BLOCK_BITS);
    let data_words = nblocks * BLOCK_WORDS;
    let (data, rest) = take_words(rest, data_words)?;
    let (ranks, _) = take_words(rest, nblocks + 1)?;
    let total = head.words.get() as usize;
    Ok((Se512 { data, ranks, bits }, BitsHead::SIZE + total * 8))
  }
}

impl RankSelect for Se512<'_> {
  #[inline]
  fn size(&self) -> usize {
    self.bits
  }

  #[inline]
  fn max_rank1(&self) -> usize {
    self.ranks.word(self.ranks.len() - 1) as usize
  }

  #[inline]
  fn get(&self, pos: usize) -> bool {
    debug_assert!(pos < self.bits);
    (self.data.word(pos / 64) >> (pos & 63)) & 1 == 1
  }

  fn rank1(&self, pos: usize) -> usize {
    debug_assert!(pos <= self.bits);
    if pos >= self.bits {
      return self.max_rank1();
    }
    let blk = pos / BLOCK_BITS;
    let mut r = self.block_rank(blk);
    for w in blk * BLOCK_WORDS..pos / 64 {
      r += self.data.word(w).count_ones() as usize;
    }
    let off = pos & 63;
    if off != 0 {
      r += (self.data.word(pos / 64) & ((1u64 << off) - 1)).count_ones() as usize;
    }
    r
  }

  fn select1(&self, k: usize) -> usize {
    debug_assert!(k < self.max_rank1());
    let blk = self.search_block(k, false);
    self.select_in_block(blk, k - self.block_rank(blk), false)
  }

  fn select0(&self, k: usize) -> usize {
    debug_assert!(k < self.max_rank0());
    let blk = self.search_block(k, true);
    self.select_in_block(blk, k - (blk * BLOCK_BITS - self.block_rank(blk)), true)
  }

  fn zero_seq_len(&self, pos: usize) -> usize {
    seq_len(self.bits, pos, false, |i| self.data.word(i))
  }

  fn one_seq_len(&self, pos: usize) -> usize {
    seq_len(self.bits, pos, true, |i| self.data.word(i))
  }

  fn zero_seq_revlen(&self, pos: usize) -> usize {
    seq_revlen(pos, false, |i| self.data.word(i))
  }

  fn one_seq_revlen(&self, pos: usize) -> usize {
    seq_revlen(pos, true, |i| self.data.word(i))
  }
}
