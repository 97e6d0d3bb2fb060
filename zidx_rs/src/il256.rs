//! Interleaved dense rank/select, 256-bit blocks
//! 交错稠密 rank/select，256 位块
//!
//! Each block is 5 words: one header word (32-bit absolute rank plus three
//! 9-bit intra-block sub-ranks) followed by 4 data words. Rank needs one
//! cache line; select binary-searches the block headers. Total length is
//! capped at 2^32 - 1 bits by the 32-bit absolute rank.
//! 每块 5 个字：1 个头字（32 位绝对秩加三个 9 位块内子秩）后跟 4 个数据
//! 字。rank 只需一个缓存行；select 对块头做二分查找。32 位绝对秩将总长
//! 限制在 2^32 - 1 位以内。

use std::io::Write;

use crate::{
  BitVec, RankSelect, Result, Words,
  utils::{select64, seq_len, seq_revlen},
  wire::{BitsHead, take_head, take_words},
};

const BLOCK_BITS: usize = 256;
const BLOCK_WORDS: usize = 5;

#[derive(Debug, Clone)]
pub struct Il256<'a> {
  storage: Words<'a>,
  bits: usize,
  ones: usize,
}

impl Il256<'_> {
  /// Build from a finished bit vector.
  /// 从已完成的位向量构建。
  pub fn new(bv: &BitVec) -> Il256<'static> {
    let bits = bv.len();
    assert!(bits <= u32::MAX as usize, "Il256 overflow: {bits} bits");
    let nblocks = bits.div_ceil(BLOCK_BITS);
    let mut storage = Vec::with_capacity((nblocks + 1) * BLOCK_WORDS);
    let mut abs = 0u64;
    for blk in 0..nblocks {
      let mut ws = [0u64; 4];
      for (w, slot) in ws.iter_mut().enumerate() {
        *slot = bv.data.get(blk * 4 + w).copied().unwrap_or(0);
      }
      let c0 = ws[0].count_ones() as u64;
      let c1 = c0 + ws[1].count_ones() as u64;
      let c2 = c1 + ws[2].count_ones() as u64;
      let c3 = c2 + ws[3].count_ones() as u64;
      storage.push(abs | (c0 << 32) | (c1 << 41) | (c2 << 50));
      storage.extend_from_slice(&ws);
      abs += c3;
    }
    // Sentinel block: absolute rank at the end, zero data.
    // 哨兵块：末尾绝对秩，数据为零。
    storage.push(abs);
    storage.extend_from_slice(&[0u64; 4]);
    Il256 {
      storage: Words::Owned(storage),
      bits,
      ones: abs as usize,
    }
  }

  #[inline]
  fn header(&self, blk: usize) -> u64 {
    self.storage.word(blk * BLOCK_WORDS)
  }

  #[inline]
  fn abs_rank(&self, blk: usize) -> usize {
    (self.header(blk) & 0xFFFF_FFFF) as usize
  }

  /// Ones in data words `[0, w)` of the block.
  /// 块内前 `w` 个数据字中 1 的个数。
  #[inline]
  fn sub_rank(&self, hdr: u64, w: usize) -> usize {
    if w == 0 { 0 } else { ((hdr >> (23 + 9 * w)) & 0x1FF) as usize }
  }

  #[inline]
  fn data_word(&self, i: usize) -> u64 {
    self.storage.word(i / 4 * BLOCK_WORDS + 1 + i % 4)
  }

  #[inline]
  fn nblocks(&self) -> usize {
    self.bits.div_ceil(BLOCK_BITS)
  }

  /// Largest block whose absolute rank of `ones` (or zeros) is <= k.
  /// 绝对秩不超过 k 的最大块。
  fn search_block(&self, k: usize, zeros: bool) -> usize {
    let mut lo = 0;
    let mut hi = self.nblocks();
    while lo < hi {
      let mid = lo + (hi - lo) / 2;
      let r = if zeros {
        mid * BLOCK_BITS - self.abs_rank(mid)
      } else {
        self.abs_rank(mid)
      };
      if r <= k { lo = mid + 1 } else { hi = mid }
    }
    lo - 1
  }

  /// Serialize as one 8-aligned wire section; returns bytes written.
  /// 序列化为一个 8 字节对齐的线上段；返回写出字节数。
  pub fn save(&self, w: &mut impl Write) -> Result<usize> {
    let head = BitsHead {
      bits: (self.bits as u64).into(),
      ones: (self.ones as u64).into(),
      words: (self.storage.len() as u64).into(),
    };
    w.write_all(zerocopy::IntoBytes::as_bytes(&head))?;
    self.storage.write_to(w)?;
    Ok(BitsHead::SIZE + self.storage.len() * 8)
  }

  /// Zero-copy load; returns the structure and consumed byte count.
  /// 零拷贝加载；返回结构及消费的字节数。
  pub fn load(mem: &[u8]) -> Result<(Il256<'_>, usize)> {
    let (head, rest) = take_head::<BitsHead>(mem)?;
    let words = head.words.get() as usize;
    let (storage, _) = take_words(rest, words)?;
    Ok((
      Il256 {
        storage,
        bits: head.bits.get() as usize,
        ones: head.ones.get() as usize,
      },
      BitsHead::SIZE + words * 8,
    ))
  }
}

impl RankSelect for Il256<'_> {
  #[inline]
  fn size(&self) -> usize {
    self.bits
  }

  #[inline]
  fn max_rank1(&self) -> usize {
    self.ones
  }

  #[inline]
  fn get(&self, pos: usize) -> bool {
    debug_assert!(pos < self.bits);
    (self.data_word(pos / 64) >> (pos & 63)) & 1 == 1
  }

  fn rank1(&self, pos: usize) -> usize {
    debug_assert!(pos <= self.bits);
    if pos >= self.bits {
      return self.ones;
    }
    let blk = pos / BLOCK_BITS;
    let hdr = self.header(blk);
    let w = (pos % BLOCK_BITS) / 64;
    let mut r = (hdr & 0xFFFF_FFFF) as usize + self.sub_rank(hdr, w);
    let off = pos & 63;
    if off != 0 {
      r += (self.data_word(pos / 64) & ((1u64 << off) - 1)).count_ones() as usize;
    }
    r
  }

  fn select1(&self, k: usize) -> usize {
    debug_assert!(k < self.ones);
    let blk = self.search_block(k, false);
    let hdr = self.header(blk);
    let rem = k - (hdr & 0xFFFF_FFFF) as usize;
    let mut w = 3;
    while self.sub_rank(hdr, w) > rem {
      w -= 1;
    }
    let i = blk * 4 + w;
    blk * BLOCK_BITS + w * 64 + select64(self.data_word(i), rem - self.sub_rank(hdr, w))
  }

  fn select0(&self, k: usize) -> usize {
    debug_assert!(k < self.max_rank0());
    let blk = self.search_block(k, true);
    let hdr = self.header(blk);
    let base = blk * BLOCK_BITS - (hdr & 0xFFFF_FFFF) as usize;
    let rem = k - base;
    let mut w = 3;
    while w * 64 - self.sub_rank(hdr, w) > rem {
      w -= 1;
    }
    let i = blk * 4 + w;
    let zeros_before = w * 64 - self.sub_rank(hdr, w);
    blk * BLOCK_BITS + w * 64 + select64(!self.data_word(i), rem - zeros_before)
  }

  fn zero_seq_len(&self, pos: usize) -> usize {
    seq_len(self.bits, pos, false, |i| self.data_word(i))
  }

  fn one_seq_len(&self, pos: usize) -> usize {
    seq_len(self.bits, pos, true, |i| self.data_word(i))
  }

  fn zero_seq_revlen(&self, pos: usize) -> usize {
    seq_revlen(pos, false, |i| self.data_word(i))
  }

  fn one_seq_revlen(&self, pos: usize) -> usize {
    seq_revlen(pos, true, |i| self.data_word(i))
  }
}
