//! Sorted record store: packed offsets plus a byte pool
//! 有序记录存储：压缩偏移加字节池

use std::{borrow::Cow, io::Write};

use zerocopy::{
  FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
  little_endian::U64,
};
use zidx_rs::{PackedUints, wire};

use crate::{Error, Result};

/// Wire head of a store section.
/// 存储段头。
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
struct StoreHead {
  count: U64,
  pool_len: U64,
}

impl StoreHead {
  const SIZE: usize = size_of::<Self>();
}

const _: () = assert!(StoreHead::SIZE == 16);

/// Append-only builder used during index construction.
/// 索引构建期使用的追加构建器。
#[derive(Debug, Default)]
pub struct StoreBuilder {
  offsets: Vec<u64>,
  pool: Vec<u8>,
}

impl StoreBuilder {
  pub fn with_capacity(records: usize, bytes: usize) -> Self {
    let mut offsets = Vec::with_capacity(records + 1);
    offsets.push(0);
    Self {
      offsets,
      pool: Vec::with_capacity(bytes),
    }
  }

  /// Append one record.
  /// 追加一条记录。
  pub fn push(&mut self, rec: &[u8]) {
    if self.offsets.is_empty() {
      self.offsets.push(0);
    }
    self.pool.extend_from_slice(rec);
    self.offsets.push(self.pool.len() as u64);
  }

  pub fn finish(mut self) -> SortedStore<'static> {
    if self.offsets.is_empty() {
      self.offsets.push(0);
    }
    SortedStore {
      offsets: PackedUints::build(&self.offsets),
      pool: Cow::Owned(self.pool),
    }
  }
}

/// Immutable record container addressed by dense ids.
/// 以致密 id 寻址的不可变记录容器。
#[derive(Debug)]
pub struct SortedStore<'a> {
  /// `len + 1` offsets into the pool
  /// 指向池内的 `len + 1` 个偏移
  offsets: PackedUints<'a>,
  pool: Cow<'a, [u8]>,
}

impl SortedStore<'_> {
  /// Record count.
  /// 记录数。
  #[inline]
  pub fn len(&self) -> usize {
    self.offsets.len() - 1
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Sum of record lengths.
  /// 记录长度之和。
  #[inline]
  pub fn total_data_size(&self) -> usize {
    self.pool.len()
  }

  /// Record bytes by id.
  /// 按 id 取记录字节。
  #[inline]
  pub fn get(&self, id: usize) -> &[u8] {
    let lo = self.offsets.get(id) as usize;
    let hi = self.offsets.get(id + 1) as usize;
    &self.pool[lo..hi]
  }

  /// Append the record into a caller buffer.
  /// 将记录追加进调用方缓冲区。
  #[inline]
  pub fn get_record_append(&self, id: usize, out: &mut Vec<u8>) {
    out.extend_from_slice(self.get(id));
  }

  /// Smallest id in `[lo, hi)` whose record is >= `target`, else `hi`.
  /// Records must be non-decreasing over the probed range.
  /// `[lo, hi)` 内记录不小于 `target` 的最小 id，否则返回 `hi`。
  /// 被探测区间内的记录必须非降。
  pub fn lower_bound(&self, lo: usize, hi: usize, target: &[u8]) -> usize {
    debug_assert!(hi <= self.len());
    let mut lo = lo;
    let mut hi = hi;
    while lo < hi {
      let mid = lo + (hi - lo) / 2;
      if self.get(mid) < target { lo = mid + 1 } else { hi = mid }
    }
    lo
  }

  /// Rebuild with rows permuted: `new[i] = old[order[i]]`.
  /// 以置换重建：`new[i] = old[order[i]]`。
  pub fn reorder(&self, order: &[u64]) -> SortedStore<'static> {
    debug_assert_eq!(order.len(), self.len());
    let mut b = StoreBuilder::with_capacity(self.len(), self.pool.len());
    for &old in order {
      b.push(self.get(old as usize));
    }
    b.finish()
  }

  /// Serialize as one 8-aligned wire section; returns bytes written.
  /// 序列化为一个 8 字节对齐的线上段；返回写出字节数。
  pub fn save(&self, w: &mut impl Write) -> Result<usize> {
    let head = StoreHead {
      count: (self.len() as u64).into(),
      pool_len: (self.pool.len() as u64).into(),
    };
    w.write_all(head.as_bytes())?;
    let mut n = StoreHead::SIZE;
    n += self.offsets.save(w)?;
    w.write_all(&self.pool)?;
    n += self.pool.len();
    n += wire::pad8(w, self.pool.len())?;
    Ok(n)
  }

  /// Zero-copy load; returns the store and consumed byte count.
  /// 零拷贝加载；返回存储及消费的字节数。
  pub fn load(mem: &[u8]) -> Result<(SortedStore<'_>, usize)> {
    let (head, rest) = wire::take_head::<StoreHead>(mem).map_err(Error::Section)?;
    let mut off = StoreHead::SIZE;
    let (offsets, n) = PackedUints::load(rest)?;
    off += n;
    if offsets.len() != head.count.get() as usize + 1 {
      return Err(Error::InvalidSection);
    }
    let pool_len = head.pool_len.get() as usize;
    let (pool, _) = wire::take_bytes(&mem[off..], pool_len)?;
    off += wire::align8(pool_len);
    Ok((
      SortedStore {
        offsets,
        pool: Cow::Borrowed(pool),
      },
      off,
    ))
  }
}
