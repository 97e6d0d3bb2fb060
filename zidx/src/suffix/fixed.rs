//! Fixed-length suffix rows
//! 定长后缀行
//!
//! `count` rows of `fixed_len` bytes packed back to back; lower bound is a
//! branch-light binary search over the probed band.
//! `count` 行 `fixed_len` 字节背靠背排列；下界查找是探测带上的二分。

use std::{borrow::Cow, io::Write};

use zerocopy::{
  FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
  little_endian::U64,
};
use zidx_rs::wire;

use crate::{Error, Result};

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
struct FixedHead {
  fixed_len: U64,
  count: U64,
}

impl FixedHead {
  const SIZE: usize = size_of::<Self>();
}

const _: () = assert!(FixedHead::SIZE == 16);

#[derive(Debug)]
pub struct FixedStringSuffix<'a> {
  pool: Cow<'a, [u8]>,
  fixed_len: usize,
  count: usize,
}

impl FixedStringSuffix<'_> {
  /// Build from an owned pool of `count` packed rows.
  /// 从 `count` 行紧排的自有池构建。
  pub fn new(pool: Vec<u8>, fixed_len: usize, count: usize) -> FixedStringSuffix<'static> {
    debug_assert_eq!(pool.len(), fixed_len * count);
    FixedStringSuffix {
      pool: Cow::Owned(pool),
      fixed_len,
      count,
    }
  }

  #[inline]
  pub fn key_count(&self) -> usize {
    self.count
  }

  #[inline]
  pub fn total_key_size(&self) -> usize {
    self.pool.len()
  }

  #[inline]
  pub fn row(&self, id: usize) -> &[u8] {
    &self.pool[id * self.fixed_len..(id + 1) * self.fixed_len]
  }

  pub fn lower_bound(&self, target: &[u8], lo: usize, count: usize) -> (usize, &[u8]) {
    let end = lo + count;
    debug_assert!(end <= self.count);
    let mut lo = lo;
    let mut hi = end;
    while lo < hi {
      let mid = lo + (hi - lo) / 2;
      if self.row(mid) < target { lo = mid + 1 } else { hi = mid }
    }
    if lo == end {
      (lo, &[])
    } else {
      (lo, self.row(lo))
    }
  }

  pub fn reorder(&mut self, order: &[u64]) {
    debug_assert_eq!(order.len(), self.count);
    let mut pool = Vec::with_capacity(self.pool.len());
    for &old in order {
      pool.extend_from_slice(self.row(old as usize));
    }
    self.pool = Cow::Owned(pool);
  }

  pub fn save(&self, w: &mut impl Write) -> Result<usize> {
    let head = FixedHead {
      fixed_len: (self.fixed_len as u64).into(),
      count: (self.count as u64).into(),
    };
    w.write_all(head.as_bytes())?;
    w.write_all(&self.pool)?;
    let pad = wire::pad8(w, self.pool.len())?;
    Ok(FixedHead::SIZE + self.pool.len() + pad)
  }

  pub fn load(mem: &[u8]) -> Result<(FixedStringSuffix<'_>, usize)> {
    let (head, rest) = wire::take_head::<FixedHead>(mem).map_err(Error::Section)?;
    let fixed_len = head.fixed_len.get() as usize;
    let count = head.count.get() as usize;
    let body = fixed_len * count;
    let (pool, _) = wire::take_bytes(rest, body).map_err(Error::Section)?;
    Ok((
      FixedStringSuffix {
        pool: Cow::Borrowed(pool),
        fixed_len,
        count,
      },
      FixedHead::SIZE + wire::align8(body),
    ))
  }
}
