//! Suffix representations: the unstructured key tails
//! 后缀表示：键的非结构化尾部
//!
//! The suffix sequence is non-decreasing over all ids and strictly
//! increasing within one prefix group. `lower_bound` only ever probes one
//! group's band `[lo, lo + count)`.
//! 后缀序列在全体 id 上非降，在单个前缀组内严格递增。`lower_bound` 只
//! 在一个组的带 `[lo, lo + count)` 内探测。

pub mod blob;
pub mod fixed;

use std::io::Write;

pub use blob::BlobStoreSuffix;
pub use fixed::FixedStringSuffix;

use crate::{Error, Result, registry::SuffixKind};

/// Per-cursor suffix scratch: the materialized blob record.
/// 游标级后缀暂存：物化后的 blob 记录。
#[derive(Debug, Default)]
pub struct SuffixIter {
  pub(crate) rec: Vec<u8>,
}

#[derive(Debug)]
pub enum Suffix<'a> {
  /// The prefix alone identifies every key.
  /// 仅前缀即可唯一确定每个键。
  Empty,
  Fixed(FixedStringSuffix<'a>),
  Blob(BlobStoreSuffix<'a>),
}

impl<'a> Suffix<'a> {
  #[inline]
  pub fn kind(&self) -> SuffixKind {
    match self {
      Suffix::Empty => SuffixKind::Empty,
      Suffix::Fixed(_) => SuffixKind::Fixed,
      Suffix::Blob(_) => SuffixKind::Blob,
    }
  }

  #[inline]
  pub fn key_count(&self) -> usize {
    match self {
      Suffix::Empty => 0,
      Suffix::Fixed(s) => s.key_count(),
      Suffix::Blob(s) => s.key_count(),
    }
  }

  #[inline]
  pub fn total_key_size(&self) -> usize {
    match self {
      Suffix::Empty => 0,
      Suffix::Fixed(s) => s.total_key_size(),
      Suffix::Blob(s) => s.total_key_size(),
    }
  }

  /// Smallest id in `[lo, lo + count)` whose suffix is >= `target`, with
  /// that suffix's bytes; `(lo + count, empty)` when none qualifies.
  /// `[lo, lo + count)` 内后缀不小于 `target` 的最小 id 及其字节；无则
  /// 返回 `(lo + count, 空)`。
  pub fn lower_bound<'b>(
    &'b self,
    target: &[u8],
    lo: usize,
    count: usize,
    buf: &'b mut Vec<u8>,
  ) -> (usize, &'b [u8]) {
    match self {
      Suffix::Empty => {
        if target.is_empty() {
          (lo, &[])
        } else {
          (lo + count, &[])
        }
      }
      Suffix::Fixed(s) => s.lower_bound(target, lo, count),
      Suffix::Blob(s) => s.lower_bound(target, lo, count, buf),
    }
  }

  /// Materialize the record at `id` into the cursor scratch.
  /// 将 `id` 处的记录物化进游标暂存。
  #[inline]
  pub fn iter_set(&self, it: &mut SuffixIter, id: usize) {
    if let Suffix::Blob(s) = self {
      it.rec.clear();
      s.store.get_record_append(id, &mut it.rec);
    }
  }

  /// Lower-bound within the band; positions the cursor on success.
  /// 带内下界查找；成功时定位游标。
  pub fn iter_seek(&self, it: &mut SuffixIter, target: &[u8], id: &mut usize, count: usize) -> bool {
    match self {
      Suffix::Empty => target.is_empty(),
      Suffix::Fixed(s) => {
        let (sid, _) = s.lower_bound(target, *id, count);
        if sid == *id + count {
          return false;
        }
        *id = sid;
        true
      }
      Suffix::Blob(s) => {
        let end = *id + count;
        let sid = s.store.lower_bound(*id, end, target);
        if sid == end {
          return false;
        }
        *id = sid;
        it.rec.clear();
        s.store.get_record_append(sid, &mut it.rec);
        true
      }
    }
  }

  /// Suffix bytes at the cursor.
  /// 游标处的后缀字节。
  #[inline]
  pub fn iter_get_key<'k>(&'k self, it: &'k SuffixIter, id: usize) -> &'k [u8] {
    match self {
      Suffix::Empty => &[],
      Suffix::Fixed(s) => s.row(id),
      Suffix::Blob(_) => &it.rec,
    }
  }

  /// Permute rows: `new[i] = old[order[i]]`. Build-time only.
  /// 以置换重排行：`new[i] = old[order[i]]`。仅构建期使用。
  pub fn reorder(&mut self, order: &[u64]) {
    match self {
      Suffix::Empty => {}
      Suffix::Fixed(s) => s.reorder(order),
      Suffix::Blob(s) => s.store = s.store.reorder(order),
    }
  }

  /// Serialize as an 8-aligned wire section; empty is zero bytes.
  /// 序列化为 8 字节对齐的线上段；空后缀为零字节。
  pub fn save(&self, w: &mut impl Write) -> Result<usize> {
    match self {
      Suffix::Empty => Ok(0),
      Suffix::Fixed(s) => s.save(w),
      Suffix::Blob(s) => Ok(s.store.save(w)?),
    }
  }

  /// Zero-copy load of the given kind.
  /// 按指定种类零拷贝加载。
  pub fn load(kind: SuffixKind, mem: &[u8]) -> Result<(Suffix<'_>, usize)> {
    match kind {
      SuffixKind::Empty => Ok((Suffix::Empty, 0)),
      SuffixKind::Fixed => {
        let (s, n) = FixedStringSuffix::load(mem)?;
        Ok((Suffix::Fixed(s), n))
      }
      SuffixKind::Blob => {
        let (store, n) = zidx_blob::SortedStore::load(mem).map_err(Error::Store)?;
        Ok((Suffix::Blob(BlobStoreSuffix { store }), n))
      }
    }
  }
}
