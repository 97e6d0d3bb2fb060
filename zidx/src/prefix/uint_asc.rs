//! Ascending uint prefix: one key per stored head
//! 升序整数前缀：每个已存头对应一个键
//!
//! The bitmap spans `[min_value, max_value]` with a set bit at every
//! observed head, so `rank1` is the key id and iteration hops between set
//! bits via run lengths.
//! 位图覆盖 `[min_value, max_value]`，每个出现过的头对应一个置位位，
//! 因此 `rank1` 即键 id，迭代通过游程长度在置位位之间跳跃。

use zidx_rs::RankSelect;

use crate::{
  prefix::{UintIter, UintSeek},
  suffix::Suffix,
  uint::{read_be, read_be_padded, write_be},
};

#[derive(Debug)]
pub struct AscendingUintPrefix<RS> {
  pub rs: RS,
  pub key_length: usize,
  pub min_value: u64,
  pub max_value: u64,
}

impl<RS: RankSelect> AscendingUintPrefix<RS> {
  #[inline]
  pub fn key_count(&self) -> usize {
    self.rs.max_rank1()
  }

  #[inline]
  pub fn total_key_size(&self) -> usize {
    self.key_length * self.rs.max_rank1()
  }

  pub fn find(&self, key: &[u8], suffix: Option<&Suffix>) -> Option<usize> {
    if key.len() < self.key_length {
      return None;
    }
    let value = read_be(key, self.key_length);
    if value < self.min_value || value > self.max_value {
      return None;
    }
    let pos = (value - self.min_value) as usize;
    if !self.rs.get(pos) {
      return None;
    }
    let id = self.rs.rank1(pos);
    let Some(suffix) = suffix else {
      return (key.len() == self.key_length).then_some(id);
    };
    let rest = &key[self.key_length..];
    let mut buf = Vec::new();
    let (sid, skey) = suffix.lower_bound(rest, id, 1, &mut buf);
    (sid == id && skey == rest).then_some(id)
  }

  pub fn dict_rank(&self, key: &[u8], suffix: Option<&Suffix>) -> usize {
    match self.seek(key) {
      UintSeek::Fail => self.key_count(),
      UintSeek::At { id, exact, .. } => {
        if !exact || key.len() < self.key_length {
          return id;
        }
        let rest = &key[self.key_length..];
        match suffix {
          None => {
            if rest.is_empty() {
              id
            } else {
              id + 1
            }
          }
          Some(suffix) => {
            let mut buf = Vec::new();
            suffix.lower_bound(rest, id, 1, &mut buf).0
          }
        }
      }
    }
  }

  /// Position on the first head whose keys can be >= the target.
  /// 定位到其键可能不小于目标的第一个头。
  ///
  /// `exact` means the padded leading bytes hit a stored head; only then
  /// may the caller consult the suffix band.
  /// `exact` 表示补零后的前导字节命中已存头；仅此时调用方才可查询后缀带。
  pub(crate) fn seek(&self, target: &[u8]) -> UintSeek {
    let value = read_be_padded(target, self.key_length);
    if value > self.max_value {
      return UintSeek::Fail;
    }
    if value < self.min_value {
      return UintSeek::At { id: 0, pos: 0, count: 1, exact: false };
    }
    let pos = (value - self.min_value) as usize;
    let id = self.rs.rank1(pos);
    if self.rs.get(pos) {
      UintSeek::At { id, pos, count: 1, exact: true }
    } else {
      // Hop to the next stored head; one exists because max is stored.
      // 跳到下一个已存头；max 已存，故必然存在。
      let pos = pos + self.rs.zero_seq_len(pos);
      UintSeek::At { id, pos, count: 1, exact: false }
    }
  }

  pub fn iter_seek_to_first(&self, it: &mut UintIter) -> usize {
    it.pos = 0;
    self.update_buf(it);
    0
  }

  pub fn iter_seek_to_last(&self, it: &mut UintIter) -> usize {
    it.pos = self.rs.size() - 1;
    self.update_buf(it);
    self.key_count() - 1
  }

  pub fn iter_seek(&self, it: &mut UintIter, target: &[u8]) -> Option<(usize, usize)> {
    match self.seek(target) {
      UintSeek::Fail => None,
      UintSeek::At { id, pos, .. } => {
        it.pos = pos;
        self.update_buf(it);
        Some((id, 1))
      }
    }
  }

  /// Advance past the current candidate after a suffix miss.
  /// 后缀未命中后越过当前候选。
  pub fn iter_seek_next(&self, it: &mut UintIter, id: usize, _count: usize) -> Option<(usize, usize)> {
    self.iter_next(it, id, 1).map(|id| (id, 1))
  }

  pub fn iter_next(&self, it: &mut UintIter, id: usize, step: usize) -> Option<usize> {
    debug_assert!(step > 0);
    debug_assert!(self.rs.get(it.pos));
    debug_assert_eq!(self.rs.rank1(it.pos), id);
    let mut id = id;
    for _ in 0..step {
      if id == self.key_count() - 1 {
        return None;
      }
      id += 1;
      it.pos += self.rs.zero_seq_len(it.pos + 1) + 1;
    }
    self.update_buf(it);
    Some(id)
  }

  pub fn iter_prev(&self, it: &mut UintIter, id: usize) -> Option<usize> {
    debug_assert!(self.rs.get(it.pos));
    debug_assert_eq!(self.rs.rank1(it.pos), id);
    if id == 0 {
      return None;
    }
    it.pos -= self.rs.zero_seq_revlen(it.pos) + 1;
    self.update_buf(it);
    Some(id - 1)
  }

  fn update_buf(&self, it: &mut UintIter) {
    write_be(it.pos as u64 + self.min_value, self.key_length, &mut it.buf);
    it.len = self.key_length;
  }
}
