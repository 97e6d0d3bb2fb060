//! Non-descending uint prefix: head values may repeat
//! 非降整数前缀：头值可以重复
//!
//! Layout: for every value in `[min_value, max_value]`, the run of ones
//! for its keys followed by one terminating zero. Total length is
//! `N + (max - min) + 1`; `select0(v - min)` lands on value `v`'s
//! terminator, and the ones run just before it is `v`'s key group.
//! 布局：对 `[min_value, max_value]` 中的每个值，先是其键的 1 游程，再
//! 跟一个终止 0。总长为 `N + (max - min) + 1`；`select0(v - min)` 落在
//! 值 `v` 的终止位上，其前的 1 游程即 `v` 的键组。

use zidx_rs::RankSelect;

use crate::{
  prefix::{UintIter, UintSeek},
  suffix::Suffix,
  uint::{read_be, read_be_padded, write_be},
};

#[derive(Debug)]
pub struct NonDescendingUintPrefix<RS> {
  pub rs: RS,
  pub key_length: usize,
  pub min_value: u64,
  pub max_value: u64,
}

impl<RS: RankSelect> NonDescendingUintPrefix<RS> {
  #[inline]
  pub fn key_count(&self) -> usize {
    self.rs.max_rank1()
  }

  #[inline]
  pub fn total_key_size(&self) -> usize {
    self.key_length * self.rs.max_rank1()
  }

  /// The discriminating tail lives in the suffix, so one is required.
  /// 区分尾存于后缀，因此后缀必需。
  pub fn find(&self, key: &[u8], suffix: Option<&Suffix>) -> Option<usize> {
    let suffix = suffix?;
    if key.len() < self.key_length {
      return None;
    }
    let value = read_be(key, self.key_length);
    if value < self.min_value || value > self.max_value {
      return None;
    }
    let pos = self.rs.select0((value - self.min_value) as usize);
    let count = self.rs.one_seq_revlen(pos);
    if count == 0 {
      return None;
    }
    let id = self.rs.rank1(pos - count);
    let rest = &key[self.key_length..];
    let mut buf = Vec::new();
    let (sid, skey) = suffix.lower_bound(rest, id, count, &mut buf);
    (sid < id + count && skey == rest).then_some(sid)
  }

  pub fn dict_rank(&self, key: &[u8], suffix: Option<&Suffix>) -> usize {
    match self.seek(key) {
      UintSeek::Fail => self.key_count(),
      UintSeek::At { id, count, exact, .. } => {
        if !exact || key.len() < self.key_length {
          return id;
        }
        let rest = &key[self.key_length..];
        match suffix {
          None => id,
          Some(suffix) => {
            let mut buf = Vec::new();
            suffix.lower_bound(rest, id, count, &mut buf).0
          }
        }
      }
    }
  }

  /// Position on the first group whose keys can be >= the target.
  /// 定位到其键可能不小于目标的第一个组。
  pub(crate) fn seek(&self, target: &[u8]) -> UintSeek {
    let value = read_be_padded(target, self.key_length);
    if value > self.max_value {
      return UintSeek::Fail;
    }
    if value < self.min_value {
      // First group; position zero is its first key.
      // 第一个组；位置 0 即其首键。
      return UintSeek::At { id: 0, pos: 0, count: self.rs.one_seq_len(0), exact: false };
    }
    let term = self.rs.select0((value - self.min_value) as usize);
    let count = self.rs.one_seq_revlen(term);
    if count > 0 {
      let pos = term - count;
      UintSeek::At { id: self.rs.rank1(pos), pos, count, exact: true }
    } else {
      // Empty group: hop over the terminator run to the next group.
      // 空组：越过终止 0 游程到下一个组。
      let pos = term + self.rs.zero_seq_len(term + 1) + 1;
      if pos >= self.rs.size() {
        return UintSeek::Fail;
      }
      UintSeek::At {
        id: self.rs.rank1(pos),
        pos,
        count: self.rs.one_seq_len(pos),
        exact: false,
      }
    }
  }

  pub fn iter_seek_to_first(&self, it: &mut UintIter) -> usize {
    it.pos = 0;
    self.update_buf(it);
    debug_assert!(self.rs.get(it.pos));
    0
  }

  pub fn iter_seek_to_last(&self, it: &mut UintIter) -> usize {
    it.pos = self.rs.size() - 2;
    debug_assert!(self.rs.get(it.pos));
    self.update_buf(it);
    self.key_count() - 1
  }

  pub fn iter_seek(&self, it: &mut UintIter, target: &[u8]) -> Option<(usize, usize)> {
    match self.seek(target) {
      UintSeek::Fail => None,
      UintSeek::At { id, pos, count, .. } => {
        it.pos = pos;
        self.update_buf(it);
        Some((id, count))
      }
    }
  }

  /// Advance past the current group after a suffix miss.
  /// 后缀未命中后越过当前组。
  pub fn iter_seek_next(&self, it: &mut UintIter, id: usize, count: usize) -> Option<(usize, usize)> {
    let id = self.iter_next(it, id, count)?;
    debug_assert!(self.rs.get(it.pos));
    Some((id, self.rs.one_seq_len(it.pos)))
  }

  pub fn iter_next(&self, it: &mut UintIter, id: usize, step: usize) -> Option<usize> {
    debug_assert!(step > 0);
    debug_assert!(self.rs.get(it.pos));
    debug_assert_eq!(self.rs.rank1(it.pos), id);
    if id + step >= self.key_count() {
      return None;
    }
    let id = id + step;
    if step == 1 {
      let zeros = self.rs.zero_seq_len(it.pos + 1);
      it.pos += zeros + 1;
      if zeros > 0 {
        self.update_buf(it);
      }
    } else {
      let ones = self.rs.one_seq_len(it.pos + 1);
      if step <= ones {
        // Still inside the same group, head unchanged.
        // 仍在同一组内，头不变。
        it.pos += step;
      } else {
        it.pos = self.rs.select1(id);
        self.update_buf(it);
      }
    }
    Some(id)
  }

  pub fn iter_prev(&self, it: &mut UintIter, id: usize) -> Option<usize> {
    debug_assert!(self.rs.get(it.pos));
    debug_assert_eq!(self.rs.rank1(it.pos), id);
    if id == 0 {
      return None;
    }
    let zeros = self.rs.zero_seq_revlen(it.pos);
    it.pos -= zeros + 1;
    if zeros > 0 {
      self.update_buf(it);
    }
    Some(id - 1)
  }

  fn update_buf(&self, it: &mut UintIter) {
    write_be(self.rs.rank0(it.pos) as u64 + self.min_value, self.key_length, &mut it.buf);
    it.len = self.key_length;
  }
}
