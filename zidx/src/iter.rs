//! Composite cursor: prefix and suffix driven jointly
//! 组合游标：前缀与后缀联合驱动
//!
//! Seek walks prefix candidates in order and lets each candidate's suffix
//! band accept or reject the target, so total order over
//! `common ‖ head ‖ tail` is preserved even when a head is a strict
//! prefix of the target.
//! seek 依序遍历前缀候选，由每个候选的后缀带判定接受或否决目标，因此
//! 即使某个头是目标的严格前缀，`common ‖ head ‖ tail` 上的全序也得以
//! 保持。

use crate::{
  composite::Composite,
  keystat::common_prefix_len,
  prefix::PrefixIter,
  suffix::SuffixIter,
};

pub struct Cursor<'c, 'a> {
  idx: &'c Composite<'a>,
  id: Option<usize>,
  pfx: PrefixIter<'c, 'a>,
  sfx: SuffixIter,
  key_buf: Vec<u8>,
}

impl<'c, 'a> Cursor<'c, 'a> {
  pub fn new(idx: &'c Composite<'a>) -> Self {
    Self {
      idx,
      id: None,
      pfx: idx.prefix.new_iter(),
      sfx: SuffixIter::default(),
      key_buf: Vec::new(),
    }
  }

  /// Record id at the cursor, `None` past either end.
  /// 游标处的记录 id，越界时为 `None`。
  #[inline]
  pub fn id(&self) -> Option<usize> {
    self.id
  }

  #[inline]
  pub fn is_valid(&self) -> bool {
    self.id.is_some()
  }

  pub fn seek_to_first(&mut self) -> bool {
    match self.idx.prefix.iter_seek_to_first(&mut self.pfx) {
      Some(id) => {
        self.idx.suffix.iter_set(&mut self.sfx, id);
        self.id = Some(id);
        true
      }
      None => {
        self.id = None;
        false
      }
    }
  }

  pub fn seek_to_last(&mut self) -> bool {
    match self.idx.prefix.iter_seek_to_last(&mut self.pfx) {
      Some(id) => {
        self.idx.suffix.iter_set(&mut self.sfx, id);
        self.id = Some(id);
        true
      }
      None => {
        self.id = None;
        false
      }
    }
  }

  /// Position at the smallest stored key >= `target`.
  /// 定位到不小于 `target` 的最小已存键。
  pub fn seek(&mut self, target: &[u8]) -> bool {
    let common = self.idx.common();
    let cp = common_prefix_len(target, common);
    if cp != common.len() {
      // Diverges inside the common prefix: everything or nothing.
      // 在公共前缀内分歧：要么全部命中，要么落空。
      if target.len() == cp || target[cp] < common[cp] {
        return self.seek_to_first();
      }
      self.id = None;
      return false;
    }
    let target = &target[common.len()..];

    let Some((mut id, mut count)) = self.idx.prefix.iter_seek(&mut self.pfx, target) else {
      self.id = None;
      return false;
    };
    'candidates: loop {
      let head_len = {
        let head = self.idx.prefix.iter_get_key(&self.pfx);
        if !target.starts_with(head) {
          // The head itself is already above the target.
          // 头本身已高于目标。
          break 'candidates;
        }
        head.len()
      };
      let rest = &target[head_len..];
      let mut sid = id;
      if self.idx.suffix.iter_seek(&mut self.sfx, rest, &mut sid, count) {
        if sid > id {
          match self.idx.prefix.iter_next(&mut self.pfx, id, sid - id) {
            Some(n) => id = n,
            None => {
              self.id = None;
              return false;
            }
          }
        }
        self.id = Some(id);
        return true;
      }
      // Whole band below the target: advance to the next candidate.
      // 整个带都低于目标：推进到下一个候选。
      match self.idx.prefix.iter_seek_next(&mut self.pfx, id, count, target) {
        Some((n, c)) => {
          id = n;
          count = c;
        }
        None => {
          self.id = None;
          return false;
        }
      }
    }
    self.idx.suffix.iter_set(&mut self.sfx, id);
    self.id = Some(id);
    true
  }

  pub fn next(&mut self) -> bool {
    let Some(id) = self.id else { return false };
    match self.idx.prefix.iter_next(&mut self.pfx, id, 1) {
      Some(id) => {
        self.idx.suffix.iter_set(&mut self.sfx, id);
        self.id = Some(id);
        true
      }
      None => {
        self.id = None;
        false
      }
    }
  }

  pub fn prev(&mut self) -> bool {
    let Some(id) = self.id else { return false };
    match self.idx.prefix.iter_prev(&mut self.pfx, id) {
      Some(id) => {
        self.idx.suffix.iter_set(&mut self.sfx, id);
        self.id = Some(id);
        true
      }
      None => {
        self.id = None;
        false
      }
    }
  }

  /// Materialize the full key at the cursor.
  /// 物化游标处的完整键。
  pub fn key(&mut self) -> &[u8] {
    debug_assert!(self.id.is_some());
    self.key_buf.clear();
    self.key_buf.extend_from_slice(self.idx.common());
    self.key_buf.extend_from_slice(self.idx.prefix.iter_get_key(&self.pfx));
    if let Some(id) = self.id {
      self.key_buf.extend_from_slice(self.idx.suffix.iter_get_key(&self.sfx, id));
    }
    &self.key_buf
  }

  /// Count of stored keys strictly below the cursor key; `N` past the end.
  /// 严格小于游标键的已存键数；越过末尾时为 `N`。
  pub fn dict_rank(&self) -> usize {
    self.idx.prefix.iter_dict_rank(&self.pfx, self.id)
  }
}
