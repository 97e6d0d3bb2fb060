//! Trie prefix: variable-length heads in a LOUDS trie
//! 字典树前缀：LOUDS 字典树中的变长头
//!
//! Without a suffix the trie holds full keys and lookups delegate
//! straight to it. With a suffix, a stored head that is a strict prefix
//! of the query is still a live candidate (its tail lives in the suffix
//! band), so lookups walk the chain of prefix words shallowest-first and
//! reconcile each against the suffix.
//! 无后缀时字典树持有完整键，查找直接委托。有后缀时，作为查询严格前缀
//! 的已存头仍是有效候选（其尾在后缀带中），因此查找自浅向深遍历前缀词
//! 链并逐个与后缀归并判定。

use zidx_louds::{Cursor, Trie};

use crate::suffix::Suffix;

#[derive(Debug)]
pub struct TriePrefix<'a> {
  pub trie: Trie<'a>,
}

impl<'a> TriePrefix<'a> {
  #[inline]
  pub fn key_count(&self) -> usize {
    self.trie.num_words()
  }

  #[inline]
  pub fn total_key_size(&self) -> usize {
    self.trie.total_words_len()
  }

  pub fn find(&self, key: &[u8], suffix: Option<&Suffix>) -> Option<usize> {
    let Some(suffix) = suffix else {
      return self.trie.index(key);
    };
    // At most one prefix word can carry an exact match: keys are distinct.
    // 键互异，至多一个前缀词能给出精确命中。
    let mut found = None;
    let mut buf = Vec::new();
    self.trie.walk_words(key, |id, depth| {
      let rest = &key[depth..];
      let (sid, skey) = suffix.lower_bound(rest, id, 1, &mut buf);
      if sid == id && skey == rest {
        found = Some(id);
        true
      } else {
        false
      }
    });
    found
  }

  pub fn dict_rank(&self, key: &[u8], suffix: Option<&Suffix>) -> usize {
    let Some(suffix) = suffix else {
      return self.trie.dict_rank(key);
    };
    // Keys of prefix-chain words are monotone in depth; the first whose
    // tail is >= the query tail is the overall lower bound.
    // 前缀词链上的键随深度单调；首个尾部不小于查询尾部者即整体下界。
    let mut rank = None;
    let mut buf = Vec::new();
    self.trie.walk_words(key, |id, depth| {
      let rest = &key[depth..];
      let (sid, _) = suffix.lower_bound(rest, id, 1, &mut buf);
      if sid == id {
        rank = Some(self.trie.dict_rank_of(id));
        true
      } else {
        false
      }
    });
    if let Some(rank) = rank {
      return rank;
    }
    // Every prefix word's key is below the query.
    // 所有前缀词的键均小于查询。
    let mut cur = Cursor::new(&self.trie);
    if cur.seek_lower_bound(key) {
      cur.dict_rank()
    } else {
      self.trie.num_words()
    }
  }

  #[inline]
  pub fn needs_reorder(&self) -> bool {
    true
  }

  pub fn order_map(&self, out: &mut Vec<u64>) {
    self.trie.order_map(out);
  }

  pub fn build_cache(&mut self, ratio: f64) {
    self.trie.build_cache(ratio);
  }

  pub fn iter_seek_to_first(&self, cur: &mut Cursor<'_, 'a>) -> Option<usize> {
    cur.seek_to_first().then(|| cur.word_id())
  }

  pub fn iter_seek_to_last(&self, cur: &mut Cursor<'_, 'a>) -> Option<usize> {
    cur.seek_to_last().then(|| cur.word_id())
  }

  pub fn iter_seek(&self, cur: &mut Cursor<'_, 'a>, target: &[u8]) -> Option<(usize, usize)> {
    cur.seek_cover_lower_bound(target).then(|| (cur.word_id(), 1))
  }

  pub fn iter_seek_next(&self, cur: &mut Cursor<'_, 'a>, target: &[u8]) -> Option<(usize, usize)> {
    cur.seek_cover_continue(target).then(|| (cur.word_id(), 1))
  }

  pub fn iter_next(&self, cur: &mut Cursor<'_, 'a>, step: usize) -> Option<usize> {
    debug_assert!(step > 0);
    for _ in 0..step {
      if !cur.incr() {
        return None;
      }
    }
    Some(cur.word_id())
  }

  pub fn iter_prev(&self, cur: &mut Cursor<'_, 'a>) -> Option<usize> {
    cur.decr().then(|| cur.word_id())
  }
}
