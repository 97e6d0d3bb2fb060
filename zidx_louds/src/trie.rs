//! Succinct trie: LOUDS bits, edge labels, terminal map, dict ranks
//! 简洁字典树：LOUDS 位、边标签、终结位图、字典秩

use std::{borrow::Cow, io::Write};

use zerocopy::{
  FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
  little_endian::U64,
};
use zidx_rs::{BitVec, Il256, PackedUints, RankSelect, wire};

use crate::{Cursor, Error, Result};

/// Wire head of a trie section.
/// 字典树段头。
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub(crate) struct TrieHead {
  pub node_count: U64,
  pub word_count: U64,
  pub total_words_len: U64,
  pub labels_len: U64,
}

impl TrieHead {
  pub const SIZE: usize = size_of::<Self>();
}

const _: () = assert!(TrieHead::SIZE == 32);

pub struct Trie<'a> {
  pub(crate) louds: Il256<'a>,
  pub(crate) term: Il256<'a>,
  labels: Cow<'a, [u8]>,
  /// word id (BFS terminal rank) -> dictionary rank
  /// 词 id（BFS 终结秩）-> 字典秩
  ranks: PackedUints<'a>,
  node_count: usize,
  word_count: usize,
  total_words_len: usize,
  /// Root fan-out jump table, built on demand.
  /// 根扇出跳转表，按需构建。
  cache: Option<Box<[u32; 256]>>,
}

impl Trie<'_> {
  /// Build in memory from strictly ascending keys. Duplicate or
  /// descending input is rejected.
  /// 在内存中从严格升序的键构建。重复或降序输入将被拒绝。
  pub fn build<K: AsRef<[u8]>>(keys: &[K]) -> Result<Trie<'static>> {
    for i in 1..keys.len() {
      if keys[i - 1].as_ref() >= keys[i].as_ref() {
        return Err(Error::Unsorted(i));
      }
    }

    let n = keys.len();
    let mut louds = BitVec::new();
    let mut term = BitVec::new();
    let mut labels = Vec::new();
    let mut ranks = Vec::new();
    let mut total_words_len = 0usize;

    // BFS over key ranges sharing a prefix of the current depth.
    // 以共享当前深度前缀的键区间做 BFS。
    let mut queue = std::collections::VecDeque::new();
    if n > 0 {
      queue.push_back((0usize, n, 0usize));
    } else {
      // Root alone, no words.
      // 仅根节点，无词。
      louds.push(false);
      term.push(false);
    }
    let mut node_count = if n > 0 { 0 } else { 1 };
    while let Some((mut lo, hi, depth)) = queue.pop_front() {
      node_count += 1;
      let is_term = keys[lo].as_ref().len() == depth;
      term.push(is_term);
      if is_term {
        // Pre-order word position equals the sorted key index.
        // 前序词位置即有序键下标。
        ranks.push(lo as u64);
        total_words_len += depth;
        lo += 1;
      }
      let mut i = lo;
      while i < hi {
        let b = keys[i].as_ref()[depth];
        let mut j = i + 1;
        while j < hi && keys[j].as_ref()[depth] == b {
          j += 1;
        }
        louds.push(true);
        labels.push(b);
        queue.push_back((i, j, depth + 1));
        i = j;
      }
      louds.push(false);
    }

    Ok(Trie {
      louds: Il256::new(&louds),
      term: Il256::new(&term),
      labels: Cow::Owned(labels),
      ranks: PackedUints::build(&ranks),
      node_count,
      word_count: n,
      total_words_len,
      cache: None,
    })
  }

  /// Word count.
  /// 词数。
  #[inline]
  pub fn num_words(&self) -> usize {
    self.word_count
  }

  /// Sum of all word lengths.
  /// 所有词长之和。
  #[inline]
  pub fn total_words_len(&self) -> usize {
    self.total_words_len
  }

  #[inline]
  pub(crate) fn terminal(&self, node: usize) -> bool {
    self.term.get(node)
  }

  /// BFS terminal rank of a terminal node.
  /// 终结节点的 BFS 终结秩。
  #[inline]
  pub(crate) fn word_id(&self, node: usize) -> usize {
    debug_assert!(self.terminal(node));
    self.term.rank1(node)
  }

  /// Dictionary rank of a word id.
  /// 词 id 的字典秩。
  #[inline]
  pub fn dict_rank_of(&self, word_id: usize) -> usize {
    self.ranks.get(word_id) as usize
  }

  /// First LOUDS position of the node's child run.
  /// 节点孩子游程的首个 LOUDS 位置。
  #[inline]
  pub(crate) fn run_start(&self, node: usize) -> usize {
    if node == 0 { 0 } else { self.louds.select0(node - 1) + 1 }
  }

  /// (first edge index, child count) of a node.
  /// 节点的（首边下标，孩子数）。
  #[inline]
  pub(crate) fn children(&self, node: usize) -> (usize, usize) {
    let start = self.run_start(node);
    (self.louds.rank1(start), self.louds.one_seq_len(start))
  }

  #[inline]
  pub(crate) fn label(&self, edge: usize) -> u8 {
    self.labels[edge]
  }

  /// First child edge offset whose label is >= `b`, in `[0, cnt]`.
  /// 标签不小于 `b` 的首个孩子边偏移，范围 `[0, cnt]`。
  #[inline]
  pub(crate) fn child_lower_bound(&self, base: usize, cnt: usize, b: u8) -> usize {
    self.labels[base..base + cnt].partition_point(|&l| l < b)
  }

  /// Exact lookup: word id of `key` when stored.
  /// 精确查找：`key` 存在时返回其词 id。
  pub fn index(&self, key: &[u8]) -> Option<usize> {
    let mut node = 0usize;
    for (d, &b) in key.iter().enumerate() {
      if d == 0
        && let Some(cache) = &self.cache
      {
        let c = cache[b as usize];
        if c == u32::MAX {
          return None;
        }
        node = c as usize;
        continue;
      }
      let (base, cnt) = self.children(node);
      let k = self.child_lower_bound(base, cnt, b);
      if k == cnt || self.label(base + k) != b {
        return None;
      }
      node = base + k + 1;
    }
    self.terminal(node).then(|| self.word_id(node))
  }

  /// Count of stored words strictly below `key`.
  /// 严格小于 `key` 的已存词数。
  pub fn dict_rank(&self, key: &[u8]) -> usize {
    let mut cur = Cursor::new(self);
    if cur.seek_lower_bound(key) {
      cur.dict_rank()
    } else {
      self.word_count
    }
  }

  /// Visit stored words that are prefixes of `key` (the key itself
  /// included), shallowest first, as `(word_id, depth)`; stop early when
  /// the callback returns true.
  /// 以 `(词 id, 深度)` 从浅到深访问作为 `key` 前缀的已存词（含 `key`
  /// 本身）；回调返回 true 时提前停止。
  pub fn walk_words(&self, key: &[u8], mut f: impl FnMut(usize, usize) -> bool) {
    let mut node = 0usize;
    for d in 0..=key.len() {
      if self.terminal(node) && f(self.word_id(node), d) {
        return;
      }
      if d == key.len() {
        return;
      }
      let (base, cnt) = self.children(node);
      let k = self.child_lower_bound(base, cnt, key[d]);
      if k == cnt || self.label(base + k) != key[d] {
        return;
      }
      node = base + k + 1;
    }
  }

  /// Fill `new_id -> dict_order_old_id` for external record reordering.
  /// 填充 `新 id -> 字典序旧 id`，供外部记录重排使用。
  pub fn order_map(&self, out: &mut Vec<u64>) {
    out.clear();
    out.reserve(self.word_count);
    for id in 0..self.word_count {
      out.push(self.ranks.get(id));
    }
  }

  /// Build the root fan-out cache when `ratio` asks for one.
  /// 当 `ratio` 要求时构建根扇出缓存。
  pub fn build_cache(&mut self, ratio: f64) {
    if ratio <= 1e-8 || self.cache.is_some() {
      return;
    }
    let mut cache = Box::new([u32::MAX; 256]);
    let (base, cnt) = self.children(0);
    for k in 0..cnt {
      cache[self.label(base + k) as usize] = (base + k + 1) as u32;
    }
    log::debug!(
      "trie root cache built, fanout {} / 根缓存已构建，扇出 {}",
      cnt,
      cnt
    );
    self.cache = Some(cache);
  }

  /// Serialize as one 8-aligned wire section; returns bytes written.
  /// 序列化为一个 8 字节对齐的线上段；返回写出字节数。
  pub fn save(&self, w: &mut impl Write) -> Result<usize> {
    let head = TrieHead {
      node_count: (self.node_count as u64).into(),
      word_count: (self.word_count as u64).into(),
      total_words_len: (self.total_words_len as u64).into(),
      labels_len: (self.labels.len() as u64).into(),
    };
    w.write_all(head.as_bytes())?;
    let mut n = TrieHead::SIZE;
    n += self.louds.save(w)?;
    n += self.term.save(w)?;
    w.write_all(&self.labels)?;
    n += self.labels.len();
    n += wire::pad8(w, self.labels.len())?;
    n += self.ranks.save(w)?;
    Ok(n)
  }

  /// Zero-copy load; returns the trie and consumed byte count.
  /// 零拷贝加载；返回字典树及消费的字节数。
  pub fn load(mem: &[u8]) -> Result<(Trie<'_>, usize)> {
    let (head, rest) = wire::take_head::<TrieHead>(mem).map_err(Error::Section)?;
    let mut off = TrieHead::SIZE;
    let (louds, n) = Il256::load(rest)?;
    off += n;
    let (term, n) = Il256::load(&mem[off..])?;
    off += n;
    let labels_len = head.labels_len.get() as usize;
    let (labels, _) = wire::take_bytes(&mem[off..], labels_len)?;
    off += wire::align8(labels_len);
    let (ranks, n) = PackedUints::load(&mem[off..])?;
    off += n;
    Ok((
      Trie {
        louds,
        term,
        labels: Cow::Borrowed(labels),
        ranks,
        node_count: head.node_count.get() as usize,
        word_count: head.word_count.get() as usize,
        total_words_len: head.total_words_len.get() as usize,
        cache: None,
      },
      off,
    ))
  }
}

impl std::fmt::Debug for Trie<'_> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Trie")
      .field("nodes", &self.node_count)
      .field("words", &self.word_count)
      .finish()
  }
}
