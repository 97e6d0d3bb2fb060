//! Lexicographic trie cursor
//! 字典序字典树游标
//!
//! Keeps an explicit descent stack so sibling steps and word
//! materialization are cheap. Words enumerate in pre-order, which for a
//! trie over sorted keys is dictionary order.
//! 维护显式下降栈，使兄弟移动与词物化都很廉价。词按前序枚举，对有序键
//! 构建的字典树即字典序。

use crate::Trie;

#[derive(Debug, Clone, Copy)]
struct Frame {
  /// Parent node
  node: usize,
  /// Child index taken at the parent
  k: usize,
  /// First edge index of the parent
  base: usize,
  /// Child count of the parent
  cnt: usize,
}

pub struct Cursor<'t, 'a> {
  trie: &'t Trie<'a>,
  path: Vec<Frame>,
  node: usize,
  word: Vec<u8>,
  valid: bool,
}

impl<'t, 'a> Cursor<'t, 'a> {
  pub fn new(trie: &'t Trie<'a>) -> Self {
    Self {
      trie,
      path: Vec::new(),
      node: 0,
      word: Vec::new(),
      valid: false,
    }
  }

  /// The word at the cursor.
  /// 游标处的词。
  #[inline]
  pub fn word(&self) -> &[u8] {
    debug_assert!(self.valid);
    &self.word
  }

  /// BFS word id at the cursor.
  /// 游标处的 BFS 词 id。
  #[inline]
  pub fn word_id(&self) -> usize {
    debug_assert!(self.valid);
    self.trie.word_id(self.node)
  }

  /// Dictionary rank of the word at the cursor.
  /// 游标处词的字典秩。
  #[inline]
  pub fn dict_rank(&self) -> usize {
    self.trie.dict_rank_of(self.word_id())
  }

  #[inline]
  pub fn is_valid(&self) -> bool {
    self.valid
  }

  fn reset(&mut self) {
    self.path.clear();
    self.word.clear();
    self.node = 0;
    self.valid = false;
  }

  /// Enter child `k` of the current node.
  /// 进入当前节点的第 `k` 个孩子。
  fn push_child(&mut self, k: usize, base: usize, cnt: usize) {
    debug_assert!(k < cnt);
    self.path.push(Frame { node: self.node, k, base, cnt });
    self.word.push(self.trie.label(base + k));
    self.node = base + k + 1;
  }

  /// Descend first children until a terminal node. Non-terminal nodes
  /// always have children, so this terminates at a word.
  /// 沿首孩子下降直到终结节点。非终结节点必有孩子，故必停在词上。
  fn descend_first(&mut self) {
    while !self.trie.terminal(self.node) {
      let (base, cnt) = self.trie.children(self.node);
      debug_assert!(cnt > 0);
      self.push_child(0, base, cnt);
    }
  }

  /// Descend last children to the rightmost leaf, the pre-order last word
  /// of the subtree.
  /// 沿末孩子下降到最右叶，即子树的前序末词。
  fn descend_last(&mut self) {
    loop {
      let (base, cnt) = self.trie.children(self.node);
      if cnt == 0 {
        break;
      }
      self.push_child(cnt - 1, base, cnt);
    }
    debug_assert!(self.trie.terminal(self.node));
  }

  /// Move to the first word after the current subtree.
  /// 移动到当前子树之后的首个词。
  fn backtrack_next(&mut self) -> bool {
    while let Some(frame) = self.path.pop() {
      self.word.pop();
      self.node = frame.node;
      if frame.k + 1 < frame.cnt {
        self.push_child(frame.k + 1, frame.base, frame.cnt);
        self.descend_first();
        self.valid = true;
        return true;
      }
    }
    self.valid = false;
    false
  }

  /// Position at the smallest word.
  /// 定位到最小词。
  pub fn seek_to_first(&mut self) -> bool {
    self.reset();
    if self.trie.num_words() == 0 {
      return false;
    }
    self.descend_first();
    self.valid = true;
    true
  }

  /// Position at the largest word.
  /// 定位到最大词。
  pub fn seek_to_last(&mut self) -> bool {
    self.reset();
    if self.trie.num_words() == 0 {
      return false;
    }
    self.descend_last();
    self.valid = true;
    true
  }

  /// Position at the smallest word >= `key`.
  /// 定位到不小于 `key` 的最小词。
  pub fn seek_lower_bound(&mut self, key: &[u8]) -> bool {
    self.seek_impl(key, false)
  }

  /// Like `seek_lower_bound`, but also stops at the shallowest word that is
  /// a strict prefix of `key`; such a word's tail may live in an external
  /// suffix band, so the caller must get a chance to reconcile it.
  /// 与 `seek_lower_bound` 类似，但也会停在 `key` 的最浅严格前缀词上；
  /// 该词的尾部可能存于外部后缀带，须让调用方有机会对其进行归并判定。
  pub fn seek_cover_lower_bound(&mut self, key: &[u8]) -> bool {
    self.seek_impl(key, true)
  }

  fn seek_impl(&mut self, key: &[u8], cover: bool) -> bool {
    self.reset();
    if self.trie.num_words() == 0 {
      return false;
    }
    self.seek_from(key, cover, false)
  }

  /// Resume a cover seek below the current word, which must be a strict
  /// prefix of `key`. Used after the caller rejected this word's suffix
  /// band: the next candidate is a deeper prefix word or the plain lower
  /// bound within (or after) the subtree.
  /// 从当前词（必须是 `key` 的严格前缀）之下继续 cover 查找。供调用方
  /// 否决该词的后缀带后使用：下一个候选要么是更深的前缀词，要么是子树
  /// 内（或之后）的普通下界。
  pub fn seek_cover_continue(&mut self, key: &[u8]) -> bool {
    debug_assert!(self.valid);
    debug_assert!(key.len() > self.word.len() && key.starts_with(&self.word));
    self.seek_from(key, true, true)
  }

  /// Walk down along `key` from the current node at depth `word.len()`.
  /// 从当前节点（深度为 `word.len()`）沿 `key` 向下行走。
  fn seek_from(&mut self, key: &[u8], cover: bool, mut skip_terminal: bool) -> bool {
    let mut d = self.word.len();
    while d < key.len() {
      if cover && !skip_terminal && self.trie.terminal(self.node) {
        self.valid = true;
        return true;
      }
      skip_terminal = false;
      let (base, cnt) = self.trie.children(self.node);
      if cnt == 0 {
        // Leaf word, a strict prefix of the key: successor lives after
        // this subtree.
        // 叶词是 key 的严格前缀：后继在本子树之后。
        return self.backtrack_next();
      }
      let k = self.trie.child_lower_bound(base, cnt, key[d]);
      if k == cnt {
        return self.backtrack_next();
      }
      let diverged = self.trie.label(base + k) != key[d];
      self.push_child(k, base, cnt);
      if diverged {
        self.descend_first();
        self.valid = true;
        return true;
      }
      d += 1;
    }
    // Key exhausted: everything below extends it.
    // key 耗尽：子树内所有词均以其为前缀。
    self.descend_first();
    self.valid = true;
    true
  }

  /// Next word in dictionary order.
  /// 字典序下一个词。
  pub fn incr(&mut self) -> bool {
    debug_assert!(self.valid);
    let (base, cnt) = self.trie.children(self.node);
    if cnt > 0 {
      self.push_child(0, base, cnt);
      self.descend_first();
      return true;
    }
    self.backtrack_next()
  }

  /// Previous word in dictionary order.
  /// 字典序上一个词。
  pub fn decr(&mut self) -> bool {
    debug_assert!(self.valid);
    while let Some(frame) = self.path.pop() {
      self.word.pop();
      self.node = frame.node;
      if frame.k > 0 {
        self.push_child(frame.k - 1, frame.base, frame.cnt);
        self.descend_last();
        return true;
      }
      if self.trie.terminal(self.node) {
        return true;
      }
    }
    self.valid = false;
    false
  }
}
