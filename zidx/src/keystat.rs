//! Key statistics gathered ahead of the build
//! 构建前收集的键统计
//!
//! The SST writer feeds every key through [`KeyStatBuilder`] while writing
//! data blocks; the finished [`KeyStat`] is what the planner consumes.
//! SST 写入器在写数据块时将每个键送入 [`KeyStatBuilder`]；规划器消费
//! 完成后的 [`KeyStat`]。

use crate::{Error, Result};

/// Length of the shared prefix of two byte strings.
/// 两个字节串共享前缀的长度。
#[inline]
pub fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
  let len = a.len().min(b.len());
  let mut i = 0;
  // Eight bytes per step, byte fixup on the mismatching chunk.
  // 每步比较 8 字节，在失配块上做字节级修正。
  while i + 8 <= len {
    let av = u64::from_ne_bytes(a[i..i + 8].try_into().unwrap());
    let bv = u64::from_ne_bytes(b[i..i + 8].try_into().unwrap());
    let xor = av ^ bv;
    if xor != 0 {
      #[cfg(target_endian = "little")]
      return i + (xor.trailing_zeros() as usize >> 3);
      #[cfg(target_endian = "big")]
      return i + (xor.leading_zeros() as usize >> 3);
    }
    i += 8;
  }
  while i < len && a[i] == b[i] {
    i += 1;
  }
  i
}

/// Statistics of one sorted key stream.
/// 一条有序键流的统计。
///
/// `min_key`/`max_key` are the first and last input keys; a reverse
/// comparator stream therefore shows `min_key > max_key`, and the build
/// reverses record order so storage stays ascending.
/// `min_key`/`max_key` 为输入的首键与末键；反向比较器流因此表现为
/// `min_key > max_key`，构建会反转记录次序使存储保持升序。
#[derive(Debug, Clone)]
pub struct KeyStat {
  pub min_key: Vec<u8>,
  pub max_key: Vec<u8>,
  pub min_key_len: usize,
  pub max_key_len: usize,
  pub sum_key_len: usize,
  /// Prefix length the caller already strips outside this index
  /// 调用方已在索引之外剥离的前缀长度
  pub common_prefix_len: usize,
  pub key_count: usize,
  /// Sum of minimal distinguishing prefix lengths
  /// 最小区分前缀长度之和
  pub sum_prefix_len: usize,
  /// Tail length bounds relative to the distinguishing prefixes
  /// 相对最小区分前缀的尾长上下界
  pub min_suffix_len: usize,
  pub max_suffix_len: usize,
  /// `diff[len]` = adjacent key pairs whose shared prefix length is `len`
  /// `diff[len]` = 共享前缀长度恰为 `len` 的相邻键对数
  pub diff: Vec<usize>,
}

impl KeyStat {
  /// Convenience over an in-memory sorted slice.
  /// 内存内有序切片的便捷构建。
  pub fn from_keys<K: AsRef<[u8]>>(keys: &[K]) -> Result<Self> {
    let mut b = KeyStatBuilder::default();
    for k in keys {
      b.add(k.as_ref())?;
    }
    b.finish()
  }

  /// True when the stream used a reverse comparator.
  /// 流使用反向比较器时为真。
  #[inline]
  pub fn descending(&self) -> bool {
    self.min_key > self.max_key
  }

  /// Keys with a distinguishing prefix longer than `len`, read from the
  /// histogram.
  /// 区分前缀长于 `len` 的键数，由直方图读出。
  pub fn pairs_sharing(&self, len: usize) -> usize {
    self.diff.iter().skip(len).sum()
  }
}

/// Incremental builder; rejects non-monotonic input.
/// 增量构建器；拒绝非单调输入。
#[derive(Debug, Default)]
pub struct KeyStatBuilder {
  first: Vec<u8>,
  prev: Vec<u8>,
  prev_cpl: usize,
  /// None until the second key fixes the direction
  /// 第二个键确定方向前为 None
  ascending: Option<bool>,
  count: usize,
  sum_key_len: usize,
  min_key_len: usize,
  max_key_len: usize,
  sum_prefix_len: usize,
  min_suffix_len: usize,
  max_suffix_len: usize,
  diff: Vec<usize>,
  common_prefix_len: usize,
}

impl KeyStatBuilder {
  /// Record a prefix length the caller strips outside this index.
  /// 记录调用方在索引之外剥离的前缀长度。
  pub fn with_common_prefix_len(mut self, len: usize) -> Self {
    self.common_prefix_len = len;
    self
  }

  /// Close out the previous key once both neighbor prefixes are known.
  /// 两侧相邻前缀都已知后结算上一个键。
  fn settle_prev(&mut self, next_cpl: usize) {
    let d = (self.prev_cpl.max(next_cpl) + 1).min(self.prev.len());
    self.sum_prefix_len += d;
    let sfx = self.prev.len() - d;
    self.min_suffix_len = self.min_suffix_len.min(sfx);
    self.max_suffix_len = self.max_suffix_len.max(sfx);
  }

  pub fn add(&mut self, key: &[u8]) -> Result<()> {
    self.count += 1;
    self.sum_key_len += key.len();
    if self.count == 1 {
      self.first = key.to_vec();
      self.prev = key.to_vec();
      self.min_key_len = key.len();
      self.max_key_len = key.len();
      self.min_suffix_len = usize::MAX;
      return Ok(());
    }
    self.min_key_len = self.min_key_len.min(key.len());
    self.max_key_len = self.max_key_len.max(key.len());

    let cpl = common_prefix_len(&self.prev, key);
    let up = match self.prev.as_slice().cmp(key) {
      std::cmp::Ordering::Less => true,
      std::cmp::Ordering::Greater => false,
      std::cmp::Ordering::Equal => return Err(Error::Unsorted(self.count - 1)),
    };
    if *self.ascending.get_or_insert(up) != up {
      return Err(Error::Unsorted(self.count - 1));
    }

    if self.diff.len() <= cpl {
      self.diff.resize(cpl + 1, 0);
    }
    self.diff[cpl] += 1;

    self.settle_prev(cpl);
    self.prev_cpl = cpl;
    self.prev.clear();
    self.prev.extend_from_slice(key);
    Ok(())
  }

  pub fn finish(mut self) -> Result<KeyStat> {
    if self.count == 0 {
      return Err(Error::EmptyInput);
    }
    if self.count == 1 {
      // A lone key has no neighbors: it is fully its own prefix.
      // 孤键没有邻键：其前缀即其本身。
      self.sum_prefix_len = self.prev.len();
      self.min_suffix_len = 0;
      self.max_suffix_len = 0;
    } else {
      self.settle_prev(0);
    }
    Ok(KeyStat {
      min_key: self.first,
      max_key: self.prev,
      min_key_len: self.min_key_len,
      max_key_len: self.max_key_len,
      sum_key_len: self.sum_key_len,
      common_prefix_len: self.common_prefix_len,
      key_count: self.count,
      sum_prefix_len: self.sum_prefix_len,
      min_suffix_len: if self.min_suffix_len == usize::MAX { 0 } else { self.min_suffix_len },
      max_suffix_len: self.max_suffix_len,
      diff: self.diff,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_common_prefix_len() {
    assert_eq!(common_prefix_len(b"", b"abc"), 0);
    assert_eq!(common_prefix_len(b"abc", b"abd"), 2);
    assert_eq!(common_prefix_len(b"abc", b"abc"), 3);
    assert_eq!(common_prefix_len(b"abcdefghij", b"abcdefghik"), 9);
    assert_eq!(common_prefix_len(b"abcdefgh", b"abcdefgh!"), 8);
  }

  #[test]
  fn test_stat_basics() {
    let stat = KeyStat::from_keys(&[b"AAAx".as_slice(), b"AAAy", b"AABa"]).unwrap();
    assert_eq!(stat.key_count, 3);
    assert_eq!(stat.min_key, b"AAAx");
    assert_eq!(stat.max_key, b"AABa");
    assert!(!stat.descending());
    assert_eq!(stat.sum_key_len, 12);
    assert_eq!(stat.min_key_len, 4);
    // Adjacent shared prefixes: 3 ("AAA") and 2 ("AA").
    // 相邻共享前缀：3（"AAA"）与 2（"AA"）。
    assert_eq!(stat.diff[3], 1);
    assert_eq!(stat.diff[2], 1);
    assert_eq!(stat.pairs_sharing(3), 1);
    assert_eq!(stat.pairs_sharing(2), 2);
    // Distinguishing prefixes: 4, 4, 3.
    // 最小区分前缀：4、4、3。
    assert_eq!(stat.sum_prefix_len, 11);
    assert_eq!(stat.min_suffix_len, 0);
    assert_eq!(stat.max_suffix_len, 1);
  }

  #[test]
  fn test_descending_detected() {
    let stat = KeyStat::from_keys(&[b"b".as_slice(), b"a"]).unwrap();
    assert!(stat.descending());
  }

  #[test]
  fn test_mixed_direction_rejected() {
    let mut b = KeyStatBuilder::default();
    b.add(b"b").unwrap();
    b.add(b"a").unwrap();
    assert!(b.add(b"c").is_err());
    let mut b = KeyStatBuilder::default();
    b.add(b"a").unwrap();
    assert!(b.add(b"a").is_err());
  }
}
