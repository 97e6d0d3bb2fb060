//! Rewindable key stream and the typed views the build takes over it
//! 可回卷键流及构建在其上采用的类型化视图
//!
//! The planner streams the input once per materialized part; every
//! adapter rewinds the source on construction and yields exactly the
//! slice of each key its part stores.
//! 规划器为每个物化部件各流式读取一遍输入；每个适配器在构造时回卷源，
//! 并恰好产出其部件所存的键切片。

use crate::{Error, Result, keystat::common_prefix_len};

/// A stream of full keys in comparator order; must support rewinding
/// because the build takes several passes.
/// 按比较器顺序产出完整键的流；构建需多遍读取，故必须支持回卷。
pub trait KeySource {
  fn rewind(&mut self) -> Result<()>;
  fn next(&mut self) -> Result<Option<&[u8]>>;
}

/// In-memory source over a sorted slice.
/// 内存内有序切片上的源。
pub struct SliceSource<'k, K: AsRef<[u8]>> {
  keys: &'k [K],
  pos: usize,
}

impl<'k, K: AsRef<[u8]>> SliceSource<'k, K> {
  pub fn new(keys: &'k [K]) -> Self {
    Self { keys, pos: 0 }
  }
}

impl<K: AsRef<[u8]>> KeySource for SliceSource<'_, K> {
  fn rewind(&mut self) -> Result<()> {
    self.pos = 0;
    Ok(())
  }

  fn next(&mut self) -> Result<Option<&[u8]>> {
    let Some(key) = self.keys.get(self.pos) else {
      return Ok(None);
    };
    self.pos += 1;
    Ok(Some(key.as_ref()))
  }
}

fn demand<'s>(src: &'s mut dyn KeySource) -> Result<&'s [u8]> {
  src.next()?.ok_or(Error::InputExhausted)
}

/// The whole key past the stripped common prefix.
/// 剥离公共前缀后的完整键。
pub(crate) struct WholeKey<'s> {
  src: &'s mut dyn KeySource,
  cplen: usize,
}

impl<'s> WholeKey<'s> {
  pub fn new(src: &'s mut dyn KeySource, cplen: usize) -> Result<Self> {
    src.rewind()?;
    Ok(Self { src, cplen })
  }

  pub fn next(&mut self) -> Result<&[u8]> {
    let key = demand(self.src)?;
    Ok(&key[self.cplen..])
  }
}

/// The fixed-length head.
/// 定长头。
pub(crate) struct FixHead<'s> {
  src: &'s mut dyn KeySource,
  cplen: usize,
  head_len: usize,
}

impl<'s> FixHead<'s> {
  pub fn new(src: &'s mut dyn KeySource, cplen: usize, head_len: usize) -> Result<Self> {
    src.rewind()?;
    Ok(Self { src, cplen, head_len })
  }

  pub fn next(&mut self) -> Result<&[u8]> {
    let key = demand(self.src)?;
    debug_assert!(key.len() >= self.cplen + self.head_len);
    Ok(&key[self.cplen..self.cplen + self.head_len])
  }
}

/// Everything after the fixed-length head.
/// 定长头之后的全部内容。
pub(crate) struct FixHeadTail<'s> {
  src: &'s mut dyn KeySource,
  skip: usize,
}

impl<'s> FixHeadTail<'s> {
  pub fn new(src: &'s mut dyn KeySource, cplen: usize, head_len: usize) -> Result<Self> {
    src.rewind()?;
    Ok(Self { src, skip: cplen + head_len })
  }

  pub fn next(&mut self) -> Result<&[u8]> {
    let key = demand(self.src)?;
    debug_assert!(key.len() >= self.skip);
    Ok(&key[self.skip..])
  }
}

/// The key minus a fixed-length tail.
/// 去掉定长尾后的键。
pub(crate) struct ChopTail<'s> {
  src: &'s mut dyn KeySource,
  cplen: usize,
  tail_len: usize,
}

impl<'s> ChopTail<'s> {
  pub fn new(src: &'s mut dyn KeySource, cplen: usize, tail_len: usize) -> Result<Self> {
    src.rewind()?;
    Ok(Self { src, cplen, tail_len })
  }

  pub fn next(&mut self) -> Result<&[u8]> {
    let key = demand(self.src)?;
    debug_assert!(key.len() >= self.cplen + self.tail_len);
    Ok(&key[self.cplen..key.len() - self.tail_len])
  }
}

/// The fixed-length tail.
/// 定长尾。
pub(crate) struct Tail<'s> {
  src: &'s mut dyn KeySource,
  tail_len: usize,
}

impl<'s> Tail<'s> {
  pub fn new(src: &'s mut dyn KeySource, tail_len: usize) -> Result<Self> {
    src.rewind()?;
    Ok(Self { src, tail_len })
  }

  pub fn next(&mut self) -> Result<&[u8]> {
    let key = demand(self.src)?;
    debug_assert!(key.len() >= self.tail_len);
    Ok(&key[key.len() - self.tail_len..])
  }
}

/// The minimal distinguishing prefix of each key: one byte past the
/// longer of the shared prefixes with both neighbors, clamped to the key.
/// 每个键的最小区分前缀：与两侧邻键共享前缀较长者再加一字节，并截断到
/// 键长。
pub(crate) struct MinPrefix<'s> {
  src: &'s mut dyn KeySource,
  cplen: usize,
  remaining: usize,
  prev: Vec<u8>,
  prev_same: usize,
  out: Vec<u8>,
}

impl<'s> MinPrefix<'s> {
  pub fn new(src: &'s mut dyn KeySource, cplen: usize, count: usize) -> Result<Self> {
    debug_assert!(count > 0);
    src.rewind()?;
    let prev = demand(src)?.to_vec();
    Ok(Self {
      src,
      cplen,
      remaining: count,
      prev,
      prev_same: 0,
      out: Vec::new(),
    })
  }

  pub fn next(&mut self) -> Result<&[u8]> {
    self.remaining -= 1;
    if self.remaining == 0 {
      let d = (self.prev_same + 1).min(self.prev.len());
      self.out.clear();
      self.out.extend_from_slice(&self.prev[self.cplen..d]);
      return Ok(&self.out);
    }
    let cur = demand(self.src)?;
    let same = common_prefix_len(cur, &self.prev);
    let d = (self.prev_same.max(same) + 1).min(self.prev.len());
    self.out.clear();
    self.out.extend_from_slice(&self.prev[self.cplen..d]);
    self.prev.clear();
    self.prev.extend_from_slice(cur);
    self.prev_same = same;
    Ok(&self.out)
  }
}

/// The remainder after the minimal distinguishing prefix.
/// 最小区分前缀之后的剩余部分。
pub(crate) struct MinTail<'s> {
  src: &'s mut dyn KeySource,
  remaining: usize,
  prev: Vec<u8>,
  prev_same: usize,
  out: Vec<u8>,
}

impl<'s> MinTail<'s> {
  pub fn new(src: &'s mut dyn KeySource, count: usize) -> Result<Self> {
    debug_assert!(count > 0);
    src.rewind()?;
    let prev = demand(src)?.to_vec();
    Ok(Self {
      src,
      remaining: count,
      prev,
      prev_same: 0,
      out: Vec::new(),
    })
  }

  pub fn next(&mut self) -> Result<&[u8]> {
    self.remaining -= 1;
    if self.remaining == 0 {
      let d = (self.prev_same + 1).min(self.prev.len());
      self.out.clear();
      self.out.extend_from_slice(&self.prev[d..]);
      return Ok(&self.out);
    }
    let cur = demand(self.src)?;
    let same = common_prefix_len(cur, &self.prev);
    let d = (self.prev_same.max(same) + 1).min(self.prev.len());
    self.out.clear();
    self.out.extend_from_slice(&self.prev[d..]);
    self.prev.clear();
    self.prev.extend_from_slice(cur);
    self.prev_same = same;
    Ok(&self.out)
  }
}
