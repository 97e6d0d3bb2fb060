//! The composite index: common prefix + prefix rep + suffix rep
//! 组合索引：公共前缀 + 前缀表示 + 后缀表示

use std::{borrow::Cow, io::Write};

use zerocopy::IntoBytes;

use crate::{
  Error, Result,
  head::IndexHeader,
  iter::Cursor,
  keystat::common_prefix_len,
  prefix::Prefix,
  registry,
  suffix::Suffix,
};

/// Immutable after build; thread-safe for reads; borrows the artifact
/// region when loaded, owns its buffers when freshly built.
/// 构建后不可变；读取线程安全；加载时借用工件内存区，新建时自有缓冲。
#[derive(Debug)]
pub struct Composite<'a> {
  pub(crate) common: Cow<'a, [u8]>,
  pub(crate) prefix: Prefix<'a>,
  pub(crate) suffix: Suffix<'a>,
}

impl<'a> Composite<'a> {
  /// Assemble from parts; the factory-side constructor.
  /// 由部件装配；工厂侧构造器。
  pub fn from_parts(common: Cow<'a, [u8]>, prefix: Prefix<'a>, suffix: Suffix<'a>) -> Self {
    debug_assert!(
      suffix.total_key_size() == 0 || prefix.key_count() == suffix.key_count()
    );
    Self { common, prefix, suffix }
  }

  /// Shared prefix stripped from every stored key.
  /// 从每个已存键中剥离的共享前缀。
  #[inline]
  pub fn common(&self) -> &[u8] {
    &self.common
  }

  /// The suffix, when it actually stores bytes.
  /// 后缀，仅当其确实存有字节时。
  #[inline]
  pub(crate) fn active_suffix(&self) -> Option<&Suffix<'a>> {
    (self.suffix.total_key_size() != 0).then_some(&self.suffix)
  }

  #[inline]
  pub fn num_keys(&self) -> usize {
    self.prefix.key_count()
  }

  pub fn total_key_size(&self) -> usize {
    self.num_keys() * self.common.len() + self.prefix.total_key_size() + self.suffix.total_key_size()
  }

  /// Stable wire name recorded in the artifact header.
  /// 记录于工件头的稳定线上名。
  pub fn wire_name(&self) -> &'static str {
    registry::wire_name(self.prefix.kind(), self.suffix.kind())
  }

  /// Record id of `key` iff stored exactly.
  /// 仅当 `key` 恰好存在时返回其记录 id。
  pub fn find(&self, key: &[u8]) -> Option<usize> {
    if common_prefix_len(key, &self.common) != self.common.len() {
      return None;
    }
    self.prefix.find(&key[self.common.len()..], self.active_suffix())
  }

  /// Count of stored keys strictly below `key`.
  /// 严格小于 `key` 的已存键数。
  pub fn dict_rank(&self, key: &[u8]) -> usize {
    let cp = common_prefix_len(key, &self.common);
    if cp != self.common.len() {
      return if key.len() == cp || key[cp] < self.common[cp] {
        0
      } else {
        self.num_keys()
      };
    }
    self.prefix.dict_rank(&key[self.common.len()..], self.active_suffix())
  }

  #[inline]
  pub fn needs_reorder(&self) -> bool {
    self.prefix.needs_reorder()
  }

  /// Fill `new_id -> dict_order_old_id` so the caller can permute its
  /// record block into id order.
  /// 填充 `新 id -> 字典序旧 id`，供调用方将记录块重排成 id 序。
  pub fn order_map(&self, out: &mut Vec<u64>) {
    self.prefix.order_map(out);
  }

  pub fn build_cache(&mut self, ratio: f64) {
    self.prefix.build_cache(ratio);
  }

  /// New iteration cursor over this index.
  /// 该索引上的新迭代游标。
  pub fn cursor(&self) -> Cursor<'_, 'a> {
    Cursor::new(self)
  }

  /// Write the artifact; returns its total size.
  /// 写出工件；返回其总大小。
  pub fn save(&self, w: &mut impl Write) -> Result<u64> {
    let mut body = Vec::new();
    body.extend_from_slice(&(self.common.len() as u64).to_le_bytes());
    body.extend_from_slice(&self.common);
    zidx_rs::wire::pad8(&mut body, self.common.len())?;
    self.prefix.save(&mut body)?;
    self.suffix.save(&mut body)?;

    let file_size = (IndexHeader::SIZE + body.len()) as u64;
    let header = IndexHeader::new(self.wire_name(), file_size);
    w.write_all(header.as_bytes())?;
    w.write_all(&body)?;
    Ok(file_size)
  }

  /// Reopen over a byte region, zero-copy. The region must stay alive and
  /// unchanged for the life of the returned index.
  /// 在字节区上零拷贝重开。返回索引存续期间该区必须保持存活且不变。
  pub fn load(mem: &[u8]) -> Result<Composite<'_>> {
    let (header, _) = zidx_rs::wire::take_head::<IndexHeader>(mem).map_err(|_| Error::Truncated {
      need: IndexHeader::SIZE,
      have: mem.len(),
    })?;
    let class = header.check(mem.len())?;
    let factory = registry::factory(class).ok_or_else(|| Error::UnknownClass(class.to_owned()))?;
    let file_size = header.file_size.get() as usize;
    let mem = &mem[..file_size];

    let mut off = IndexHeader::SIZE;
    if mem.len() < off + 8 {
      return Err(Error::Truncated { need: off + 8, have: mem.len() });
    }
    let clen = u64::from_le_bytes(mem[off..off + 8].try_into().unwrap()) as usize;
    off += 8;
    let (common, _) = zidx_rs::wire::take_bytes(&mem[off..], clen).map_err(Error::Section)?;
    off += zidx_rs::wire::align8(clen);

    let (prefix, n) = Prefix::load(factory.prefix, &mem[off..])?;
    off += n;
    let (suffix, n) = Suffix::load(factory.suffix, &mem[off..])?;
    off += n;

    if off != file_size {
      return Err(Error::Corrupt("section sizes disagree with file size"));
    }
    if suffix.total_key_size() != 0 && prefix.key_count() != suffix.key_count() {
      return Err(Error::Corrupt("prefix and suffix key counts disagree"));
    }
    log::debug!(
      "loaded index {class}: {} keys / 已加载索引 {class}：{} 键",
      prefix.key_count(),
      prefix.key_count()
    );
    Ok(Composite {
      common: Cow::Borrowed(common),
      prefix,
      suffix,
    })
  }
}
