//! Build: materialize the planned composite from the key stream
//! 构建：按规划从键流物化组合索引
//!
//! The stream is re-read once per part through a typed adapter. Records
//! are always stored ascending; a reverse-comparator stream is flipped
//! while collecting.
//! 每个部件经类型化适配器重读一遍流。记录始终按升序存储；反向比较器流
//! 在收集时翻转。

use std::borrow::Cow;

use zidx_blob::StoreBuilder;
use zidx_louds::Trie;
use zidx_rs::{AllOne, BitVec, FewOne, FewZero, Il256, Se512};

use crate::{
  Composite, Conf, Error, KeyStat, Result,
  input::{ChopTail, FixHead, FixHeadTail, KeySource, MinPrefix, MinTail, Tail, WholeKey},
  keystat::common_prefix_len,
  plan::{PlanKind, UintPrefixPlan, choose_uint_prefix},
  prefix::{AscendingUintPrefix, NonDescendingUintPrefix, Prefix, TriePrefix},
  suffix::{BlobStoreSuffix, FixedStringSuffix, Suffix},
  uint::read_be,
};

/// One typed pass over the key stream.
/// 对键流的一遍类型化读取。
trait InputView {
  fn next(&mut self) -> Result<&[u8]>;
}

macro_rules! impl_input_view {
  ($($t:ident),*) => {$(
    impl InputView for $t<'_> {
      fn next(&mut self) -> Result<&[u8]> {
        $t::next(self)
      }
    }
  )*};
}

impl_input_view!(WholeKey, FixHead, FixHeadTail, ChopTail, Tail, MinPrefix, MinTail);

fn collect_rows(mut view: impl InputView, n: usize, desc: bool) -> Result<Vec<Vec<u8>>> {
  let mut rows = Vec::with_capacity(n);
  for _ in 0..n {
    rows.push(view.next()?.to_vec());
  }
  if desc {
    rows.reverse();
  }
  Ok(rows)
}

/// Head values in ascending storage order.
/// 按升序存储次序收集的头值。
fn collect_values(mut view: impl InputView, n: usize, len: usize, desc: bool) -> Result<Vec<u64>> {
  let mut values = Vec::with_capacity(n);
  for _ in 0..n {
    values.push(read_be(view.next()?, len));
  }
  if desc {
    values.reverse();
  }
  Ok(values)
}

fn fixed_suffix(rows: Vec<Vec<u8>>, row_len: usize) -> Suffix<'static> {
  let mut pool = Vec::with_capacity(rows.len() * row_len);
  for row in &rows {
    debug_assert_eq!(row.len(), row_len);
    pool.extend_from_slice(row);
  }
  Suffix::Fixed(FixedStringSuffix::new(pool, row_len, rows.len()))
}

fn blob_suffix(rows: Vec<Vec<u8>>) -> Suffix<'static> {
  let bytes = rows.iter().map(Vec::len).sum();
  let mut builder = StoreBuilder::with_capacity(rows.len(), bytes);
  for row in &rows {
    builder.push(row);
  }
  Suffix::Blob(BlobStoreSuffix::new(builder.finish()))
}

/// Ascending bitmap: one set bit per observed head value.
/// 升序位图：每个出现过的头值一个置位位。
fn asc_bitvec(values: &[u64], min: u64, max: u64) -> BitVec {
  let mut bv = BitVec::zeros((max - min + 1) as usize);
  for &v in values {
    bv.set1((v - min) as usize);
  }
  bv
}

/// Non-descending bitmap: every value's run of ones, one zero after each.
/// 非降位图：每个值的 1 游程，其后各跟一个 0。
fn nd_positions(values: &[u64], min: u64) -> Vec<usize> {
  let mut ones = Vec::with_capacity(values.len());
  let mut pos = 0usize;
  let mut last = min;
  for &v in values {
    debug_assert!(v >= last);
    pos += (v - last) as usize;
    last = v;
    ones.push(pos);
    pos += 1;
  }
  ones
}

fn nd_bitvec(values: &[u64], min: u64, max: u64) -> BitVec {
  let mut bv = BitVec::zeros(values.len() + (max - min) as usize + 1);
  for p in nd_positions(values, min) {
    bv.set1(p);
  }
  bv
}

/// Gap positions of an ascending value sequence.
/// 升序值序列的空隙位置。
fn zero_positions(values: &[u64], min: u64) -> Vec<usize> {
  let mut zeros = Vec::new();
  let mut expected = 0usize;
  for &v in values {
    let p = (v - min) as usize;
    debug_assert!(p >= expected);
    zeros.extend(expected..p);
    expected = p + 1;
  }
  zeros
}

fn build_uint_prefix(
  src: &mut dyn KeySource,
  plan: &UintPrefixPlan,
  cplen: usize,
  desc: bool,
) -> Result<Prefix<'static>> {
  let len = plan.key_length;
  let values = collect_values(FixHead::new(src, cplen, len)?, plan.key_count, len, desc)?;
  debug_assert!(values.first() == Some(&plan.min_value));
  debug_assert!(values.last() == Some(&plan.max_value));
  let (min_value, max_value) = (plan.min_value, plan.max_value);
  let diff = max_value - min_value;

  macro_rules! asc {
    ($variant:ident, $rs:expr) => {
      Prefix::$variant(AscendingUintPrefix { rs: $rs, key_length: len, min_value, max_value })
    };
  }
  macro_rules! nd {
    ($variant:ident, $rs:expr) => {
      Prefix::$variant(NonDescendingUintPrefix { rs: $rs, key_length: len, min_value, max_value })
    };
  }

  Ok(match plan.kind {
    PlanKind::AscAllOne => asc!(AscAllOne, AllOne::new((diff + 1) as usize)),
    PlanKind::AscIl256 => asc!(AscIl256, Il256::new(&asc_bitvec(&values, min_value, max_value))),
    PlanKind::AscSe512 => asc!(AscSe512, Se512::new(&asc_bitvec(&values, min_value, max_value))),
    PlanKind::AscFewOne32 => {
      let ones: Vec<usize> = values.iter().map(|&v| (v - min_value) as usize).collect();
      asc!(AscFewOne32, FewOne::<u32>::build(&ones, (diff + 1) as usize))
    }
    PlanKind::AscFewOne64 => {
      let ones: Vec<usize> = values.iter().map(|&v| (v - min_value) as usize).collect();
      asc!(AscFewOne64, FewOne::<u64>::build(&ones, (diff + 1) as usize))
    }
    PlanKind::AscFewZero32 => {
      let zeros = zero_positions(&values, min_value);
      asc!(AscFewZero32, FewZero::<u32>::build(&zeros, (diff + 1) as usize))
    }
    PlanKind::AscFewZero64 => {
      let zeros = zero_positions(&values, min_value);
      asc!(AscFewZero64, FewZero::<u64>::build(&zeros, (diff + 1) as usize))
    }
    PlanKind::NdIl256 => nd!(NdIl256, Il256::new(&nd_bitvec(&values, min_value, max_value))),
    PlanKind::NdSe512 => nd!(NdSe512, Se512::new(&nd_bitvec(&values, min_value, max_value))),
    PlanKind::NdFewOne32 => {
      let bits = values.len() + diff as usize + 1;
      nd!(NdFewOne32, FewOne::<u32>::build(&nd_positions(&values, min_value), bits))
    }
    PlanKind::NdFewOne64 => {
      let bits = values.len() + diff as usize + 1;
      nd!(NdFewOne64, FewOne::<u64>::build(&nd_positions(&values, min_value), bits))
    }
    PlanKind::Fail => unreachable!("uint build on failed plan"),
  })
}

/// Build the composite from a rewindable stream of sorted keys and their
/// statistics. The planner is total: when no uint head qualifies, a trie
/// over heads or full keys is built instead.
/// 从可回卷的有序键流及其统计构建组合索引。规划器是全函数：无合格整数
/// 头时改为在头或完整键上构建字典树。
pub fn build(src: &mut dyn KeySource, stat: &KeyStat, conf: &Conf) -> Result<Composite<'static>> {
  if stat.key_count == 0 {
    return Err(Error::EmptyInput);
  }
  let n = stat.key_count;
  let desc = stat.descending();
  let cplen = common_prefix_len(&stat.min_key, &stat.max_key);
  debug_assert!(cplen >= stat.common_prefix_len);
  let common = stat.min_key[stat.common_prefix_len..cplen].to_vec();

  let plan = choose_uint_prefix(stat, conf, cplen);
  let (prefix, suffix) = if plan.kind != PlanKind::Fail {
    let prefix = build_uint_prefix(src, &plan, cplen, desc)?;
    let pure = stat.min_key_len == stat.max_key_len && stat.max_key_len == cplen + plan.key_length;
    let suffix = if pure {
      Suffix::Empty
    } else {
      let rows = collect_rows(FixHeadTail::new(src, cplen, plan.key_length)?, n, desc)?;
      if stat.min_key_len == stat.max_key_len {
        fixed_suffix(rows, stat.max_key_len - cplen - plan.key_length)
      } else {
        blob_suffix(rows)
      }
    };
    (prefix, suffix)
  } else {
    build_trie_parts(src, stat, cplen, desc)?
  };

  log::debug!(
    "built index {:?}+{:?}, {} keys / 已构建索引 {:?}+{:?}，{} 键",
    prefix.kind(),
    suffix.kind(),
    n,
    prefix.kind(),
    suffix.kind(),
    n
  );
  Ok(Composite::from_parts(Cow::Owned(common), prefix, suffix))
}

fn build_trie_parts(
  src: &mut dyn KeySource,
  stat: &KeyStat,
  cplen: usize,
  desc: bool,
) -> Result<(Prefix<'static>, Suffix<'static>)> {
  let n = stat.key_count;
  let (heads, mut suffix) = if stat.sum_key_len - stat.min_suffix_len * n < stat.sum_prefix_len * 5 / 4
  {
    // Chop a fixed tail; what remains still separates every key.
    // 砍掉定长尾；剩余部分仍可区分每个键。
    let tail_len = stat.min_suffix_len;
    let heads = collect_rows(ChopTail::new(src, cplen, tail_len)?, n, desc)?;
    let rows = collect_rows(Tail::new(src, tail_len)?, n, desc)?;
    (heads, fixed_suffix(rows, tail_len))
  } else if stat.sum_prefix_len < stat.sum_key_len * 31 / 32 {
    // Split at the minimal distinguishing prefix per key.
    // 按每个键的最小区分前缀切分。
    let heads = collect_rows(MinPrefix::new(src, cplen, n)?, n, desc)?;
    let rows = collect_rows(MinTail::new(src, n)?, n, desc)?;
    let suffix = if stat.min_suffix_len == stat.max_suffix_len {
      fixed_suffix(rows, stat.min_suffix_len)
    } else {
      blob_suffix(rows)
    };
    (heads, suffix)
  } else {
    // Prefixes barely shrink the keys: whole-key trie.
    // 前缀几乎不缩短键：整键字典树。
    (collect_rows(WholeKey::new(src, cplen)?, n, desc)?, Suffix::Empty)
  };

  let trie = Trie::build(&heads)?;
  let prefix = TriePrefix { trie };

  // Word ids are not dict order: permute the suffix rows to id order so
  // the index answers queries before any external reorder happens.
  // 词 id 非字典序：将后缀行重排为 id 序，使索引在外部重排前即可应答。
  if suffix.total_key_size() != 0 {
    let mut map = Vec::new();
    prefix.order_map(&mut map);
    suffix.reorder(&map);
  }
  Ok((Prefix::Trie(prefix), suffix))
}
