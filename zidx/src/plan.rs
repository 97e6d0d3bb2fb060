//! Build planner: pick the head length and succinct flavor
//! 构建规划器：选择头长与简洁变体
//!
//! For every head length in `1..=8` the planner estimates prefix bytes
//! from the bitmap shape and suffix bytes from what remains, keeps the
//! cheapest candidate under `10/6` of the no-prefix baseline, and reports
//! `Fail` when none qualifies so the build falls back to a trie.
//! 规划器对 `1..=8` 的每个头长按位图形态估算前缀字节、按剩余部分估算
//! 后缀字节，保留低于无前缀基线 `10/6` 的最便宜候选；无合格者报告
//! `Fail`，构建随之回退到字典树。

use crate::{Conf, KeyStat, registry::PrefixKind, uint::read_be};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
  Fail,
  AscAllOne,
  AscFewZero32,
  AscFewZero64,
  AscIl256,
  AscSe512,
  AscFewOne32,
  AscFewOne64,
  NdIl256,
  NdSe512,
  NdFewOne32,
  NdFewOne64,
}

impl PlanKind {
  /// The prefix flavor this plan builds.
  /// 该计划构建的前缀变体。
  pub fn prefix_kind(self) -> PrefixKind {
    match self {
      PlanKind::Fail => PrefixKind::Trie,
      PlanKind::AscAllOne => PrefixKind::AscAllOne,
      PlanKind::AscFewZero32 => PrefixKind::AscFewZero32,
      PlanKind::AscFewZero64 => PrefixKind::AscFewZero64,
      PlanKind::AscIl256 => PrefixKind::AscIl256,
      PlanKind::AscSe512 => PrefixKind::AscSe512,
      PlanKind::AscFewOne32 => PrefixKind::AscFewOne32,
      PlanKind::AscFewOne64 => PrefixKind::AscFewOne64,
      PlanKind::NdIl256 => PrefixKind::NdIl256,
      PlanKind::NdSe512 => PrefixKind::NdSe512,
      PlanKind::NdFewOne32 => PrefixKind::NdFewOne32,
      PlanKind::NdFewOne64 => PrefixKind::NdFewOne64,
    }
  }

  #[inline]
  pub fn ascending(self) -> bool {
    matches!(
      self,
      PlanKind::AscAllOne
        | PlanKind::AscFewZero32
        | PlanKind::AscFewZero64
        | PlanKind::AscIl256
        | PlanKind::AscSe512
        | PlanKind::AscFewOne32
        | PlanKind::AscFewOne64
    )
  }
}

#[derive(Debug, Clone, Copy)]
pub struct UintPrefixPlan {
  pub key_length: usize,
  pub key_count: usize,
  /// Distinct heads of this length
  /// 该长度下的互异头数
  pub entry_count: usize,
  pub min_value: u64,
  pub max_value: u64,
  /// Zeros and ones of the bitmap to be built
  /// 待构建位图中 0 与 1 的个数
  pub bit_count0: u64,
  pub bit_count1: u64,
  pub kind: PlanKind,
  /// Estimated total bytes, prefix plus suffix
  /// 估算的前缀加后缀总字节
  pub cost: u64,
}

impl UintPrefixPlan {
  fn fail(key_count: usize) -> Self {
    Self {
      key_length: 0,
      key_count,
      entry_count: 0,
      min_value: 0,
      max_value: 0,
      bit_count0: 0,
      bit_count1: 0,
      kind: PlanKind::Fail,
      cost: 0,
    }
  }
}

/// Enumerate head lengths and keep the cheapest qualifying candidate.
/// 枚举头长并保留最便宜的合格候选。
pub fn choose_uint_prefix(stat: &KeyStat, conf: &Conf, cplen: usize) -> UintPrefixPlan {
  let n = stat.key_count;
  let mut best = UintPrefixPlan::fail(n);
  if stat.min_key_len <= cplen {
    return best;
  }
  let max_len = 8.min(stat.min_key_len - cplen);
  let total_key_size = (stat.sum_key_len - n * cplen) as u64;
  let variable = stat.min_key_len != stat.max_key_len;
  let baseline = total_key_size + if variable { n as u64 } else { 0 };
  let target = baseline * 10 / 6;
  let mut best_cost = u64::MAX;

  // min_key/max_key are first/last; a reverse comparator swaps them.
  // min_key/max_key 为首末键；反向比较器下两者互换。
  let (lo_key, hi_key) = if stat.descending() {
    (&stat.max_key, &stat.min_key)
  } else {
    (&stat.min_key, &stat.max_key)
  };

  for len in 1..=max_len {
    let min_value = read_be(&lo_key[cplen..], len);
    let max_value = read_be(&hi_key[cplen..], len);
    debug_assert!(min_value <= max_value);
    let diff = max_value - min_value;
    if diff == u64::MAX {
      // diff + 1 would overflow every bitmap sizing below.
      // diff + 1 会溢出下方所有位图尺寸计算。
      continue;
    }
    let entry_count = n - stat.pairs_sharing(cplen + len);
    debug_assert!(diff + 1 >= entry_count as u64);
    if entry_count * 2 < n {
      // Heads collide too much to carry information.
      // 头碰撞过多，不携带信息。
      continue;
    }
    let pure = !variable && stat.max_key_len == cplen + len;
    if pure && !conf.enable_uint_index {
      continue;
    }
    if !pure && !conf.enable_composite_uint_index {
      continue;
    }

    let ascending = entry_count == n;
    let bit_count1 = n as u64;
    let bit_count0 = if ascending { diff + 1 - bit_count1 } else { diff + 1 };

    let few_count = bit_count0 / 100 + bit_count1 / 100;
    let (kind, prefix_cost) = if ascending && entry_count as u64 == diff + 1 {
      (PlanKind::AscAllOne, 0)
    } else if bit_count1 < few_count && bit_count1 < 1 << 48 {
      if diff <= u32::MAX as u64 {
        (
          if ascending { PlanKind::AscFewOne32 } else { PlanKind::NdFewOne32 },
          bit_count1 * 4 * 33 / 32,
        )
      } else {
        (
          if ascending { PlanKind::AscFewOne64 } else { PlanKind::NdFewOne64 },
          bit_count1 * 8 * 33 / 32,
        )
      }
    } else if ascending && conf.enable_few_zero && bit_count0 < few_count && bit_count0 < 1 << 48 {
      if diff <= u32::MAX as u64 {
        (PlanKind::AscFewZero32, bit_count0 * 4 * 33 / 32)
      } else {
        (PlanKind::AscFewZero64, bit_count0 * 8 * 33 / 32)
      }
    } else if bit_count0 < 1 << 56 && bit_count1 < 1 << 56 {
      let bits = bit_count0 + bit_count1;
      (
        if bits <= u32::MAX as u64 {
          if ascending { PlanKind::AscIl256 } else { PlanKind::NdIl256 }
        } else if ascending {
          PlanKind::AscSe512
        } else {
          PlanKind::NdSe512
        },
        bits * 21 / 16,
      )
    } else {
      // Sparse materialization would not stay bounded.
      // 稀疏物化的规模无法受控。
      continue;
    };

    let suffix_cost = total_key_size - (len * n) as u64 + if variable { n as u64 } else { 0 };
    let cost = prefix_cost + suffix_cost;
    if cost < best_cost && cost < target {
      best = UintPrefixPlan {
        key_length: len,
        key_count: n,
        entry_count,
        min_value,
        max_value,
        bit_count0,
        bit_count1,
        kind,
        cost,
      };
      best_cost = cost;
    }
  }
  if best.kind != PlanKind::Fail {
    log::debug!(
      "uint prefix plan {:?} len {} cost {} / 整数前缀计划 {:?} 长度 {} 代价 {}",
      best.kind,
      best.key_length,
      best.cost,
      best.kind,
      best.key_length,
      best.cost
    );
  }
  best
}
