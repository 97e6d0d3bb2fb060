//! Wire-name registry for load-time polymorphism
//! 线上名注册表，支持加载期多态
//!
//! Every buildable (prefix, suffix) pair has a stable ASCII wire name
//! recorded in the artifact header. The registry is process-wide,
//! constructed on first use.
//! 每个可构建的（前缀，后缀）组合都有记录在工件头中的稳定 ASCII 线上
//! 名。注册表为进程级，首次使用时构建。

use std::{collections::HashMap, sync::OnceLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixKind {
  AscAllOne,
  AscIl256,
  AscSe512,
  AscFewZero32,
  AscFewZero64,
  AscFewOne32,
  AscFewOne64,
  NdIl256,
  NdSe512,
  NdFewOne32,
  NdFewOne64,
  Trie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuffixKind {
  Empty,
  Fixed,
  Blob,
}

/// One registered (prefix, suffix) combination.
/// 一个已注册的（前缀，后缀）组合。
#[derive(Debug, Clone, Copy)]
pub struct Factory {
  pub name: &'static str,
  pub prefix: PrefixKind,
  pub suffix: SuffixKind,
}

/// Ascending uint flavors pair with every suffix; non-descending flavors
/// require a discriminating suffix; the trie pairs with every suffix.
/// 升序整数变体可搭配任意后缀；非降变体必须搭配区分后缀；字典树可搭配
/// 任意后缀。
#[rustfmt::skip]
const COMBINATIONS: &[Factory] = &[
  Factory { name: "asc_allone+empty",   prefix: PrefixKind::AscAllOne,   suffix: SuffixKind::Empty },
  Factory { name: "asc_allone+fixed",   prefix: PrefixKind::AscAllOne,   suffix: SuffixKind::Fixed },
  Factory { name: "asc_allone+blob",    prefix: PrefixKind::AscAllOne,   suffix: SuffixKind::Blob },
  Factory { name: "asc_il256+empty",    prefix: PrefixKind::AscIl256,    suffix: SuffixKind::Empty },
  Factory { name: "asc_il256+fixed",    prefix: PrefixKind::AscIl256,    suffix: SuffixKind::Fixed },
  Factory { name: "asc_il256+blob",     prefix: PrefixKind::AscIl256,    suffix: SuffixKind::Blob },
  Factory { name: "asc_se512+empty",    prefix: PrefixKind::AscSe512,    suffix: SuffixKind::Empty },
  Factory { name: "asc_se512+fixed",    prefix: PrefixKind::AscSe512,    suffix: SuffixKind::Fixed },
  Factory { name: "asc_se512+blob",     prefix: PrefixKind::AscSe512,    suffix: SuffixKind::Blob },
  Factory { name: "asc_fewzero32+empty", prefix: PrefixKind::AscFewZero32, suffix: SuffixKind::Empty },
  Factory { name: "asc_fewzero32+fixed", prefix: PrefixKind::AscFewZero32, suffix: SuffixKind::Fixed },
  Factory { name: "asc_fewzero32+blob",  prefix: PrefixKind::AscFewZero32, suffix: SuffixKind::Blob },
  Factory { name: "asc_fewzero64+empty", prefix: PrefixKind::AscFewZero64, suffix: SuffixKind::Empty },
  Factory { name: "asc_fewzero64+fixed", prefix: PrefixKind::AscFewZero64, suffix: SuffixKind::Fixed },
  Factory { name: "asc_fewzero64+blob",  prefix: PrefixKind::AscFewZero64, suffix: SuffixKind::Blob },
  Factory { name: "asc_fewone32+empty", prefix: PrefixKind::AscFewOne32, suffix: SuffixKind::Empty },
  Factory { name: "asc_fewone32+fixed", prefix: PrefixKind::AscFewOne32, suffix: SuffixKind::Fixed },
  Factory { name: "asc_fewone32+blob",  prefix: PrefixKind::AscFewOne32, suffix: SuffixKind::Blob },
  Factory { name: "asc_fewone64+empty", prefix: PrefixKind::AscFewOne64, suffix: SuffixKind::Empty },
  Factory { name: "asc_fewone64+fixed", prefix: PrefixKind::AscFewOne64, suffix: SuffixKind::Fixed },
  Factory { name: "asc_fewone64+blob",  prefix: PrefixKind::AscFewOne64, suffix: SuffixKind::Blob },
  Factory { name: "nd_il256+fixed",     prefix: PrefixKind::NdIl256,     suffix: SuffixKind::Fixed },
  Factory { name: "nd_il256+blob",      prefix: PrefixKind::NdIl256,     suffix: SuffixKind::Blob },
  Factory { name: "nd_se512+fixed",     prefix: PrefixKind::NdSe512,     suffix: SuffixKind::Fixed },
  Factory { name: "nd_se512+blob",      prefix: PrefixKind::NdSe512,     suffix: SuffixKind::Blob },
  Factory { name: "nd_fewone32+fixed",  prefix: PrefixKind::NdFewOne32,  suffix: SuffixKind::Fixed },
  Factory { name: "nd_fewone32+blob",   prefix: PrefixKind::NdFewOne32,  suffix: SuffixKind::Blob },
  Factory { name: "nd_fewone64+fixed",  prefix: PrefixKind::NdFewOne64,  suffix: SuffixKind::Fixed },
  Factory { name: "nd_fewone64+blob",   prefix: PrefixKind::NdFewOne64,  suffix: SuffixKind::Blob },
  Factory { name: "trie+empty",         prefix: PrefixKind::Trie,        suffix: SuffixKind::Empty },
  Factory { name: "trie+fixed",         prefix: PrefixKind::Trie,        suffix: SuffixKind::Fixed },
  Factory { name: "trie+blob",          prefix: PrefixKind::Trie,        suffix: SuffixKind::Blob },
];

static REGISTRY: OnceLock<HashMap<&'static str, Factory>> = OnceLock::new();

fn registry() -> &'static HashMap<&'static str, Factory> {
  REGISTRY.get_or_init(|| {
    let mut map = HashMap::with_capacity(COMBINATIONS.len());
    for f in COMBINATIONS {
      let dup = map.insert(f.name, *f);
      debug_assert!(dup.is_none(), "duplicate wire name {}", f.name);
    }
    map
  })
}

/// Look up a factory by wire name.
/// 按线上名查找工厂。
pub fn factory(name: &str) -> Option<&'static Factory> {
  registry().get(name)
}

/// Wire name of a combination. Panics on a combination that is never
/// built or loaded.
/// 组合的线上名。对永不构建或加载的组合恐慌。
pub fn wire_name(prefix: PrefixKind, suffix: SuffixKind) -> &'static str {
  COMBINATIONS
    .iter()
    .find(|f| f.prefix == prefix && f.suffix == suffix)
    .map(|f| f.name)
    .expect("unregistered combination")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_lookup_roundtrip() {
    for f in COMBINATIONS {
      let got = factory(f.name).unwrap();
      assert_eq!(got.prefix, f.prefix);
      assert_eq!(got.suffix, f.suffix);
      assert_eq!(wire_name(f.prefix, f.suffix), f.name);
    }
    assert!(factory("no_such_class").is_none());
  }
}
