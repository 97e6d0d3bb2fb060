use proptest::prelude::*;
use zidx::{Composite, Conf, KeyStat, SliceSource, build};

fn build_keys(keys: &[Vec<u8>]) -> Composite<'static> {
  let stat = KeyStat::from_keys(keys).unwrap();
  let mut src = SliceSource::new(keys);
  build(&mut src, &stat, &Conf::default()).unwrap()
}

/// Record ids related to dictionary order through the order map when the
/// plan reorders.
/// 计划需重排时，记录 id 经重排映射与字典序关联。
fn expected_ids(idx: &Composite<'_>, n: usize) -> Vec<usize> {
  if idx.needs_reorder() {
    let mut map = Vec::new();
    idx.order_map(&mut map);
    let mut inv = vec![0usize; n];
    for (id, &dict) in map.iter().enumerate() {
      inv[dict as usize] = id;
    }
    inv
  } else {
    (0..n).collect()
  }
}

fn check_all(keys: &[Vec<u8>]) -> Result<(), TestCaseError> {
  let idx = build_keys(keys);
  let ids = expected_ids(&idx, keys.len());

  // 1. Round trip.
  // 1. 往返。
  for (i, k) in keys.iter().enumerate() {
    prop_assert_eq!(idx.find(k), Some(ids[i]));
    prop_assert_eq!(idx.dict_rank(k), i);
  }

  // 2/3. Absent keys and rank monotonicity over mutated probes.
  // 2/3. 缺失键与变异探针上的秩单调性。
  let mut probes: Vec<Vec<u8>> = Vec::new();
  for k in keys {
    let mut shorter = k.clone();
    shorter.pop();
    probes.push(shorter);
    let mut longer = k.clone();
    longer.push(0);
    probes.push(longer);
    if let Some((last, _)) = k.split_last() {
      let mut bumped = k.clone();
      *bumped.last_mut().unwrap() = last.wrapping_add(1);
      probes.push(bumped);
    }
  }
  probes.sort();
  let mut prev_rank = 0;
  for p in &probes {
    let expect = keys.partition_point(|k| k < p);
    if !keys.iter().any(|k| k == p) {
      prop_assert_eq!(idx.find(p), None, "absent {:x?}", p);
    }
    let rank = idx.dict_rank(p);
    prop_assert_eq!(rank, expect, "rank {:x?}", p);
    prop_assert!(rank >= prev_rank);
    prev_rank = rank;
  }

  // 4. Iteration order.
  // 4. 迭代顺序。
  let mut cur = idx.cursor();
  prop_assert!(cur.seek_to_first());
  for (i, k) in keys.iter().enumerate() {
    prop_assert_eq!(cur.key(), k.as_slice());
    prop_assert_eq!(cur.id(), Some(ids[i]));
    prop_assert_eq!(cur.dict_rank(), i);
    prop_assert_eq!(cur.next(), i + 1 < keys.len());
  }

  // 5. Seek equivalence.
  // 5. seek 等价性。
  for p in &probes {
    let expect = keys.partition_point(|k| k < p);
    if cur.seek(p) {
      prop_assert_eq!(cur.key(), keys[expect].as_slice());
      prop_assert_eq!(cur.dict_rank(), expect);
    } else {
      prop_assert_eq!(expect, keys.len());
    }
  }

  // 6. Persistence: byte-stable artifact, agreeing queries.
  // 6. 持久化：工件字节稳定，查询一致。
  let mut buf = Vec::new();
  idx.save(&mut buf).unwrap();
  let loaded = Composite::load(&buf).unwrap();
  let mut buf2 = Vec::new();
  loaded.save(&mut buf2).unwrap();
  prop_assert_eq!(&buf, &buf2);
  for (i, k) in keys.iter().enumerate() {
    prop_assert_eq!(loaded.find(k), Some(ids[i]));
  }
  for p in &probes {
    prop_assert_eq!(loaded.dict_rank(p), idx.dict_rank(p));
  }
  Ok(())
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(64))]

  /// Narrow alphabet, heavy prefix sharing: trie-leaning plans.
  /// 窄字母表、前缀高度共享：偏向字典树计划。
  #[test]
  fn prop_string_keys(set in proptest::collection::btree_set(
    proptest::collection::vec(0u8..4, 1..12),
    1..120,
  )) {
    let keys: Vec<Vec<u8>> = set.into_iter().collect();
    check_all(&keys)?;
  }

  /// Fixed-width integer keys: uint-leaning plans.
  /// 定宽整数键：偏向整数计划。
  #[test]
  fn prop_uint_keys(set in proptest::collection::btree_set(any::<u32>(), 1..200)) {
    let keys: Vec<Vec<u8>> = set.into_iter().map(|v| v.to_be_bytes().to_vec()).collect();
    check_all(&keys)?;
  }

  /// Clustered integers with string tails: shared heads, mixed suffixes.
  /// 聚簇整数加字符串尾：共享头、混合后缀。
  #[test]
  fn prop_clustered_keys(
    set in proptest::collection::btree_set(
      (0u16..300, proptest::collection::vec(b'a'..b'd', 0..5)),
      1..150,
    ),
  ) {
    let keys: Vec<Vec<u8>> = set
      .into_iter()
      .map(|(head, tail)| {
        let mut k = head.to_be_bytes().to_vec();
        k.extend_from_slice(&tail);
        k
      })
      .collect();
    check_all(&keys)?;
  }
}
