use std::borrow::Cow;

use zidx::{Composite, Conf, Error, KeyStat, SliceSource, build};

fn be4(v: u32) -> Vec<u8> {
  v.to_be_bytes().to_vec()
}

fn be8(v: u64) -> Vec<u8> {
  v.to_be_bytes().to_vec()
}

fn build_with(keys: &[Vec<u8>], conf: &Conf) -> Composite<'static> {
  let stat = KeyStat::from_keys(keys).unwrap();
  let mut src = SliceSource::new(keys);
  build(&mut src, &stat, conf).unwrap()
}

fn build_keys(keys: &[Vec<u8>]) -> Composite<'static> {
  build_with(keys, &Conf::default())
}

/// Every stored key must resolve to its record id and its rank. Uint
/// plans use dictionary order as id order; a trie plan's ids are related
/// to dictionary order through the order map.
/// 每个已存键都必须解析到其记录 id 与秩。整数计划的 id 序即字典序；
/// 字典树计划的 id 经重排映射与字典序关联。
fn check_round_trip(idx: &Composite<'_>, keys: &[Vec<u8>]) {
  assert_eq!(idx.num_keys(), keys.len());
  let inverse = if idx.needs_reorder() {
    let mut map = Vec::new();
    idx.order_map(&mut map);
    let mut inv = vec![0usize; map.len()];
    for (id, &dict) in map.iter().enumerate() {
      inv[dict as usize] = id;
    }
    Some(inv)
  } else {
    None
  };
  for (i, k) in keys.iter().enumerate() {
    let id = inverse.as_ref().map_or(i, |inv| inv[i]);
    assert_eq!(idx.find(k), Some(id), "find key {i}");
    assert_eq!(idx.dict_rank(k), i, "rank key {i}");
  }
}

fn check_iteration(idx: &Composite<'_>, keys: &[Vec<u8>]) {
  let mut cur = idx.cursor();
  assert!(cur.seek_to_first());
  for (i, k) in keys.iter().enumerate() {
    assert_eq!(cur.key(), k.as_slice(), "forward key {i}");
    assert_eq!(cur.dict_rank(), i);
    assert_eq!(cur.next(), i + 1 < keys.len());
  }
  assert!(!cur.is_valid());

  assert!(cur.seek_to_last());
  for (i, k) in keys.iter().enumerate().rev() {
    assert_eq!(cur.key(), k.as_slice(), "backward key {i}");
    assert_eq!(cur.prev(), i > 0);
  }
  assert!(!cur.is_valid());
}

fn check_seek(idx: &Composite<'_>, keys: &[Vec<u8>], probe: &[u8]) {
  let expect = keys.partition_point(|k| k.as_slice() < probe);
  let mut cur = idx.cursor();
  if cur.seek(probe) {
    assert_eq!(cur.key(), keys[expect].as_slice(), "seek {probe:x?}");
    assert_eq!(cur.dict_rank(), expect);
  } else {
    assert_eq!(expect, keys.len(), "seek {probe:x?} fell off");
  }
  assert_eq!(idx.dict_rank(probe), expect, "dict_rank {probe:x?}");
}

fn check_persistence(idx: &Composite<'_>, keys: &[Vec<u8>]) {
  let mut buf = Vec::new();
  let size = idx.save(&mut buf).unwrap();
  assert_eq!(size as usize, buf.len());
  let loaded = Composite::load(&buf).unwrap();
  assert_eq!(loaded.wire_name(), idx.wire_name());
  assert_eq!(loaded.num_keys(), idx.num_keys());
  assert_eq!(loaded.total_key_size(), idx.total_key_size());
  check_round_trip(&loaded, keys);
  check_iteration(&loaded, keys);

  // Re-saving the loaded index must reproduce the artifact bit for bit.
  // 重新保存已加载索引必须逐位复现工件。
  let mut buf2 = Vec::new();
  loaded.save(&mut buf2).unwrap();
  assert_eq!(buf, buf2);

  // And the same through a real file.
  // 经真实文件亦然。
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("index.zidx");
  std::fs::write(&path, &buf).unwrap();
  let bytes = std::fs::read(&path).unwrap();
  let loaded = Composite::load(&bytes).unwrap();
  check_round_trip(&loaded, keys);
}

#[test]
fn test_s1_ascending_dense_uints() {
  let keys: Vec<Vec<u8>> = (1..=16u32).map(be4).collect();
  let idx = build_keys(&keys);
  assert_eq!(idx.wire_name(), "asc_allone+empty");
  assert_eq!(idx.find(&be4(5)), Some(4));
  assert_eq!(idx.find(&be4(17)), None);
  assert_eq!(idx.dict_rank(&be4(17)), 16);
  assert_eq!(idx.dict_rank(&be4(0)), 0);
  check_round_trip(&idx, &keys);
  check_iteration(&idx, &keys);
  check_persistence(&idx, &keys);
}

#[test]
fn test_s2_sparse_uints_literal() {
  let keys = vec![be8(100), be8(1_000_000), be8(10_000_000_000)];
  let idx = build_keys(&keys);
  assert_eq!(idx.find(&be8(1_000_000)), Some(1));
  assert_eq!(idx.dict_rank(&be8(500_000)), 1);
  assert_eq!(idx.dict_rank(&be8(100)), 0);
  assert_eq!(idx.dict_rank(&be8(20_000_000_000)), 3);
  check_round_trip(&idx, &keys);
  check_iteration(&idx, &keys);
  for p in [be8(0), be8(100), be8(101), be8(999_999_999), be8(u64::MAX)] {
    check_seek(&idx, &keys, &p);
  }
  check_persistence(&idx, &keys);
}

#[test]
fn test_planner_picks_fewone64() {
  // Heads collide three ways at every shorter split, so only the full
  // six-byte head survives, with a spread past 32 bits.
  // 更短切分下头三路碰撞，只有跨度超 32 位的完整六字节头可行。
  let mut keys = Vec::new();
  for j in 0..200u64 {
    for t in 1..=3u64 {
      keys.push(be8(j << 33 | t));
    }
  }
  let idx = build_keys(&keys);
  assert_eq!(idx.wire_name(), "asc_fewone64+empty");
  check_round_trip(&idx, &keys);
  for p in [be8(5 << 33), be8(5 << 33 | 2), be8(1), be8(u64::MAX)] {
    check_seek(&idx, &keys, &p);
  }
  check_persistence(&idx, &keys);
}

#[test]
fn test_s3_shared_heads_literal() {
  let keys = vec![b"AAAx".to_vec(), b"AAAy".to_vec(), b"AABa".to_vec()];
  let idx = build_keys(&keys);
  assert_eq!(idx.find(b"AAAy"), Some(1));
  assert_eq!(idx.find(b"AAAz"), None);
  let mut cur = idx.cursor();
  assert!(cur.seek(b"AAAw"));
  assert_eq!(cur.key(), b"AAAx");
  assert_eq!(cur.id(), Some(0));
  assert!(cur.seek(b"AAAz"));
  assert_eq!(cur.key(), b"AABa");
  check_round_trip(&idx, &keys);
  check_iteration(&idx, &keys);
  for p in [&b"AA"[..], b"AAA", b"AAAx", b"AAAxx", b"AAB", b"AABb", b"B"] {
    check_seek(&idx, &keys, p);
  }
  check_persistence(&idx, &keys);
}

#[test]
fn test_planner_picks_nd_il256() {
  // 500 two-byte heads, two keys each: group runs force the
  // non-descending bitmap, and the dense spread rules out sparse lists.
  // 500 个双字节头、各两键：组游程要求非降位图，稠密跨度排除稀疏表。
  let mut keys = Vec::new();
  for i in 0..500u32 {
    let mut head = vec![b'Z'];
    head.extend_from_slice(&(2 * i as u64).to_be_bytes()[5..]);
    for t in [b'x', b'y'] {
      let mut k = head.clone();
      k.push(t);
      keys.push(k);
    }
  }
  let idx = build_keys(&keys);
  assert_eq!(idx.wire_name(), "nd_il256+fixed");
  check_round_trip(&idx, &keys);
  check_iteration(&idx, &keys);
  let mut probe = keys[500].clone();
  probe.pop();
  probe.push(b'w');
  check_seek(&idx, &keys, &probe);
  probe.pop();
  probe.push(b'z');
  check_seek(&idx, &keys, &probe);
  check_seek(&idx, &keys, b"Z");
  check_seek(&idx, &keys, b"Zz");
  check_persistence(&idx, &keys);
}

#[test]
fn test_s4_trie_fallback() {
  let keys: Vec<Vec<u8>> =
    ["apple", "banana", "band", "bandage", "cat"].iter().map(|s| s.as_bytes().to_vec()).collect();
  let idx = build_keys(&keys);
  assert!(idx.wire_name().starts_with("trie+"), "got {}", idx.wire_name());
  // apple, banana, band and bandage all order below "bane".
  // apple、banana、band 与 bandage 都排在 "bane" 之前。
  assert_eq!(idx.dict_rank(b"bane"), 4);
  assert_eq!(idx.dict_rank(b"banda"), 3);
  assert_eq!(idx.find(b"ban"), None);
  assert_eq!(idx.find(b"bandag"), None);
  check_round_trip(&idx, &keys);
  check_iteration(&idx, &keys);
  for p in [&b"a"[..], b"apple", b"applf", b"b", b"bandages", b"cat", b"cats", b"z"] {
    check_seek(&idx, &keys, p);
  }
  check_persistence(&idx, &keys);
}

#[test]
fn test_s5_trie_blob_urls() {
  use rand::{Rng, SeedableRng, rngs::StdRng};
  let mut rng = StdRng::seed_from_u64(17);
  let mut keys: Vec<Vec<u8>> = (0..1000)
    .map(|i| {
      let mut k = format!("https://example.com/{}/", i % 37).into_bytes();
      let len = rng.random_range(5..60);
      for _ in 0..len {
        k.push(rng.random_range(b'a'..=b'z'));
      }
      k
    })
    .collect();
  keys.sort();
  keys.dedup();
  let idx = build_keys(&keys);
  assert_eq!(idx.wire_name(), "trie+blob");
  check_round_trip(&idx, &keys);
  check_iteration(&idx, &keys);
  for _ in 0..200 {
    let i = rng.random_range(0..keys.len());
    let mut probe = keys[i].clone();
    match rng.random_range(0..4) {
      0 => {
        probe.pop();
      }
      1 => probe.push(rng.random_range(0..=255)),
      2 => {
        let j = rng.random_range(0..probe.len());
        probe[j] = probe[j].wrapping_add(1);
      }
      _ => {}
    }
    check_seek(&idx, &keys, &probe);
  }
  check_persistence(&idx, &keys);
}

#[test]
fn test_s6_reorder_map() {
  let keys: Vec<Vec<u8>> =
    ["apple", "banana", "band", "bandage", "cat"].iter().map(|s| s.as_bytes().to_vec()).collect();
  let idx = build_keys(&keys);
  assert!(idx.needs_reorder());
  let mut map = Vec::new();
  idx.order_map(&mut map);
  assert_eq!(map.len(), keys.len());
  let mut sorted = map.clone();
  sorted.sort_unstable();
  assert_eq!(sorted, (0..keys.len() as u64).collect::<Vec<_>>());
  // Walking keys in dictionary order visits ids whose mapped old
  // positions count 0, 1, 2, ...
  // 按字典序遍历键时，所经 id 映射的旧位置依次为 0、1、2……
  let mut cur = idx.cursor();
  assert!(cur.seek_to_first());
  let mut r = 0u64;
  loop {
    assert_eq!(map[cur.id().unwrap()], r);
    r += 1;
    if !cur.next() {
      break;
    }
  }
  assert_eq!(r, keys.len() as u64);

  // Uint plans never reorder.
  // 整数计划从不重排。
  let uint_idx = build_keys(&(1..=16u32).map(be4).collect::<Vec<_>>());
  assert!(!uint_idx.needs_reorder());
}

#[test]
fn test_few_zero_toggle() {
  let keys: Vec<Vec<u8>> = (0..3000u32)
    .filter(|v| !matches!(v, 100 | 777 | 1024 | 2048 | 2998))
    .map(|v| v.to_be_bytes()[1..].to_vec())
    .collect();
  let idx = build_keys(&keys);
  assert_eq!(idx.wire_name(), "asc_il256+empty");
  check_round_trip(&idx, &keys);

  let conf = Conf {
    enable_few_zero: true,
    ..Conf::default()
  };
  let idx = build_with(&keys, &conf);
  assert_eq!(idx.wire_name(), "asc_fewzero32+empty");
  check_round_trip(&idx, &keys);
  check_iteration(&idx, &keys);
  let probes = [be4(100)[1..].to_vec(), be4(1500)[1..].to_vec(), be4(3000)[1..].to_vec()];
  for p in &probes {
    check_seek(&idx, &keys, p);
  }
  check_persistence(&idx, &keys);
}

#[test]
fn test_uint_toggles_force_trie() {
  let keys: Vec<Vec<u8>> = (1..=16u32).map(be4).collect();
  let conf = Conf {
    enable_uint_index: false,
    enable_composite_uint_index: false,
    ..Conf::default()
  };
  let idx = build_with(&keys, &conf);
  assert!(idx.wire_name().starts_with("trie+"), "got {}", idx.wire_name());
  check_round_trip(&idx, &keys);
  check_iteration(&idx, &keys);
}

#[test]
fn test_descending_input_matches_ascending() {
  // One dataset lands on a uint bitmap, the other on a trie; both must
  // come out identical to their ascending builds.
  // 一组落在整数位图上，另一组落在字典树上；两者都必须与升序构建完全
  // 一致。
  let il256_keys: Vec<Vec<u8>> = (0..3000u32).map(|v| v.to_be_bytes()[1..].to_vec()).collect();
  let trie_keys: Vec<Vec<u8>> = (0..200u32).map(|i| be4(i * 7 + 3)).collect();
  for keys in [il256_keys, trie_keys] {
    let asc = build_keys(&keys);
    let mut rev = keys.clone();
    rev.reverse();
    let stat = KeyStat::from_keys(&rev).unwrap();
    assert!(stat.descending());
    let mut src = SliceSource::new(&rev);
    let desc = build(&mut src, &stat, &Conf::default()).unwrap();

    assert_eq!(asc.wire_name(), desc.wire_name());
    let mut a = Vec::new();
    let mut d = Vec::new();
    asc.save(&mut a).unwrap();
    desc.save(&mut d).unwrap();
    assert_eq!(a, d);
    check_round_trip(&desc, &keys);
    check_iteration(&desc, &keys);
  }
}

#[test]
fn test_key_equal_to_common_prefix() {
  let keys = vec![b"ab".to_vec(), b"abc".to_vec()];
  let idx = build_keys(&keys);
  check_round_trip(&idx, &keys);
  check_iteration(&idx, &keys);
  for p in [&b"a"[..], b"ab", b"abb", b"abc", b"abcd", b"b"] {
    check_seek(&idx, &keys, p);
  }
  check_persistence(&idx, &keys);
}

#[test]
fn test_single_key() {
  let keys = vec![b"lonely".to_vec()];
  let idx = build_keys(&keys);
  check_round_trip(&idx, &keys);
  check_iteration(&idx, &keys);
  for p in [&b"a"[..], b"lonely", b"lonelz", b"z"] {
    check_seek(&idx, &keys, p);
  }
  check_persistence(&idx, &keys);
}

#[test]
fn test_load_rejects_garbage() {
  let keys: Vec<Vec<u8>> = (1..=16u32).map(be4).collect();
  let idx = build_keys(&keys);
  let mut buf = Vec::new();
  idx.save(&mut buf).unwrap();

  // Truncated header and truncated body.
  // 截断的头与截断的体。
  assert!(matches!(Composite::load(&buf[..64]), Err(Error::Truncated { .. })));
  assert!(Composite::load(&buf[..buf.len() - 8]).is_err());

  // Bad magic.
  // 错误魔数。
  let mut bad = buf.clone();
  bad[1] = b'X';
  assert!(matches!(Composite::load(&bad), Err(Error::BadMagic)));

  // Unknown class name.
  // 未知类名。
  let mut bad = buf.clone();
  bad[20] = b'q';
  assert!(matches!(Composite::load(&bad), Err(Error::UnknownClass(_))));
}

#[test]
fn test_direct_se512_composite() {
  use zidx_rs::{BitVec, Se512};
  // The planner only reaches Se512 past 2^32 bits; pin its wire path with
  // a hand-assembled small instance.
  // 规划器仅在超过 2^32 位时选到 Se512；用手工装配的小实例钉住其线上
  // 路径。
  let values = [3u64, 9, 700, 701, 1300];
  let mut bv = BitVec::zeros(1298);
  for &v in &values {
    bv.set1((v - 3) as usize);
  }
  let prefix = zidx::prefix::Prefix::AscSe512(zidx::prefix::AscendingUintPrefix {
    rs: Se512::new(&bv),
    key_length: 2,
    min_value: 3,
    max_value: 1300,
  });
  let idx = Composite::from_parts(Cow::Owned(Vec::new()), prefix, zidx::suffix::Suffix::Empty);
  assert_eq!(idx.wire_name(), "asc_se512+empty");
  let keys: Vec<Vec<u8>> = values.iter().map(|&v| (v as u16).to_be_bytes().to_vec()).collect();
  check_round_trip(&idx, &keys);
  check_iteration(&idx, &keys);
  for p in [&[0u8, 2][..], &[0, 3], &[0, 10], &[2, 200], &[5, 21]] {
    check_seek(&idx, &keys, p);
  }
  check_persistence(&idx, &keys);
}

#[test]
fn test_direct_trie_empty_composite() {
  use zidx_louds::Trie;
  let keys: Vec<Vec<u8>> =
    ["", "alpha", "beta", "betamax", "gamma"].iter().map(|s| s.as_bytes().to_vec()).collect();
  let trie = Trie::build(&keys).unwrap();
  let prefix = zidx::prefix::Prefix::Trie(zidx::prefix::TriePrefix { trie });
  let idx = Composite::from_parts(Cow::Owned(Vec::new()), prefix, zidx::suffix::Suffix::Empty);
  assert_eq!(idx.wire_name(), "trie+empty");
  check_round_trip(&idx, &keys);
  check_iteration(&idx, &keys);
  for p in [&b""[..], b"a", b"beta", b"betam", b"z"] {
    check_seek(&idx, &keys, p);
  }
  check_persistence(&idx, &keys);
}
