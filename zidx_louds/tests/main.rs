use zidx_louds::{Cursor, Error, Trie};

fn build(keys: &[&str]) -> Trie<'static> {
  Trie::build(keys).unwrap()
}

const WORDS: &[&str] = &["apple", "banana", "band", "bandage", "cat"];

#[test]
fn test_index_exact() {
  let trie = build(WORDS);
  assert_eq!(trie.num_words(), 5);
  for (i, w) in WORDS.iter().enumerate() {
    let id = trie.index(w.as_bytes()).unwrap();
    // Word ids are BFS ranks; dict rank must recover sorted order.
    // 词 id 为 BFS 秩；字典秩应还原有序顺序。
    assert_eq!(trie.dict_rank_of(id), i, "word {w}");
  }
  assert_eq!(trie.index(b"ban"), None);
  assert_eq!(trie.index(b"bandages"), None);
  assert_eq!(trie.index(b""), None);
}

#[test]
fn test_dict_rank() {
  let trie = build(WORDS);
  assert_eq!(trie.dict_rank(b"a"), 0);
  assert_eq!(trie.dict_rank(b"apple"), 0);
  assert_eq!(trie.dict_rank(b"applf"), 1);
  assert_eq!(trie.dict_rank(b"bane"), 3);
  assert_eq!(trie.dict_rank(b"bandage"), 3);
  assert_eq!(trie.dict_rank(b"zebra"), 5);
}

#[test]
fn test_cursor_iteration() {
  let trie = build(WORDS);
  let mut cur = Cursor::new(&trie);
  assert!(cur.seek_to_first());
  let mut seen = Vec::new();
  loop {
    seen.push(String::from_utf8(cur.word().to_vec()).unwrap());
    if !cur.incr() {
      break;
    }
  }
  assert_eq!(seen, WORDS);

  assert!(cur.seek_to_last());
  let mut rev = Vec::new();
  loop {
    rev.push(String::from_utf8(cur.word().to_vec()).unwrap());
    if !cur.decr() {
      break;
    }
  }
  rev.reverse();
  assert_eq!(rev, WORDS);
}

#[test]
fn test_cursor_lower_bound() {
  let trie = build(WORDS);
  let mut cur = Cursor::new(&trie);
  assert!(cur.seek_lower_bound(b"bane"));
  assert_eq!(cur.word(), b"cat");
  assert_eq!(cur.dict_rank(), 4);

  assert!(cur.seek_lower_bound(b"band"));
  assert_eq!(cur.word(), b"band");

  assert!(cur.seek_lower_bound(b""));
  assert_eq!(cur.word(), b"apple");

  assert!(!cur.seek_lower_bound(b"dog"));
  assert!(!cur.is_valid());
}

#[test]
fn test_cover_lower_bound_stops_at_prefix_word() {
  let trie = build(WORDS);
  let mut cur = Cursor::new(&trie);
  // "band" is a stored word and a strict prefix of the target; plain lower
  // bound passes it, the cover variant must not.
  // "band" 是已存词且为目标的严格前缀；普通下界会跳过它，cover 变体不能。
  assert!(cur.seek_lower_bound(b"bandz"));
  assert_eq!(cur.word(), b"cat");
  assert!(cur.seek_cover_lower_bound(b"bandz"));
  assert_eq!(cur.word(), b"band");
}

#[test]
fn test_cover_continue_walks_the_chain() {
  // Words "a", "ab", "abc" chain under the target; "aa" sits between the
  // first two in dictionary order but is no prefix of it.
  // 词 "a"、"ab"、"abc" 在目标下成链；"aa" 按字典序落在前两者之间，但
  // 不是目标的前缀。
  let trie = build(&["a", "aa", "ab", "abc", "abd"]);
  let mut cur = Cursor::new(&trie);
  assert!(cur.seek_cover_lower_bound(b"abcz"));
  assert_eq!(cur.word(), b"a");
  assert!(cur.seek_cover_continue(b"abcz"));
  assert_eq!(cur.word(), b"ab");
  assert!(cur.seek_cover_continue(b"abcz"));
  assert_eq!(cur.word(), b"abc");
  // Past the chain: the plain lower bound within what is left.
  // 链尽之后：剩余部分中的普通下界。
  assert!(cur.seek_cover_continue(b"abcz"));
  assert_eq!(cur.word(), b"abd");
}

#[test]
fn test_empty_word() {
  let trie = build(&["", "a", "ab"]);
  assert_eq!(trie.index(b"").unwrap_or(99), trie.index(b"").unwrap());
  assert_eq!(trie.dict_rank(b""), 0);
  assert_eq!(trie.dict_rank(b"a"), 1);
  let mut cur = Cursor::new(&trie);
  assert!(cur.seek_to_first());
  assert_eq!(cur.word(), b"");
  assert!(cur.incr());
  assert_eq!(cur.word(), b"a");
  assert!(cur.decr());
  assert_eq!(cur.word(), b"");
}

#[test]
fn test_unsorted_rejected() {
  let err = Trie::build(&["b", "a"]).unwrap_err();
  assert!(matches!(err, Error::Unsorted(1)));
  let err = Trie::build(&["a", "a"]).unwrap_err();
  assert!(matches!(err, Error::Unsorted(1)));
}

#[test]
fn test_order_map_is_permutation() {
  let trie = build(WORDS);
  let mut map = Vec::new();
  trie.order_map(&mut map);
  assert_eq!(map.len(), 5);
  let mut sorted = map.clone();
  sorted.sort_unstable();
  assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
  // Walking in dictionary order must visit old ids 0, 1, 2, ...
  // 按字典序遍历应依次访问旧 id 0、1、2……
  let mut cur = Cursor::new(&trie);
  assert!(cur.seek_to_first());
  let mut r = 0;
  loop {
    assert_eq!(map[cur.word_id()] as usize, r);
    r += 1;
    if !cur.incr() {
      break;
    }
  }
}

#[test]
fn test_save_load() {
  let trie = build(WORDS);
  let mut buf = Vec::new();
  let written = trie.save(&mut buf).unwrap();
  assert_eq!(written, buf.len());
  assert_eq!(written % 8, 0);
  let (loaded, consumed) = Trie::load(&buf).unwrap();
  assert_eq!(consumed, written);
  assert_eq!(loaded.num_words(), 5);
  for (i, w) in WORDS.iter().enumerate() {
    let id = loaded.index(w.as_bytes()).unwrap();
    assert_eq!(loaded.dict_rank_of(id), i);
  }
  assert_eq!(loaded.dict_rank(b"bane"), 3);
}

#[test]
fn test_build_cache() {
  let mut trie = build(WORDS);
  trie.build_cache(0.0);
  assert_eq!(trie.index(b"cat"), build(WORDS).index(b"cat"));
  trie.build_cache(0.5);
  for w in WORDS {
    assert!(trie.index(w.as_bytes()).is_some());
  }
  assert_eq!(trie.index(b"dog"), None);
}

#[test]
fn test_large_random_set() {
  use rand::{Rng, SeedableRng, rngs::StdRng};
  let mut rng = StdRng::seed_from_u64(3);
  let mut keys: Vec<Vec<u8>> = (0..2000)
    .map(|_| {
      let len = rng.random_range(1..20);
      (0..len).map(|_| rng.random_range(b'a'..=b'f')).collect()
    })
    .collect();
  keys.sort();
  keys.dedup();
  let trie = Trie::build(&keys).unwrap();
  assert_eq!(trie.num_words(), keys.len());
  for (i, k) in keys.iter().enumerate() {
    let id = trie.index(k).unwrap();
    assert_eq!(trie.dict_rank_of(id), i);
    assert_eq!(trie.dict_rank(k), i);
  }
  // Lower bounds against the offline list.
  // 与离线列表对照的下界。
  let mut cur = Cursor::new(&trie);
  for _ in 0..500 {
    let len = rng.random_range(1..20);
    let probe: Vec<u8> = (0..len).map(|_| rng.random_range(b'a'..=b'g')).collect();
    let expect = keys.partition_point(|k| k.as_slice() < probe.as_slice());
    if cur.seek_lower_bound(&probe) {
      assert_eq!(cur.dict_rank(), expect);
      assert_eq!(cur.word(), keys[expect].as_slice());
    } else {
      assert_eq!(expect, keys.len());
    }
    assert_eq!(trie.dict_rank(&probe), expect);
  }
}
