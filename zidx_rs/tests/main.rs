use zidx_rs::{AllOne, BitVec, FewOne, FewZero, Il256, PackedUints, RankSelect, Se512};

fn bv_from(bits: &[bool]) -> BitVec {
  let mut bv = BitVec::new();
  for &b in bits {
    bv.push(b);
  }
  bv
}

/// Brute-force checks of the whole contract against the raw bits.
/// 按原始位暴力校验整个契约。
fn check_contract(rs: &impl RankSelect, bits: &[bool]) {
  assert_eq!(rs.size(), bits.len());
  let ones: Vec<usize> = (0..bits.len()).filter(|&i| bits[i]).collect();
  let zeros: Vec<usize> = (0..bits.len()).filter(|&i| !bits[i]).collect();
  assert_eq!(rs.max_rank1(), ones.len());
  assert_eq!(rs.max_rank0(), zeros.len());

  let mut r1 = 0;
  for pos in 0..=bits.len() {
    assert_eq!(rs.rank1(pos), r1, "rank1({pos})");
    assert_eq!(rs.rank0(pos), pos - r1, "rank0({pos})");
    if pos < bits.len() {
      assert_eq!(rs.get(pos), bits[pos], "get({pos})");
      if bits[pos] {
        r1 += 1;
      }
    }
  }
  for (k, &p) in ones.iter().enumerate() {
    assert_eq!(rs.select1(k), p, "select1({k})");
  }
  for (k, &p) in zeros.iter().enumerate() {
    assert_eq!(rs.select0(k), p, "select0({k})");
  }
  for pos in 0..bits.len() {
    let zl = bits[pos..].iter().take_while(|&&b| !b).count();
    let ol = bits[pos..].iter().take_while(|&&b| b).count();
    assert_eq!(rs.zero_seq_len(pos), zl, "zero_seq_len({pos})");
    assert_eq!(rs.one_seq_len(pos), ol, "one_seq_len({pos})");
  }
  for pos in 0..=bits.len() {
    let zr = bits[..pos].iter().rev().take_while(|&&b| !b).count();
    let or = bits[..pos].iter().rev().take_while(|&&b| b).count();
    assert_eq!(rs.zero_seq_revlen(pos), zr, "zero_seq_revlen({pos})");
    assert_eq!(rs.one_seq_revlen(pos), or, "one_seq_revlen({pos})");
  }
}

fn pattern(len: usize, f: impl Fn(usize) -> bool) -> Vec<bool> {
  (0..len).map(f).collect()
}

#[test]
fn test_il256_patterns() {
  for bits in [
    pattern(1, |_| true),
    pattern(600, |i| i % 3 == 0),
    pattern(1030, |i| i % 7 < 2),
    pattern(256, |_| true),
    pattern(513, |i| i >= 500),
    pattern(300, |i| i < 10),
  ] {
    let rs = Il256::new(&bv_from(&bits));
    check_contract(&rs, &bits);
  }
}

#[test]
fn test_se512_patterns() {
  for bits in [
    pattern(1, |i| i == 0),
    pattern(512, |i| i % 2 == 0),
    pattern(1500, |i| i % 11 < 3),
    pattern(2048, |i| i / 64 % 2 == 0),
  ] {
    let rs = Se512::new(&bv_from(&bits));
    check_contract(&rs, &bits);
  }
}

#[test]
fn test_allone() {
  let bits = pattern(100, |_| true);
  let rs = AllOne::new(100);
  assert_eq!(rs.size(), 100);
  assert_eq!(rs.max_rank1(), 100);
  assert_eq!(rs.rank1(40), 40);
  assert_eq!(rs.select1(7), 7);
  assert_eq!(rs.one_seq_len(10), 90);
  assert_eq!(rs.one_seq_revlen(10), 10);
  assert_eq!(rs.zero_seq_len(10), 0);
  let _ = bits;
}

#[test]
fn test_fewone_patterns() {
  for bits in [
    pattern(1000, |i| i == 100 || i == 500 || i == 501 || i == 502 || i == 999),
    pattern(80, |i| i < 3),
    pattern(64, |i| i == 63),
  ] {
    let ones: Vec<usize> = (0..bits.len()).filter(|&i| bits[i]).collect();
    let rs = FewOne::<u32>::build(&ones, bits.len());
    check_contract(&rs, &bits);
    let rs = FewOne::<u64>::build(&ones, bits.len());
    check_contract(&rs, &bits);
  }
}

#[test]
fn test_fewzero_patterns() {
  for bits in [
    pattern(1000, |i| !(i == 0 || i == 77 || i == 78 || i == 999)),
    pattern(100, |i| i != 50),
  ] {
    let zeros: Vec<usize> = (0..bits.len()).filter(|&i| !bits[i]).collect();
    let rs = FewZero::<u32>::build(&zeros, bits.len());
    check_contract(&rs, &bits);
    let rs = FewZero::<u64>::build(&zeros, bits.len());
    check_contract(&rs, &bits);
  }
}

#[test]
fn test_il256_save_load() {
  let bits = pattern(700, |i| i % 5 == 1);
  let rs = Il256::new(&bv_from(&bits));
  let mut buf = Vec::new();
  let written = rs.save(&mut buf).unwrap();
  assert_eq!(written, buf.len());
  assert_eq!(written % 8, 0);
  let (loaded, consumed) = Il256::load(&buf).unwrap();
  assert_eq!(consumed, written);
  check_contract(&loaded, &bits);
}

#[test]
fn test_se512_save_load() {
  let bits = pattern(1100, |i| i % 9 < 4);
  let rs = Se512::new(&bv_from(&bits));
  let mut buf = Vec::new();
  let written = rs.save(&mut buf).unwrap();
  let (loaded, consumed) = Se512::load(&buf).unwrap();
  assert_eq!(consumed, written);
  check_contract(&loaded, &bits);
}

#[test]
fn test_sparse_save_load() {
  let ones = vec![3usize, 64, 65, 901];
  let rs = FewOne::<u32>::build(&ones, 1000);
  let mut buf = Vec::new();
  let written = rs.save(&mut buf).unwrap();
  assert_eq!(written % 8, 0);
  let (loaded, consumed) = FewOne::<u32>::load(&buf).unwrap();
  assert_eq!(consumed, written);
  assert_eq!(loaded.select1(2), 65);
  assert_eq!(loaded.rank1(65), 2);
}

#[test]
fn test_load_truncated() {
  let bits = pattern(700, |i| i % 5 == 1);
  let rs = Il256::new(&bv_from(&bits));
  let mut buf = Vec::new();
  rs.save(&mut buf).unwrap();
  assert!(Il256::load(&buf[..10]).is_err());
  assert!(Il256::load(&buf[..buf.len() - 8]).is_err());
}

#[test]
fn test_packed_uints() {
  let values: Vec<u64> = (0..300).map(|i| i * 37 % 1000).collect();
  let p = PackedUints::build(&values);
  assert_eq!(p.len(), 300);
  for (i, &v) in values.iter().enumerate() {
    assert_eq!(p.get(i), v, "get({i})");
  }

  let mut buf = Vec::new();
  let written = p.save(&mut buf).unwrap();
  let (loaded, consumed) = PackedUints::load(&buf).unwrap();
  assert_eq!(consumed, written);
  for (i, &v) in values.iter().enumerate() {
    assert_eq!(loaded.get(i), v);
  }
}

#[test]
fn test_packed_wide_values() {
  let values = vec![0, u64::MAX / 2, u64::MAX];
  let p = PackedUints::build(&values);
  assert_eq!(p.width(), 64);
  for (i, &v) in values.iter().enumerate() {
    assert_eq!(p.get(i), v);
  }
}

#[test]
fn test_bitvec_resize_set1() {
  let mut bv = BitVec::new();
  bv.resize(130);
  bv.set1(0);
  bv.set1(64);
  bv.set1(129);
  assert!(bv.get(0) && bv.get(64) && bv.get(129));
  assert!(!bv.get(1) && !bv.get(128));
  assert_eq!(bv.count_ones(), 3);
}

#[test]
fn test_bitvec_push_int_roundtrip() {
  let mut bv = BitVec::new();
  bv.push_int(0b1011, 4);
  bv.push_int(1234567, 21);
  bv.push_int(u64::MAX, 64);
  let words = bv.into_words();
  // First 4 bits then 21 bits then 64 bits across word boundaries.
  assert_eq!(words.word(0) & 0xF, 0b1011);
  assert_eq!((words.word(0) >> 4) & ((1 << 21) - 1), 1234567);
}
