use zidx::{Composite, Conf, KeyStat, SliceSource, build};

struct SimpleLcg {
  state: u64,
}

impl SimpleLcg {
  fn new(seed: u64) -> Self {
    Self { state: seed }
  }

  fn next(&mut self) -> u64 {
    self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
    self.state
  }

  fn range(&mut self, min: u64, max: u64) -> u64 {
    min + self.next() % (max - min)
  }
}

fn main() {
  let num_keys = 1_000_000;
  println!(
    "
Generating {num_keys} simulated record keys...
正在生成 {num_keys} 个模拟记录键...
"
  );

  // Simulate timestamped record keys: a shared table prefix, a sparse
  // big-endian timestamp head and a short random tail.
  // 模拟带时间戳的记录键：共享的表前缀、稀疏的大端时间戳头和短随机尾。
  let mut rng = SimpleLcg::new(12345);
  let mut stamp = 1_600_000_000_000u64;
  let mut keys = Vec::with_capacity(num_keys);
  for _ in 0..num_keys {
    stamp += rng.range(1, 2000);
    let mut key = b"tbl0/".to_vec();
    key.extend_from_slice(&stamp.to_be_bytes());
    keys.push(key);
  }

  let stat = KeyStat::from_keys(&keys).unwrap();
  let mut src = SliceSource::new(&keys);
  let idx = build(&mut src, &stat, &Conf::from_env()).unwrap();

  let mut artifact = Vec::new();
  let size = idx.save(&mut artifact).unwrap();
  println!("Plan: {} / 计划：{}", idx.wire_name(), idx.wire_name());
  println!(
    "Artifact: {size} bytes for {} key bytes / 工件：{size} 字节，键共 {} 字节",
    stat.sum_key_len, stat.sum_key_len
  );

  // Reopen zero-copy and probe.
  // 零拷贝重开并探测。
  let loaded = Composite::load(&artifact).unwrap();
  let probe = &keys[num_keys / 2];
  println!(
    "find(mid) = {:?}, dict_rank(mid) = {}",
    loaded.find(probe),
    loaded.dict_rank(probe)
  );

  let mut cur = loaded.cursor();
  assert!(cur.seek(probe));
  let mut shown = 0;
  while shown < 3 {
    println!("  {:x?}", cur.key());
    if !cur.next() {
      break;
    }
    shown += 1;
  }
}
