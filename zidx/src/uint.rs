//! Bounded big-endian uint codec for key heads
//! 键头的受限大端整数编解码
//!
//! Heads are at most 8 bytes and always flow through a fixed buffer with
//! explicit padding; no pointer casts, no partial reads.
//! 键头最长 8 字节，始终经由固定缓冲区并显式填充；无指针转换，无部分
//! 读取。

/// Read exactly `len` leading bytes big-endian. `len <= 8`,
/// `bytes.len() >= len`.
/// 以大端读取恰好 `len` 个前导字节。要求 `len <= 8` 且
/// `bytes.len() >= len`。
#[inline]
pub fn read_be(bytes: &[u8], len: usize) -> u64 {
  debug_assert!(len <= 8 && bytes.len() >= len);
  let mut buf = [0u8; 8];
  buf[8 - len..].copy_from_slice(&bytes[..len]);
  u64::from_be_bytes(buf)
}

/// Read up to `len` leading bytes big-endian, zero-padding on the low side
/// when fewer are available. The padded value is the smallest `len`-byte
/// extension of the input, which is what lower-bound seeks need.
/// 以大端读取至多 `len` 个前导字节，不足时在低位补零。补零值是输入的
/// 最小 `len` 字节扩展，正是下界查找所需。
#[inline]
pub fn read_be_padded(bytes: &[u8], len: usize) -> u64 {
  debug_assert!(len <= 8);
  let take = len.min(bytes.len());
  let mut buf = [0u8; 8];
  buf[8 - len..8 - len + take].copy_from_slice(&bytes[..take]);
  u64::from_be_bytes(buf)
}

/// Write `value` big-endian into the first `len` bytes of `out`.
/// 将 `value` 以大端写入 `out` 的前 `len` 字节。
#[inline]
pub fn write_be(value: u64, len: usize, out: &mut [u8; 8]) {
  debug_assert!(len <= 8);
  debug_assert!(len == 8 || value < 1u64 << (len * 8));
  let be = value.to_be_bytes();
  out[..len].copy_from_slice(&be[8 - len..]);
}
