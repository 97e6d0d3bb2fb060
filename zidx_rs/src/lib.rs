#![cfg_attr(docsrs, feature(doc_cfg))]

//! Succinct rank/select bit sequences
//! 简洁位序列（rank/select）
//!
//! Building blocks for the composite sorted-string index: a mutable bit
//! vector builder, four read-only rank/select flavors (interleaved dense,
//! separate dense, implicit all-one, sparse position lists) and a packed
//! fixed-width integer array. All read-only structures load zero-copy from
//! an 8-byte aligned wire section.
//! 组合有序字符串索引的底层构件：可变位向量构建器、四种只读 rank/select
//! 变体（交错稠密、分离稠密、隐式全一、稀疏位置列表）以及定宽压缩整数
//! 数组。所有只读结构都可以从 8 字节对齐的线上段零拷贝加载。

pub mod allone;
pub mod bits;
pub mod error;
pub mod il256;
pub mod packed;
pub mod se512;
pub mod sparse;
pub mod utils;
pub mod wire;

pub use allone::AllOne;
pub use bits::{BitVec, Words};
pub use error::{Error, Result};
pub use il256::Il256;
pub use packed::PackedUints;
pub use se512::Se512;
pub use sparse::{FewOne, FewZero, Word};
pub use utils::select64;

/// Uniform rank/select contract over an immutable bit sequence.
/// 不可变位序列上的统一 rank/select 契约。
///
/// `rank1(i)` counts ones in `[0, i)`; `select1(k)` is the position of the
/// k-th one (0-indexed). The `*_seq_len` family measures runs: forward from
/// `pos`, or backward ending just before `pos`.
/// `rank1(i)` 统计 `[0, i)` 中 1 的个数；`select1(k)` 是第 k 个 1 的位置
/// （从 0 开始）。`*_seq_len` 系列测量游程：从 `pos` 向前，或在 `pos` 之前
/// 向后结束。
pub trait RankSelect {
  /// Total length in bits.
  /// 总位长。
  fn size(&self) -> usize;

  /// Total count of ones.
  /// 1 的总数。
  fn max_rank1(&self) -> usize;

  /// Total count of zeros.
  /// 0 的总数。
  fn max_rank0(&self) -> usize {
    self.size() - self.max_rank1()
  }

  /// Bit at `pos`.
  /// `pos` 处的位。
  fn get(&self, pos: usize) -> bool;

  /// Count of ones in `[0, pos)`.
  /// `[0, pos)` 中 1 的个数。
  fn rank1(&self, pos: usize) -> usize;

  /// Count of zeros in `[0, pos)`.
  /// `[0, pos)` 中 0 的个数。
  fn rank0(&self, pos: usize) -> usize {
    pos - self.rank1(pos)
  }

  /// Position of the k-th one. `k < max_rank1()`.
  /// 第 k 个 1 的位置。要求 `k < max_rank1()`。
  fn select1(&self, k: usize) -> usize;

  /// Position of the k-th zero. `k < max_rank0()`.
  /// 第 k 个 0 的位置。要求 `k < max_rank0()`。
  fn select0(&self, k: usize) -> usize;

  /// Length of the zero run starting at `pos`.
  /// 从 `pos` 开始的 0 游程长度。
  fn zero_seq_len(&self, pos: usize) -> usize;

  /// Length of the one run starting at `pos`.
  /// 从 `pos` 开始的 1 游程长度。
  fn one_seq_len(&self, pos: usize) -> usize;

  /// Length of the zero run ending just before `pos`.
  /// 在 `pos` 之前结束的 0 游程长度。
  fn zero_seq_revlen(&self, pos: usize) -> usize;

  /// Length of the one run ending just before `pos`.
  /// 在 `pos` 之前结束的 1 游程长度。
  fn one_seq_revlen(&self, pos: usize) -> usize;
}
