#![cfg_attr(docsrs, feature(doc_cfg))]

//! Composite sorted-string index
//! 组合有序字符串索引
//!
//! Maps sorted byte-string keys to dense record ids `[0, N)` for one SST
//! file. Every key splits into `common ‖ head ‖ tail`: the shared common
//! prefix is stored once, the head goes into a *prefix representation*
//! (ascending uint bitmap, non-descending uint bitmap, or LOUDS trie) and
//! the tail into a *suffix representation* (empty, fixed rows, or blob
//! store). A cost-model planner picks the cheapest pair from key
//! statistics. Built once, saved to an 8-aligned artifact, reopened
//! zero-copy for point lookups, rank queries and ordered iteration.
//! 将一个 SST 文件的有序字节串键映射为致密记录 id `[0, N)`。每个键拆为
//! `common ‖ head ‖ tail`：公共前缀只存一份，head 进入前缀表示（升序
//! 整数位图、非降整数位图或 LOUDS 字典树），tail 进入后缀表示（空、定长
//! 行或 blob 存储）。代价模型规划器依据键统计选出最省的组合。一次构建，
//! 保存为 8 字节对齐工件，零拷贝重开以支持点查、秩查询与有序遍历。

pub mod build;
pub mod composite;
pub mod conf;
pub mod error;
pub mod head;
pub mod input;
pub mod iter;
pub mod keystat;
pub mod plan;
pub mod prefix;
pub mod registry;
pub mod suffix;
pub mod uint;

pub use build::build;
pub use composite::Composite;
pub use conf::Conf;
pub use error::{Error, Result};
pub use input::{KeySource, SliceSource};
pub use iter::Cursor;
pub use keystat::{KeyStat, KeyStatBuilder, common_prefix_len};
pub use plan::{PlanKind, UintPrefixPlan};
pub use registry::{Factory, PrefixKind, SuffixKind, factory, wire_name};
