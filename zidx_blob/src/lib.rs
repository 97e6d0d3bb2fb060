#![cfg_attr(docsrs, feature(doc_cfg))]

//! Record-addressable blob store
//! 可按记录寻址的 blob 存储
//!
//! Immutable container of variable-length records with ordered lookup over
//! a sorted id range. The composite index stores variable-length key tails
//! here.
//! 不可变的变长记录容器，支持在有序 id 区间上的有序查找。组合索引将
//! 变长键尾存放于此。

pub mod error;
pub mod store;

pub use error::{Error, Result};
pub use store::{SortedStore, StoreBuilder};
