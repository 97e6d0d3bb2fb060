#![cfg_attr(docsrs, feature(doc_cfg))]

//! LOUDS trie over a sorted key set
//! 有序键集上的 LOUDS 字典树
//!
//! Nodes are laid out in BFS order as a level-order unary degree sequence
//! with one label byte per edge. Word ids are BFS terminal ranks, *not*
//! dictionary ranks; a packed map carries the dictionary rank per word so
//! consumers can reorder external record blocks.
//! 节点按 BFS 顺序以层序一元度序列编码，每条边一个标签字节。词 id 是
//! BFS 终结秩而非字典秩；压缩映射记录每个词的字典秩，使用方据此重排
//! 外部记录块。

pub mod cursor;
pub mod error;
pub mod trie;

pub use cursor::Cursor;
pub use error::{Error, Result};
pub use trie::Trie;
