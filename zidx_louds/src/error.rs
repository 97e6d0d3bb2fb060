//! Error types for zidx_louds
//! zidx_louds 错误类型

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  #[error("IO: {0}")]
  Io(#[from] std::io::Error),

  #[error("Keys not strictly ascending at index {0}")]
  Unsorted(usize),

  #[error("Section: {0}")]
  Section(#[from] zidx_rs::Error),

  #[error("Invalid trie section")]
  InvalidSection,
}

pub type Result<T> = std::result::Result<T, Error>;
