//! Error types for zidx
//! zidx 错误类型

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  #[error("IO: {0}")]
  Io(#[from] std::io::Error),

  #[error("Empty key input")]
  EmptyInput,

  #[error("Keys not strictly monotonic at key {0}")]
  Unsorted(usize),

  #[error("Key stream ended before the declared key count")]
  InputExhausted,

  #[error("Bad magic in index header")]
  BadMagic,

  #[error("Unknown index class: {0}")]
  UnknownClass(String),

  #[error("Index artifact truncated: need {need} bytes, have {have}")]
  Truncated { need: usize, have: usize },

  #[error("Index artifact corrupt: {0}")]
  Corrupt(&'static str),

  #[error("Section: {0}")]
  Section(#[from] zidx_rs::Error),

  #[error("Trie: {0}")]
  Trie(#[from] zidx_louds::Error),

  #[error("Store: {0}")]
  Store(#[from] zidx_blob::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
