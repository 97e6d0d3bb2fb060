//! Error types for zidx_rs
//! zidx_rs 错误类型

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  #[error("IO: {0}")]
  Io(#[from] std::io::Error),

  #[error("Section truncated: need {need} bytes, have {have}")]
  Truncated { need: usize, have: usize },

  #[error("Invalid packed width: {0}")]
  InvalidWidth(u32),

  #[error("Invalid section head")]
  InvalidHead,
}

pub type Result<T> = std::result::Result<T, Error>;
