//! Error types for zidx_blob
//! zidx_blob 错误类型

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  #[error("IO: {0}")]
  Io(#[from] std::io::Error),

  #[error("Section: {0}")]
  Section(#[from] zidx_rs::Error),

  #[error("Invalid store section")]
  InvalidSection,
}

pub type Result<T> = std::result::Result<T, Error>;
