//! Error types for dataset generation
//! 数据集生成错误类型

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
  #[error("invalid configuration: {reason}")]
  InvalidConfiguration { reason: String },

  /// No slope in (0, 1) separates the local window from the global one
  /// (0, 1) 内找不到能分离局部窗口与全局窗口的斜率
  #[error("cannot select a separating slope for rank {target_rank} (last slope {slope})")]
  InfeasibleSlopeSeparation { target_rank: i64, slope: f64 },

  #[error("keys not strictly increasing at {idx}: {low} then {high}")]
  MonotonicityViolation { idx: usize, low: i64, high: i64 },

  #[error("dump length {len} bytes disagrees with its key count")]
  BadDump { len: usize },

  #[error(transparent)]
  Hull(#[from] pla_hull::Error),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
}

impl Error {
  pub(crate) fn config(reason: impl Into<String>) -> Self {
    Self::InvalidConfiguration {
      reason: reason.into(),
    }
  }
}

pub type Result<T> = std::result::Result<T, Error>;
