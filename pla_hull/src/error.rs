//! Error definitions for segment building
//! 分段构建错误定义

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum Error {
  #[error("invalid configuration: {0}")]
  InvalidConfiguration(&'static str),

  /// Keys fed to one segment must strictly increase
  /// 同一段内的键必须严格递增
  #[error("points must be increasing by x (x = {x}, last_x = {last_x})")]
  SequenceOrderViolation { x: f64, last_x: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
