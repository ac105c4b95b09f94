//! Segmentation metric: minimum segment count of a key set
//! 分段指标：键集合所需的最少段数
//!
//! Ranks are positions in the sorted keys.
//! 排名即键在排序后的位置。

#![allow(clippy::cast_precision_loss)]

use std::cmp::Ordering;

use log::trace;

use crate::{Key, Result, SegmentBuilder, Wide};

/// Result of one metric scan
/// 一次指标扫描的结果
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Metric {
  pub segments: usize,
  /// Mean over every segment, the open tail included, of the per-segment mean
  /// squared residual of its center line
  /// 各段（含末尾未关闭段）中心直线均方残差的平均值
  pub mse: Option<f64>,
}

/// Sort keys in place, then count segments
/// 原地排序后计数段数
///
/// # Errors
/// `SequenceOrderViolation` on duplicate keys
pub fn count_segments<K: Key>(keys: &mut [K], epsilon: u64) -> Result<usize> {
  keys.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
  count_sorted(keys, epsilon)
}

/// Count segments of strictly increasing keys
/// 计数严格递增键的段数
///
/// # Errors
/// `SequenceOrderViolation` if keys are not strictly increasing
pub fn count_sorted<K: Key>(keys: &[K], epsilon: u64) -> Result<usize> {
  Ok(measure(keys, epsilon, false)?.segments)
}

/// Count segments, optionally with the MSE of each fitted line
/// 计数段数，可选计算每段拟合直线的均方误差
///
/// # Errors
/// `SequenceOrderViolation` if keys are not strictly increasing
pub fn measure<K: Key>(keys: &[K], epsilon: u64, with_mse: bool) -> Result<Metric> {
  if keys.is_empty() {
    return Ok(Metric {
      segments: 0,
      mse: with_mse.then_some(0.0),
    });
  }

  let mut seg = SegmentBuilder::<K, u64>::new(epsilon)?;
  let mut segments = 1;
  let mut start = 0;
  let mut mse_sum = 0.0;

  for (i, &key) in keys.iter().enumerate() {
    let rank = i as u64;
    if !seg.add_point(key, rank)? {
      if with_mse {
        mse_sum += segment_mse(&seg, &keys[start..i], start);
      }
      segments += 1;
      start = i;
      seg.reset();
      seg.add_point(key, rank)?;
    }
  }

  let mse = if with_mse {
    mse_sum += segment_mse(&seg, &keys[start..], start);
    Some(mse_sum / segments as f64)
  } else {
    None
  };

  trace!("epsilon {epsilon}: {segments} segments over {} keys", keys.len());
  Ok(Metric { segments, mse })
}

/// Mean squared residual of the segment held by `seg` over its keys
/// `seg` 所持段在其键上的均方残差
fn segment_mse<K: Key>(seg: &SegmentBuilder<K, u64>, run: &[K], start: usize) -> f64 {
  let Some(desc) = seg.segment() else {
    return 0.0;
  };
  if run.is_empty() {
    return 0.0;
  }
  let origin = desc.first_x();
  let (slope, intercept) = desc.center_line(origin);
  let sum: f64 = run
    .iter()
    .enumerate()
    .map(|(j, &key)| {
      let dx = (key.widen() - origin.widen()).as_f64();
      let diff = intercept + slope * dx - (start + j) as f64;
      diff * diff
    })
    .sum();
  sum / run.len() as f64
}

/// Mean segment count per window of `window` keys, restarting at each window
/// 每 `window` 个键为一窗、窗口处重新开始时的平均段数
///
/// # Errors
/// `SequenceOrderViolation` if keys are not strictly increasing
pub fn window_skew<K: Key>(keys: &[K], epsilon: u64, window: usize) -> Result<f64> {
  if keys.is_empty() {
    return Ok(0.0);
  }
  let window = window.max(1);
  let mut seg = SegmentBuilder::<K, u64>::new(epsilon)?;
  let mut windows = 0usize;
  let mut segments = 0usize;

  for (i, &key) in keys.iter().enumerate() {
    let rank = i as u64;
    if i % window == 0 {
      windows += 1;
      segments += 1;
      seg.reset();
    }
    if !seg.add_point(key, rank)? {
      segments += 1;
      seg.reset();
      seg.add_point(key, rank)?;
    }
  }

  Ok(segments as f64 / windows as f64)
}
