//! Two-level dataset assembly
//! 两级数据集组装

use log::{debug, info, warn};
use pla_hull::{SegmentBuilder, count_sorted};

use crate::{Conf, ConstraintKeyGen, Error, ParsedConf, Plan, Result};

/// Requested shape of a dataset
/// 数据集的目标形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
  pub local_eps: i64,
  pub global_eps: i64,
  pub local_segments: usize,
  pub global_segments: usize,
  pub total_keys: usize,
}

impl Target {
  pub fn check(&self) -> Result<()> {
    if self.local_eps < 0 || self.global_eps < 0 {
      return Err(Error::config("epsilon must be non-negative"));
    }
    if self.local_eps > self.global_eps {
      return Err(Error::config("local epsilon exceeds global epsilon"));
    }
    if self.total_keys == 0 {
      return Err(Error::config("no keys requested"));
    }
    Ok(())
  }
}

/// Segment counts measured on the produced keys
/// 在生成的键上测得的分段数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
  pub local_target: usize,
  pub global_target: usize,
  pub local_actual: usize,
  pub global_actual: usize,
}

impl Report {
  #[inline]
  pub fn local_deviation(&self) -> usize {
    self.local_actual.abs_diff(self.local_target)
  }

  #[inline]
  pub fn global_deviation(&self) -> usize {
    self.global_actual.abs_diff(self.global_target)
  }

  #[inline]
  pub fn exact(&self) -> bool {
    self.local_deviation() == 0 && self.global_deviation() == 0
  }
}

/// Strictly increasing keys with their measured report
/// 严格递增的键及其测量报告
#[derive(Debug, Clone)]
pub struct Dataset {
  pub keys: Vec<u64>,
  pub report: Report,
}

/// Keys must be non-negative and strictly increasing
/// 键必须非负且严格递增
pub fn check_monotonic(keys: &[i64]) -> Result<()> {
  let mut prev = -1;
  for (idx, &key) in keys.iter().enumerate() {
    if key <= prev {
      return Err(Error::MonotonicityViolation {
        idx,
        low: prev,
        high: key,
      });
    }
    prev = key;
  }
  Ok(())
}

/// Drives the key generator through a [`Plan`], shadowing the keys with one
/// local and one global segment builder
/// 按 [`Plan`] 驱动键生成器，并以一个局部与一个全局分段器跟踪已生成的键
pub struct DatasetAssembler {
  target: Target,
  plan: Plan,
  keygen: ConstraintKeyGen,
  local: SegmentBuilder<i64, i64>,
  global: SegmentBuilder<i64, i64>,
  keys: Vec<i64>,
  search_cap: usize,
  local_breaks: usize,
  global_breaks: usize,
}

impl DatasetAssembler {
  pub fn new(target: Target, conf: &[Conf]) -> Result<Self> {
    target.check()?;
    let plan = Plan::new(
      target.total_keys,
      target.local_segments,
      target.global_segments,
    )?;
    Ok(Self {
      keygen: ConstraintKeyGen::new(target.local_eps, target.global_eps, conf)?,
      local: SegmentBuilder::new(target.local_eps)?,
      global: SegmentBuilder::new(target.global_eps)?,
      keys: Vec::with_capacity(target.total_keys),
      search_cap: ParsedConf::new(conf).search_cap,
      local_breaks: 0,
      global_breaks: 0,
      target,
      plan,
    })
  }

  /// Rank of the next key, starting at 1
  #[inline]
  fn rank(&self) -> i64 {
    self.keys.len() as i64 + 1
  }

  fn push(&mut self, key: i64) -> Result<()> {
    let rank = self.rank();
    if !self.local.check_point(key, rank) {
      self.local.reset();
      self.local_breaks += 1;
    }
    self.local.add_point(key, rank)?;
    if !self.global.check_point(key, rank) {
      self.global.reset();
      self.global_breaks += 1;
    }
    self.global.add_point(key, rank)?;
    self.keys.push(key);
    Ok(())
  }

  fn fill(&mut self, size: i64) -> Result<()> {
    for _ in 1..size {
      let rank = self.rank();
      let key = self.keygen.generate_key(rank);
      self.push(key)?;
    }
    Ok(())
  }

  fn open(&mut self, size: i64) -> Result<()> {
    let rank = self.rank();
    self.keygen.set_global_origin(0, 0);
    self.keygen.set_local_origin(0, 0);
    self.keygen.generate_global_slope()?;
    self.keygen.generate_local_slope(rank + size - 1)?;
    let key = self.keygen.generate_key(rank);
    self.push(key)
  }

  /// Close the global segment: probe past the global band until the shadow
  /// builder rejects the key
  /// 结束全局段：在全局带外试探，直到跟踪分段器拒绝该键
  fn cross_global(&mut self, size: i64) -> Result<()> {
    let rank = self.rank();
    let mut key = self.keygen.generate_outside_global(rank);
    let mut steps = 0;
    while self.global.len() >= 2 && steps < self.search_cap && self.global.check_point(key, rank) {
      key += 1;
      steps += 1;
    }
    debug!("global boundary at rank {rank}: key {key} after {steps} probes");
    self.global.reset();
    self.global_breaks += 1;
    self.keygen.set_last_x(key);
    self.push(key)?;
    self.keygen.set_global_origin(key, rank);
    self.keygen.set_local_origin(key, rank);
    self.keygen.generate_global_slope()?;
    self.keygen.generate_local_slope(rank + size - 1)
  }

  fn cross_local(&mut self, size: i64) -> Result<()> {
    let rank = self.rank();
    let key = self.keygen.generate_outside_local(rank, rank + size - 1);
    self.push(key)?;
    self.keygen.set_local_origin(key, rank);
    self.keygen.generate_local_slope(rank + size - 1)
  }

  pub fn run(mut self) -> Result<Dataset> {
    info!(
      "assembling {} keys: {} local / {} global segments, eps {} / {}",
      self.target.total_keys,
      self.target.local_segments,
      self.target.global_segments,
      self.target.local_eps,
      self.target.global_eps
    );
    let parts = self.plan.parts.clone();
    for (g, part) in parts.iter().enumerate() {
      for j in 0..part.locals {
        let size = part.local_size(j) as i64;
        match (g, j) {
          (0, 0) => self.open(size)?,
          (_, 0) => self.cross_global(size)?,
          _ => self.cross_local(size)?,
        }
        self.fill(size)?;
      }
    }
    debug!(
      "shadow builders broke {} local / {} global times",
      self.local_breaks, self.global_breaks
    );

    check_monotonic(&self.keys)?;
    let report = Report {
      local_target: self.target.local_segments,
      global_target: self.target.global_segments,
      local_actual: count_sorted(&self.keys, self.target.local_eps as u64)?,
      global_actual: count_sorted(&self.keys, self.target.global_eps as u64)?,
    };
    if report.exact() {
      info!("segment counts match: {report:?}");
    } else {
      warn!(
        "segment counts off by {} local / {} global: {report:?}",
        report.local_deviation(),
        report.global_deviation()
      );
    }
    Ok(Dataset {
      keys: self.keys.into_iter().map(|k| k as u64).collect(),
      report,
    })
  }
}

/// Generate a dataset for `target`
/// 按 `target` 生成数据集
pub fn assemble(target: Target, conf: &[Conf]) -> Result<Dataset> {
  DatasetAssembler::new(target, conf)?.run()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn monotonic() {
    assert!(check_monotonic(&[0, 1, 5]).is_ok());
    assert!(matches!(
      check_monotonic(&[3, 3]),
      Err(Error::MonotonicityViolation { idx: 1, low: 3, high: 3 })
    ));
    assert!(check_monotonic(&[-2]).is_err());
  }
}
