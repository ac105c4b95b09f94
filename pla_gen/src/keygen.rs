//! Constraint-driven key generation
//! 约束驱动的键生成
//!
//! Two reference lines drive every key: a shallow global line and a steeper
//! local line. A key at rank r is drawn from the x range where both lines
//! stay within their epsilon of r, so it fits the open local and global
//! segments at once. Boundary keys are placed just past one line's reach to
//! close a segment.
//! 每个键由两条参考直线驱动：较平缓的全局线与较陡的局部线。
//! 秩 r 的键取自两条线都落在 r 的 epsilon 范围内的 x 区间，
//! 因此同时适配当前局部段与全局段。边界键则放在某条线覆盖范围之外，用于结束分段。

#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

use log::trace;
use pla_hull::{Point, Slope};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{Conf, Error, ParsedConf, Result};

/// x where the line `intercept + slope * x` reaches `rank`
/// 直线 `intercept + slope * x` 取值 `rank` 时的 x
#[inline]
fn solve(rank: f64, intercept: f64, slope: f64) -> f64 {
  (rank - intercept) / slope
}

/// Reference line through `origin`
/// 过 `origin` 的参考直线
#[derive(Debug, Clone, Copy, Default)]
struct RefLine {
  origin: Point<i64, i64>,
  slope: Slope<i128>,
  k: f64,
  intercept: f64,
}

impl RefLine {
  fn set(&mut self, slope: Slope<i128>) {
    self.slope = slope;
    self.k = slope.as_f64();
    self.intercept = self.origin.y as f64 - self.origin.x as f64 * self.k;
  }

  /// x where the line reaches `rank`
  #[inline]
  fn at(&self, rank: f64) -> f64 {
    solve(rank, self.intercept, self.k)
  }

  /// Integer x range whose line value lies within `rank ± eps`
  /// 直线值落在 `rank ± eps` 内的整数 x 区间
  #[inline]
  fn window(&self, rank: i64, eps: i64) -> (i64, i64) {
    (
      self.at((rank - eps) as f64).ceil() as i64,
      self.at((rank + eps) as f64).floor() as i64,
    )
  }
}

/// Generator of keys that respect a local and a global reference line
/// 遵循局部与全局参考直线的键生成器
#[derive(Debug)]
pub struct ConstraintKeyGen {
  local_eps: i64,
  global_eps: i64,
  last_x: i64,
  local: RefLine,
  global: RefLine,
  conf: ParsedConf,
  rng: StdRng,
}

impl ConstraintKeyGen {
  pub fn new(local_eps: i64, global_eps: i64, conf: &[Conf]) -> Result<Self> {
    if local_eps < 0 || global_eps < 0 {
      return Err(Error::config("epsilon must be non-negative"));
    }
    if local_eps > global_eps {
      return Err(Error::config("local epsilon exceeds global epsilon"));
    }
    let conf = ParsedConf::new(conf);
    // dy / dx must stay below 1 for every draw
    if conf.global_dy.1 >= conf.global_dx.0 {
      return Err(Error::config(format!(
        "global slope range {:?} / {:?} reaches 1",
        conf.global_dy, conf.global_dx
      )));
    }
    Ok(Self {
      local_eps,
      global_eps,
      last_x: 0,
      local: RefLine::default(),
      global: RefLine::default(),
      rng: StdRng::seed_from_u64(conf.seed),
      conf,
    })
  }

  #[inline]
  pub fn last_x(&self) -> i64 {
    self.last_x
  }

  #[inline]
  pub fn set_last_x(&mut self, x: i64) {
    self.last_x = x;
  }

  #[inline]
  pub fn local_slope(&self) -> Slope<i128> {
    self.local.slope
  }

  #[inline]
  pub fn global_slope(&self) -> Slope<i128> {
    self.global.slope
  }

  #[inline]
  pub fn set_local_origin(&mut self, x: i64, rank: i64) {
    self.local.origin = Point::new(x, rank);
  }

  #[inline]
  pub fn set_global_origin(&mut self, x: i64, rank: i64) {
    self.global.origin = Point::new(x, rank);
  }

  /// Local and global windows of `rank`, intersected and kept above the
  /// last key; `max < min` when they do not meet
  /// `rank` 的局部与全局窗口之交，且大于上一个键；不相交时 `max < min`
  pub fn window(&self, rank: i64) -> (i64, i64) {
    let (gmin, gmax) = self.global.window(rank, self.global_eps);
    let (lmin, lmax) = self.local.window(rank, self.local_eps);
    (
      gmin.max(lmin).max(self.last_x.saturating_add(1)),
      gmax.min(lmax),
    )
  }

  #[inline]
  fn frac(&mut self) -> f64 {
    self.rng.random::<f64>()
  }

  /// Draw a global slope dy / dx in (0, 1) through the global origin
  /// 过全局原点抽取 (0, 1) 内的全局斜率 dy / dx
  pub fn generate_global_slope(&mut self) -> Result<()> {
    let (dx_lo, dx_hi) = self.conf.global_dx;
    let (dy_lo, dy_hi) = self.conf.global_dy;
    let dx = self.rng.random_range(dx_lo..=dx_hi);
    let dy = self.rng.random_range(dy_lo..=dy_hi);
    self.global.set(Slope::new(i128::from(dx), i128::from(dy)));
    let k = self.global.k;
    if !(k > 0.0 && k < 1.0) {
      return Err(Error::InfeasibleSlopeSeparation {
        target_rank: self.global.origin.y,
        slope: k,
      });
    }
    trace!("global slope {dy}/{dx} at {:?}", self.global.origin);
    Ok(())
  }

  fn aim_local(&mut self, x: i64, target_rank: i64) {
    let o = self.local.origin;
    self.local.set(Slope::new(
      i128::from(x) - i128::from(o.x),
      i128::from(target_rank) - i128::from(o.y),
    ));
  }

  /// Pick a local line from the local origin to `(x, target_rank)`, with x in
  /// the global window of `target_rank`, such that the local line leaves its
  /// band clearly before the global line does at `target_rank + 1`
  /// 选取从局部原点到 `(x, target_rank)` 的局部直线，x 位于 `target_rank`
  /// 的全局窗口内，且在 `target_rank + 1` 处局部线先于全局线明显越界
  pub fn generate_local_slope(&mut self, target_rank: i64) -> Result<()> {
    let t = target_rank as f64;
    let geps = self.global_eps as f64;
    let leps = self.local_eps as f64;
    let cap = self.conf.search_cap;

    let min_x = (self.global.at(t - geps).ceil() as i64).max(self.last_x.saturating_add(1));
    let max_x = self.global.at(t + geps).floor() as i64;
    let mut mid_x = self.global.at(t).floor() as i64;
    if mid_x <= min_x {
      mid_x = max_x;
    }
    let mut x = (min_x as f64 + mid_x.saturating_sub(min_x).saturating_sub(1) as f64 * self.frac())
      as i64;
    self.aim_local(x, target_rank);

    let mut steps = 0;
    while self.local.k > self.conf.local_slope_cap && x < mid_x.saturating_sub(1) && steps < cap {
      x += 1;
      steps += 1;
      self.aim_local(x, target_rank);
    }

    let next_global = self.global.at(t + 1.0 + geps) as i64;
    let mut next_local = self.local.at(t + 1.0 + leps) as i64;
    let overlap = |local: i64| local >= next_global || next_global.abs_diff(local) <= 1;
    while overlap(next_local) && steps < cap {
      if x <= min_x {
        break;
      }
      x -= 1;
      steps += 1;
      self.aim_local(x, target_rank);
      next_local = self.local.at(t + 1.0 + leps) as i64;
    }

    let k = self.local.k;
    if !(k > 0.0 && k < 1.0) || overlap(next_local) {
      return Err(Error::InfeasibleSlopeSeparation {
        target_rank,
        slope: k,
      });
    }
    trace!(
      "local slope {:?} toward rank {target_rank} after {steps} steps",
      self.local.slope
    );
    Ok(())
  }

  /// Key inside both windows of `rank`
  /// 位于 `rank` 两个窗口内的键
  pub fn generate_key(&mut self, rank: i64) -> i64 {
    let (min, mut max) = self.window(rank);
    if let Some(b) = self.conf.dist.bound(self.last_x) {
      max = max.min(b);
    }
    let key = self.conf.dist.pick(&mut self.rng, min, max);
    self.last_x = key;
    key
  }

  /// Key that leaves the local band but stays with the global line, keeping
  /// room for the `restrict_rank - rank` keys that still follow it
  /// 越出局部带但仍贴合全局线的键，并为其后 `restrict_rank - rank`
  /// 个键保留空间
  pub fn generate_outside_local(&mut self, rank: i64, restrict_rank: i64) -> i64 {
    let geps = self.global_eps as f64;
    let leps = self.local_eps as f64;
    let reach = self.global.at(rank as f64 + geps) as i64;
    let room = (self.global.at(restrict_rank as f64) as i64)
      .saturating_sub(restrict_rank.saturating_sub(rank).saturating_mul(2));
    let next_global = reach.min(room);
    let next_local = self.local.at(rank as f64 + leps) as i64;
    let key = if next_global < next_local {
      self.last_x.saturating_add(1)
    } else {
      let spread = next_global.saturating_sub(next_local) as f64 * self.frac();
      ((next_local.saturating_add(1) as f64 + spread) as i64).min(next_global)
    };
    let key = key.max(self.last_x.saturating_add(1));
    self.last_x = key;
    key
  }

  /// First key past the global band of `rank`
  /// 越出 `rank` 全局带的第一个键
  pub fn generate_outside_global(&mut self, rank: i64) -> i64 {
    let reach = self.global.at(rank as f64 + self.global_eps as f64) as i64;
    let key = reach.saturating_add(1).max(self.last_x.saturating_add(1));
    self.last_x = key;
    key
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn anchored(conf: &[Conf]) -> ConstraintKeyGen {
    let mut g = ConstraintKeyGen::new(4, 64, conf).unwrap();
    g.set_global_origin(0, 0);
    g.set_local_origin(0, 0);
    g.generate_global_slope().unwrap();
    g
  }

  #[test]
  fn rejects_bad_eps() {
    assert!(ConstraintKeyGen::new(-1, 3, &[]).is_err());
    assert!(ConstraintKeyGen::new(5, 3, &[]).is_err());
  }

  #[test]
  fn rejects_steep_global_range() {
    for conf in [
      [Conf::GlobalDx(101, 102), Conf::GlobalDy(1, 101)],
      [Conf::GlobalDx(5, 6), Conf::GlobalDy(3, 9)],
    ] {
      assert!(matches!(
        ConstraintKeyGen::new(4, 64, &conf),
        Err(Error::InvalidConfiguration { .. })
      ));
    }
    assert!(ConstraintKeyGen::new(4, 64, &[Conf::GlobalDx(5, 6), Conf::GlobalDy(1, 4)]).is_ok());
  }

  #[test]
  fn global_slope_in_unit() {
    let g = anchored(&[Conf::Seed(3)]);
    let k = g.global_slope().as_f64();
    assert!(k > 0.0 && k < 1.0, "{k}");
  }

  #[test]
  fn keys_fit_both_lines() {
    let mut g = anchored(&[Conf::Seed(7)]);
    g.generate_local_slope(999).unwrap();
    let lk = g.local_slope().as_f64();
    assert!(lk > 0.0 && lk < 1.0, "{lk}");
    let mut last = g.last_x();
    for rank in 1..999 {
      let (min, max) = g.window(rank);
      let key = g.generate_key(rank);
      assert!(key > last);
      if min <= max {
        assert!((min..=max).contains(&key));
      }
      last = key;
    }
  }

  #[test]
  fn outside_keys_advance() {
    let mut g = anchored(&[Conf::Seed(11)]);
    g.generate_local_slope(999).unwrap();
    g.set_last_x(1_000_000);
    assert!(g.generate_outside_local(1000, 1999) > 1_000_000);
    let x = g.last_x();
    assert!(g.generate_outside_global(1000) > x);
  }
}
