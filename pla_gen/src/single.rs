//! Single-level dataset generator
//! 单层数据集生成器
//!
//! Steers each key by the live rectangle of one segment builder, so the keys
//! of a segment stay fittable, then forces a break with a key just above the
//! lowest feasible line.
//! 依据单个分段器当前的矩形选取键，使段内键保持可拟合；
//! 随后在最低可行直线之上放置一个键以强制分段。

#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

use log::{debug, info};
use pla_hull::{Metric, SegmentBuilder, measure};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use rand_distr::{Distribution, Normal};

use crate::{Conf, Error, KeyDist, ParsedConf, Result, conf::default};

/// Line through rectangle corners `a` and `b` as (slope, intercept)
#[inline]
fn line(a: pla_hull::Point<i64, i64>, b: pla_hull::Point<i64, i64>) -> (f64, f64) {
  let slope = (b.y - a.y) as f64 / (b.x - a.x) as f64;
  (slope, b.y as f64 - slope * b.x as f64)
}

struct SingleGen {
  seg: SegmentBuilder<i64, i64>,
  eps: i64,
  last_x: i64,
  rank: i64,
  dist: KeyDist,
  rng: StdRng,
  keys: Vec<i64>,
  breaks: usize,
}

impl SingleGen {
  fn new(eps: i64, conf: &ParsedConf, total_keys: usize) -> Result<Self> {
    Ok(Self {
      seg: SegmentBuilder::new(eps)?,
      eps,
      last_x: 0,
      rank: 0,
      dist: conf.dist,
      rng: StdRng::seed_from_u64(conf.seed),
      keys: Vec::with_capacity(total_keys),
      breaks: 0,
    })
  }

  /// Validate, then emit the keys, shuffled when asked
  /// 校验后输出键，按需打乱
  fn finish(mut self, shuffle: bool) -> Result<Vec<u64>> {
    if self.breaks > 0 {
      debug!("{} unplanned breaks", self.breaks);
    }
    crate::check_monotonic(&self.keys)?;
    let mut keys: Vec<u64> = self.keys.iter().map(|&k| k as u64).collect();
    if shuffle {
      keys.shuffle(&mut self.rng);
    }
    Ok(keys)
  }

  fn push(&mut self, key: i64, force_break: bool) -> Result<()> {
    self.rank += 1;
    if force_break {
      self.seg.reset();
    }
    if !self.seg.add_point(key, self.rank)? {
      self.breaks += 1;
      self.seg.reset();
      self.seg.add_point(key, self.rank)?;
    }
    self.last_x = key;
    self.keys.push(key);
    Ok(())
  }

  fn next_key(&mut self) -> i64 {
    let next = self.last_x.saturating_add(1);
    let rect = match self.seg.segment() {
      Some(s) if self.seg.len() >= 2 => *s.rectangle(),
      _ => {
        let max = self
          .dist
          .bound(self.last_x)
          .unwrap_or(next.saturating_add(default::INCREASE_BOUND));
        return self.dist.pick(&mut self.rng, next, max);
      }
    };
    let r = (self.rank + 1) as f64;
    let eps = self.eps as f64;
    let (s02, i02) = line(rect[0], rect[2]);
    let (s13, i13) = line(rect[3], rect[1]);
    let mut max = if s02 > 0.0 {
      ((r + eps - i02) / s02).floor() as i64
    } else {
      i64::MAX
    };
    let lo = r - eps - i13;
    let min = if lo <= 0.0 {
      0
    } else {
      (lo / s13).floor() as i64
    }
    .max(next);
    if let Some(b) = self.dist.bound(self.last_x) {
      max = max.min(b);
    }
    self.dist.pick(&mut self.rng, min, max)
  }

  /// First key above the lowest feasible line by more than epsilon
  /// 高于最低可行直线超过 epsilon 的第一个键
  fn out_of_bound(&self) -> i64 {
    let next = self.last_x.saturating_add(1);
    let Some(s) = self.seg.segment().filter(|_| self.seg.len() >= 2) else {
      return next;
    };
    let rect = s.rectangle();
    let (s02, i02) = line(rect[0], rect[2]);
    if s02 <= 0.0 {
      return next;
    }
    let r = (self.rank + 1 + self.eps + 1) as f64;
    (((r - i02) / s02).floor() as i64).max(next)
  }
}

/// Keys per segment, after checking the request
/// 校验请求后返回每段键数
fn per_segment(total_keys: usize, segments: usize, eps: i64) -> Result<usize> {
  if eps < 0 {
    return Err(Error::config("epsilon must be non-negative"));
  }
  if segments == 0 {
    return Err(Error::config("at least one segment is required"));
  }
  let per = total_keys / segments;
  if per < 2 {
    return Err(Error::config(format!(
      "{total_keys} keys cannot fill {segments} segments with two keys each"
    )));
  }
  Ok(per)
}

#[inline]
fn segment_size(s: usize, total_keys: usize, segments: usize, per: usize) -> usize {
  if s + 1 == segments {
    per + total_keys % segments
  } else {
    per
  }
}

/// `total_keys` strictly increasing keys forming about `segments` segments at
/// `eps`; key offsets follow `|N(0, 20)|` unless `conf` sets another [`KeyDist`].
/// With `Conf::Shuffle(true)` the keys come back in seeded random order.
/// 生成 `total_keys` 个严格递增的键，在 `eps` 下约形成 `segments` 段；
/// 键偏移默认服从 `|N(0, 20)|`，可由 `conf` 指定其他 [`KeyDist`]。
/// 设置 `Conf::Shuffle(true)` 时按种子随机顺序返回。
pub fn single_level(
  total_keys: usize,
  segments: usize,
  eps: i64,
  conf: &[Conf],
) -> Result<Vec<u64>> {
  let per = per_segment(total_keys, segments, eps)?;
  let merged: Vec<Conf> = std::iter::once(Conf::Dist(KeyDist::Normal {
    sigma: default::SIGMA,
  }))
  .chain(conf.iter().copied())
  .collect();
  let parsed = ParsedConf::new(&merged);

  let mut g = SingleGen::new(eps, &parsed, total_keys)?;
  g.push(0, false)?;
  for s in 0..segments {
    for _ in 1..segment_size(s, total_keys, segments, per) {
      let key = g.next_key();
      g.push(key, false)?;
    }
    if s + 1 != segments {
      let key = g.out_of_bound();
      g.push(key, true)?;
    }
  }
  info!("single level: {} keys, {segments} segments at eps {eps}", g.keys.len());
  g.finish(parsed.shuffle)
}

/// Keys with the metric measured on them in sorted order
/// 键及其按序测得的分段指标
#[derive(Debug, Clone)]
pub struct Scored {
  pub keys: Vec<u64>,
  pub metric: Metric,
}

/// Single-level keys around one random linear model per segment
/// 每段围绕一个随机线性模型生成的单层键
///
/// Each segment draws a slope in `[1, i64::MAX / (total_keys * 1000)]`. A key
/// deviates from its model position by `|N(mean, sqrt(variance))|` ranks, up or
/// down by the parity of the offset, and is clamped into the ±eps band above
/// the previous key. Segments end with a key past the lowest feasible line.
/// 每段抽取 `[1, i64::MAX / (total_keys * 1000)]` 内的斜率。键相对模型位置偏离
/// `|N(mean, sqrt(variance))|` 个秩，方向由偏移奇偶决定，并被限制在上一个键之上的
/// ±eps 带内。每段以越过最低可行直线的键结束。
pub fn single_level_mse(
  total_keys: usize,
  segments: usize,
  eps: i64,
  mean: f64,
  variance: f64,
  conf: &[Conf],
) -> Result<Scored> {
  let per = per_segment(total_keys, segments, eps)?;
  if !mean.is_finite() || !variance.is_finite() || variance < 0.0 {
    return Err(Error::config(format!("bad error distribution N({mean}, {variance})")));
  }
  let error = Normal::new(mean, variance.sqrt()).map_err(|e| Error::config(e.to_string()))?;
  let parsed = ParsedConf::new(conf);
  let max_slope = (i64::MAX as f64 / total_keys as f64 / default::SLOPE_HEADROOM).max(1.0);

  let mut g = SingleGen::new(eps, &parsed, total_keys)?;
  g.push(0, false)?;
  let mut intercept = 0.0;
  let mut min_key = 0i64;
  for s in 0..segments {
    let slope = g.rng.random_range(1.0..=max_slope);
    let at = |j: i64| (intercept + slope * j as f64) as i64;
    for j in 1..segment_size(s, total_keys, segments, per) as i64 {
      let max_key = at(j + eps);
      min_key = min_key.max(at(j - eps));
      let offset = (error.sample(&mut g.rng).abs() * slope) as i64;
      let mut key = if offset % 2 == 0 {
        at(j).saturating_add(offset)
      } else {
        at(j).saturating_sub(offset)
      };
      if key > max_key || key <= min_key {
        key = min_key + 1;
      }
      min_key = key;
      g.push(key, false)?;
    }
    if s + 1 != segments {
      let key = g.out_of_bound();
      g.push(key, true)?;
      intercept = key as f64;
      min_key = key;
    }
  }

  crate::check_monotonic(&g.keys)?;
  let metric = measure(&g.keys, eps as u64, true)?;
  info!(
    "single level mse: {} keys, {} of {segments} segments at eps {eps}, mse {:?}",
    g.keys.len(),
    metric.segments,
    metric.mse
  );
  Ok(Scored {
    keys: g.finish(parsed.shuffle)?,
    metric,
  })
}
