//! Key offset distributions
//! 键偏移分布

#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

use rand::Rng;
use rand_distr::{Distribution, Normal};

/// How a key is chosen inside a feasible window [min, max]
/// 在可行窗口 [min, max] 内选键的方式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyDist {
  /// Uniform over the window
  /// 窗口内均匀分布
  Uniform,
  /// `min + round(|N(0, sigma)|)`, clamped to the window
  /// `min + round(|N(0, sigma)|)`，截断到窗口内
  Normal { sigma: f64 },
  /// Uniform, window capped at `last_x + 1 + bound`
  /// 均匀分布，窗口上界不超过 `last_x + 1 + bound`
  UniformIncrease { bound: u64 },
  /// Uniform, window capped at `(last_x + 1) * factor`
  /// 均匀分布，窗口上界不超过 `(last_x + 1) * factor`
  UniformMultiply { factor: f64 },
}

impl KeyDist {
  pub(crate) fn sanitize(self) -> Self {
    match self {
      Self::Normal { sigma } if !sigma.is_finite() => Self::Normal { sigma: 0.0 },
      Self::Normal { sigma } => Self::Normal { sigma: sigma.abs() },
      Self::UniformMultiply { factor } if factor.is_nan() || factor < 1.0 => Self::UniformMultiply { factor: 1.0 },
      d => d,
    }
  }

  /// Upper bound the distribution imposes on its own
  /// 分布自身施加的上界
  #[must_use]
  pub fn bound(self, last_x: i64) -> Option<i64> {
    let next = last_x.saturating_add(1);
    match self {
      Self::UniformIncrease { bound } => {
        Some(next.saturating_add(i64::try_from(bound).unwrap_or(i64::MAX)))
      }
      Self::UniformMultiply { factor } => Some((next as f64 * factor) as i64),
      Self::Uniform | Self::Normal { .. } => None,
    }
  }

  /// Pick a key in [min, max]; `max < min` yields `min`
  /// 在 [min, max] 内选键；`max < min` 时返回 `min`
  pub fn pick<R: Rng>(self, rng: &mut R, min: i64, max: i64) -> i64 {
    if max <= min {
      return min;
    }
    match self {
      Self::Normal { sigma } => {
        let offset = Normal::new(0.0, sigma)
          .map(|n| n.sample(rng).abs().round())
          .unwrap_or(0.0);
        min.saturating_add(offset as i64).min(max)
      }
      _ => rng.random_range(min..=max),
    }
  }
}

#[cfg(test)]
mod tests {
  use rand::{SeedableRng, rngs::StdRng};

  use super::*;

  #[test]
  fn picks_stay_in_window() {
    let mut rng = StdRng::seed_from_u64(1);
    for dist in [
      KeyDist::Uniform,
      KeyDist::Normal { sigma: 50.0 },
      KeyDist::UniformIncrease { bound: 3 },
    ] {
      for _ in 0..1000 {
        let k = dist.pick(&mut rng, 10, 20);
        assert!((10..=20).contains(&k), "{dist:?} {k}");
      }
      assert_eq!(dist.pick(&mut rng, 10, 5), 10);
    }
  }

  #[test]
  fn bounds() {
    assert_eq!(KeyDist::UniformIncrease { bound: 5 }.bound(9), Some(15));
    assert_eq!(KeyDist::UniformMultiply { factor: 2.0 }.bound(9), Some(20));
    assert_eq!(KeyDist::Uniform.bound(9), None);
    assert_eq!(
      KeyDist::UniformMultiply { factor: 0.5 }.sanitize(),
      KeyDist::UniformMultiply { factor: 1.0 }
    );
  }
}
