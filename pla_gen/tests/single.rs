//! Tests for the single-level generator
//! 单层生成器测试

use aok::{OK, Void};
use log::trace;
use pla_gen::{Conf, Error, KeyDist, single_level, single_level_mse};
use pla_hull::{count_sorted, measure};

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

#[test]
fn test_counts() -> Void {
  for (total, segments, eps) in [(10_000, 10, 16), (100_000, 100, 64), (5_000, 50, 4), (1_000, 3, 0)] {
    let keys = single_level(total, segments, eps, &[])?;
    assert_eq!(keys.len(), total);
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
    let got = count_sorted(&keys, eps as u64)?;
    trace!("{total} keys {segments} segments eps {eps}: {got}");
    assert!(got.abs_diff(segments) <= 3, "{got} vs {segments}");
  }
  OK
}

#[test]
fn test_uniform_increase() -> Void {
  let keys = single_level(
    5_000,
    20,
    8,
    &[Conf::Seed(5), Conf::Dist(KeyDist::UniformIncrease { bound: 16 })],
  )?;
  assert_eq!(keys.len(), 5_000);
  assert!(keys.windows(2).all(|w| w[0] < w[1]));
  OK
}

#[test]
fn test_invalid() {
  assert!(matches!(
    single_level(100, 0, 4, &[]),
    Err(Error::InvalidConfiguration { .. })
  ));
  assert!(matches!(
    single_level(100, 10, -1, &[]),
    Err(Error::InvalidConfiguration { .. })
  ));
  assert!(matches!(
    single_level(10, 10, 4, &[]),
    Err(Error::InvalidConfiguration { .. })
  ));
}

#[test]
fn test_shuffle() -> Void {
  let sorted = single_level(2_000, 10, 8, &[Conf::Seed(9)])?;
  let mut shuffled = single_level(2_000, 10, 8, &[Conf::Seed(9), Conf::Shuffle(true)])?;
  assert_ne!(sorted, shuffled);
  shuffled.sort_unstable();
  assert_eq!(sorted, shuffled);
  OK
}

#[test]
fn test_mse_grows_with_variance() -> Void {
  let mut last = -1.0;
  for variance in [1.0, 400.0] {
    let scored = single_level_mse(20_000, 20, 64, 0.0, variance, &[Conf::Seed(3)])?;
    assert_eq!(scored.keys.len(), 20_000);
    assert!(scored.keys.windows(2).all(|w| w[0] < w[1]));
    let m = measure(&scored.keys, 64, true)?;
    assert_eq!(m, scored.metric);
    let mse = m.mse.unwrap_or(f64::NAN);
    trace!("variance {variance}: {} segments, mse {mse}", m.segments);
    assert!(mse.is_finite() && mse > last, "variance {variance} mse {mse} after {last}");
    last = mse;
  }
  OK
}

#[test]
fn test_mse_shuffled_keeps_keys() -> Void {
  let conf = [Conf::Seed(4), Conf::Shuffle(true)];
  let scored = single_level_mse(5_000, 10, 16, 0.0, 25.0, &conf)?;
  let mut keys = scored.keys;
  keys.sort_unstable();
  assert!(keys.windows(2).all(|w| w[0] < w[1]));
  assert_eq!(measure(&keys, 16, true)?, scored.metric);
  OK
}

#[test]
fn test_mse_invalid() {
  for variance in [-1.0, f64::NAN] {
    assert!(matches!(
      single_level_mse(1_000, 10, 4, 0.0, variance, &[]),
      Err(Error::InvalidConfiguration { .. })
    ));
  }
}
