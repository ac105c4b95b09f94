//! Tests for SegmentBuilder and SegmentDescriptor
//! SegmentBuilder 与 SegmentDescriptor 测试

use aok::{OK, Void};
use log::trace;
use pla_hull::{Error, SegmentBuilder};

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

#[test]
fn test_perfect_line() -> Void {
  let mut seg = SegmentBuilder::<u64, u64>::new(0)?;
  for (x, y) in [(1, 1), (2, 2), (3, 3)] {
    assert!(seg.add_point(x, y)?);
  }
  assert_eq!(seg.len(), 3);

  let desc = seg.segment().expect("open segment");
  let (lo, hi) = desc.slope_range();
  assert_eq!((lo, hi), (1.0, 1.0));
  let line = desc.fitted_line(1);
  assert_eq!(line.slope, 1.0);
  assert_eq!(line.intercept, 1);
  assert_eq!(line.predict(3), 3.0);

  trace!("perfect line passed");
  OK
}

#[test]
fn test_two_points_then_break() -> Void {
  let mut seg = SegmentBuilder::<u64, u64>::new(0)?;
  assert!(seg.add_point(1, 1)?);
  assert!(seg.add_point(2, 3)?);
  assert!(!seg.check_point(3, 2));
  assert_eq!(seg.len(), 2, "check_point must not mutate");
  assert!(!seg.add_point(3, 2)?);

  // the closed segment is still described after the failed point
  let closed = seg.segment().expect("closed segment");
  assert_eq!(closed.first_x(), 1);
  assert_eq!(closed.slope_range(), (2.0, 2.0));

  seg.reset();
  assert!(seg.segment().is_none());
  assert!(seg.add_point(3, 2)?);

  trace!("two points passed");
  OK
}

#[test]
fn test_order_violation() -> Void {
  let mut seg = SegmentBuilder::<u64, u64>::new(2)?;
  assert!(seg.add_point(10, 0)?);
  assert!(seg.add_point(20, 1)?);

  let err = seg.add_point(20, 2).unwrap_err();
  assert!(matches!(err, Error::SequenceOrderViolation { .. }));
  let err = seg.add_point(5, 2).unwrap_err();
  assert!(matches!(err, Error::SequenceOrderViolation { x, last_x } if x == 5.0 && last_x == 20.0));

  // still usable as the same segment
  assert!(seg.add_point(30, 2)?);
  assert_eq!(seg.len(), 3);

  seg.reset();
  assert!(seg.add_point(5, 0)?);
  assert!(seg.add_point(6, 1)?);

  trace!("order violation passed");
  OK
}

#[test]
fn test_negative_epsilon() -> Void {
  assert!(matches!(
    SegmentBuilder::<i64, i64>::new(-1),
    Err(Error::InvalidConfiguration(_))
  ));
  OK
}

#[test]
fn test_one_point_segment() -> Void {
  let mut seg = SegmentBuilder::<u64, u64>::new(4)?;
  assert!(seg.check_point(7, 7));
  assert!(seg.add_point(100, 10)?);

  let desc = seg.segment().expect("one point");
  assert_eq!(desc.slope_range(), (0.0, 1.0));
  assert_eq!(desc.intersection(), (100.0, 14.0));
  let line = desc.fitted_line(100);
  assert_eq!(line.slope, 0.0);
  assert_eq!(line.intercept, 10);

  // any second point is feasible
  assert!(seg.check_point(101, 1_000_000));
  OK
}

#[test]
fn test_saturating_shift() -> Void {
  let mut seg = SegmentBuilder::<u64, u64>::new(8)?;
  assert!(seg.add_point(1, 0)?);
  assert!(seg.add_point(2, u64::MAX)?);
  let r = *seg.segment().expect("segment").rectangle();
  assert_eq!(r[1].y, 0);
  assert_eq!(r[3].y, u64::MAX);
  OK
}

#[test]
fn test_signed_domain() -> Void {
  let mut seg = SegmentBuilder::<i64, i64>::new(1)?;
  for (i, x) in (-500i64..500).step_by(5).enumerate() {
    assert!(seg.add_point(x, i as i64)?, "x = {x}");
  }
  let line = seg.segment().expect("segment").fitted_line(-500);
  for (i, x) in (-500i64..500).step_by(5).enumerate() {
    assert!((line.predict(x) - i as f64).abs() <= 2.0);
  }
  OK
}

#[test]
fn test_float_domain() -> Void {
  let eps = 2u64;
  let mut seg = SegmentBuilder::<f64, u64>::new(eps)?;
  let mut rng = fastrand::Rng::with_seed(11);
  let mut keys = Vec::new();
  let mut x = 0.0f64;
  for y in 0..200u64 {
    x += 0.5 + rng.f64() * 0.01;
    keys.push(x);
    assert!(seg.add_point(x, y)?, "y = {y}");
  }

  let desc = seg.segment().expect("segment");
  let (lo, hi) = desc.slope_range();
  assert!(lo <= hi);
  let line = desc.fitted_line(desc.first_x());
  for (y, &k) in keys.iter().enumerate() {
    let diff = (line.predict(k) - y as f64).abs();
    assert!(diff <= eps as f64 + 1e-6, "y = {y}, diff = {diff}");
  }

  trace!("float domain passed");
  OK
}

#[test]
fn test_intersection_inside_rectangle() -> Void {
  let mut seg = SegmentBuilder::<u64, u64>::new(3)?;
  let keys = [1u64, 4, 6, 9, 15, 16, 20];
  for (y, &x) in keys.iter().enumerate() {
    assert!(seg.add_point(x, y as u64)?);
  }
  let desc = seg.segment().expect("segment");
  let (ix, _) = desc.intersection();
  let r = desc.rectangle();
  let xs = r.map(|p| p.x as f64);
  let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
  let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
  assert!(ix >= min && ix <= max, "{ix} not in [{min}, {max}]");
  OK
}

#[test]
fn test_fitted_line_within_half_rank() -> Void {
  let mut rng = fastrand::Rng::with_seed(1000);
  let mut worst = 0.0f64;
  for eps in [0u64, 1, 2, 4, 8] {
    for _ in 0..200 {
      let mut seg = SegmentBuilder::<u64, u64>::new(eps)?;
      let mut pts = Vec::new();
      let mut x = rng.u64(..1000);
      for y in 0..rng.u64(2..300) {
        x += 1 + rng.u64(..50);
        if !seg.add_point(x, y)? {
          break;
        }
        pts.push((x, y));
      }
      let desc = seg.segment().expect("segment");
      let origin = desc.first_x();
      let line = desc.fitted_line(origin);
      let (slope, intercept) = desc.center_line(origin);
      for &(x, y) in &pts {
        let excess = (line.predict(x) - y as f64).abs() - eps as f64;
        assert!(excess <= 0.5 + 1e-9, "eps {eps} x {x} excess {excess}");
        worst = worst.max(excess);
        let center = intercept + slope * (x - origin) as f64;
        assert!((center - y as f64).abs() <= eps as f64 + 1e-6, "eps {eps} x {x} center {center}");
      }
    }
  }
  trace!("worst excess over epsilon {worst}");
  OK
}
