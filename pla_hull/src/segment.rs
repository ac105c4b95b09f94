//! Closed segment: feasible rectangle and fitted line
//! 已关闭段：可行矩形与拟合直线

#![allow(clippy::cast_precision_loss)]

use crate::{Key, Point, Rank, Wide};

/// Immutable result of a segment
/// 段的不可变结果
#[derive(Clone, Copy, Debug)]
pub struct SegmentDescriptor<X: Key, Y: Rank> {
  rect: [Point<X, Y>; 4],
  first_x: X,
}

/// y = slope * (x - origin) + intercept
#[derive(Clone, Copy, Debug)]
pub struct Line<X: Key> {
  pub origin: X,
  pub slope: f64,
  pub intercept: X::Wide,
}

impl<X: Key> Line<X> {
  #[inline]
  #[must_use]
  pub fn predict(&self, x: X) -> f64 {
    self.intercept.as_f64() + self.slope * (x.widen() - self.origin.widen()).as_f64()
  }
}

impl<X: Key, Y: Rank> SegmentDescriptor<X, Y> {
  pub(crate) fn new(rect: [Point<X, Y>; 4], first_x: X) -> Self {
    Self { rect, first_x }
  }

  #[inline]
  #[must_use]
  pub fn first_x(&self) -> X {
    self.first_x
  }

  #[inline]
  #[must_use]
  pub fn rectangle(&self) -> &[Point<X, Y>; 4] {
    &self.rect
  }

  #[inline]
  fn one_point(&self) -> bool {
    self.rect[0] == self.rect[2] && self.rect[1] == self.rect[3]
  }

  /// (min, max) feasible slope; (0, 1) for a single point
  /// （最小，最大）可行斜率；单点时为 (0, 1)
  #[must_use]
  pub fn slope_range(&self) -> (f64, f64) {
    if self.one_point() {
      return (0.0, 1.0);
    }
    let r = &self.rect;
    ((r[2] - r[0]).as_f64(), (r[3] - r[1]).as_f64())
  }

  /// Crossing of the two rectangle diagonals
  /// 矩形两条对角线的交点
  #[must_use]
  pub fn intersection(&self) -> (f64, f64) {
    let [p0, p1, p2, p3] = self.rect;
    let slope1 = p2 - p0;
    let slope2 = p3 - p1;

    if self.one_point() || slope1 == slope2 {
      return (p0.x.as_f64(), p0.y.as_f64());
    }

    let p0p1 = p1 - p0;
    let a = slope1.dx * slope2.dy - slope1.dy * slope2.dx;
    let b = (p0p1.dx * slope2.dy - p0p1.dy * slope2.dx).as_f64() / a.as_f64();
    (
      p0.x.as_f64() + b * slope1.dx.as_f64(),
      p0.y.as_f64() + b * slope1.dy.as_f64(),
    )
  }

  /// Concrete line with its intercept taken at `origin`
  /// 以 `origin` 处截距表示的具体直线
  ///
  /// Integer keys use the max-slope diagonal with an exact, half-up rounded
  /// intercept, so residuals stay within epsilon + 1/2. Float keys use the mid
  /// slope through the diagonal crossing.
  /// 整数键使用最大斜率对角线并精确四舍五入截距，残差不超过 epsilon + 1/2；
  /// 浮点键使用过对角线交点的中间斜率。
  #[must_use]
  pub fn fitted_line(&self, origin: X) -> Line<X> {
    let r = &self.rect;
    if self.one_point() {
      return Line {
        origin,
        slope: 0.0,
        intercept: (r[0].wide_y() + r[1].wide_y()).half(),
      };
    }

    if X::INTEGRAL {
      let slope = r[3] - r[1];
      let n = slope.dy * (origin.widen() - r[1].x.widen());
      let intercept = X::Wide::div_round(n, slope.dx) + r[1].wide_y();
      return Line {
        origin,
        slope: slope.as_f64(),
        intercept,
      };
    }

    let (slope, intercept) = self.center_line(origin);
    Line {
      origin,
      slope,
      intercept: X::Wide::from_f64(intercept),
    }
  }

  /// (slope, intercept at `origin`) of the mid-slope line through the diagonal
  /// crossing, unrounded; the midpoint of the two y-shifts for a single point
  /// 过对角线交点的中间斜率直线（斜率，`origin` 处截距），不取整；
  /// 单点时为两个 y 偏移的中点
  #[must_use]
  pub fn center_line(&self, origin: X) -> (f64, f64) {
    if self.one_point() {
      let r = &self.rect;
      return (0.0, (r[0].y.as_f64() + r[1].y.as_f64()) / 2.0);
    }
    let (i_x, i_y) = self.intersection();
    let (min_slope, max_slope) = self.slope_range();
    let slope = (min_slope + max_slope) / 2.0;
    (slope, i_y - (i_x - origin.as_f64()) * slope)
  }
}
