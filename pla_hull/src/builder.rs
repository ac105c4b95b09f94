//! Streaming optimal PLA segment builder (convex hull)
//! 流式最优分段线性逼近构建器（凸包）
//!
//! Amortized O(1) per point: the live start of each hull chain only moves forward.
//! 每点均摊 O(1)：凸包链的起点只会前移。

use std::cmp::Ordering;

use crate::{
  Error, Key, Rank, Result, SegmentDescriptor,
  types::{Point, cross},
};

const HULL_RESERVE: usize = 1 << 16;

/// Feasible (slope, intercept) region of one open segment
/// 当前开放段的可行（斜率，截距）区域
///
/// `rect[2] - rect[0]` bounds the slope from below, `rect[3] - rect[1]` from
/// above. `upper` holds the +epsilon points, `lower` the -epsilon points.
/// `rect[2] - rect[0]` 是斜率下界，`rect[3] - rect[1]` 是斜率上界。
/// `upper` 存 +epsilon 点，`lower` 存 -epsilon 点。
#[derive(Clone, Debug)]
pub struct SegmentBuilder<X: Key, Y: Rank> {
  epsilon: Y,
  lower: Vec<Point<X, Y>>,
  upper: Vec<Point<X, Y>>,
  lower_start: usize,
  upper_start: usize,
  first_x: X,
  last_x: X,
  /// Points in the open segment, 0 after an infeasible point
  /// 开放段中的点数，遇到不可行点后为 0
  len: usize,
  /// Points that shaped `rect`, survives an infeasible point
  /// 构成 `rect` 的点数，不可行点后仍保留
  rect_len: usize,
  rect: [Point<X, Y>; 4],
}

impl<X: Key, Y: Rank> SegmentBuilder<X, Y> {
  /// # Errors
  /// `InvalidConfiguration` if epsilon is negative
  pub fn new(epsilon: Y) -> Result<Self> {
    if epsilon < Y::ZERO {
      return Err(Error::InvalidConfiguration("epsilon cannot be negative"));
    }
    Ok(Self {
      epsilon,
      lower: Vec::with_capacity(HULL_RESERVE),
      upper: Vec::with_capacity(HULL_RESERVE),
      lower_start: 0,
      upper_start: 0,
      first_x: X::default(),
      last_x: X::default(),
      len: 0,
      rect_len: 0,
      rect: [Point::default(); 4],
    })
  }

  #[inline]
  #[must_use]
  pub fn epsilon(&self) -> Y {
    self.epsilon
  }

  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.len
  }

  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  #[inline]
  #[must_use]
  pub fn first_x(&self) -> X {
    self.first_x
  }

  #[inline(always)]
  fn shifted(&self, x: X, y: Y) -> (Point<X, Y>, Point<X, Y>) {
    (
      Point::new(x, y.shift_up(self.epsilon)),
      Point::new(x, y.shift_down(self.epsilon)),
    )
  }

  /// Whether the +/- epsilon points fall outside the current slope bounds
  /// +/- epsilon 点是否落在当前斜率边界之外
  #[inline]
  fn outside(&self, p1: Point<X, Y>, p2: Point<X, Y>) -> bool {
    let r = &self.rect;
    let slope1 = r[2] - r[0];
    let slope2 = r[3] - r[1];
    p1 - r[2] < slope1 || p2 - r[3] > slope2
  }

  /// Probe (x, y) without changing state
  /// 探测 (x, y)，不修改状态
  #[must_use]
  pub fn check_point(&self, x: X, y: Y) -> bool {
    if self.len < 2 {
      return true;
    }
    let (p1, p2) = self.shifted(x, y);
    !self.outside(p1, p2)
  }

  /// Add (x, y); `Ok(false)` means the segment is closed and `reset` must be
  /// called before reusing the builder.
  /// 添加 (x, y)；返回 `Ok(false)` 表示段已关闭，复用前必须调用 `reset`。
  ///
  /// # Errors
  /// `SequenceOrderViolation` if x does not exceed the previous x; state is untouched
  #[allow(clippy::neg_cmp_op_on_partial_ord)]
  pub fn add_point(&mut self, x: X, y: Y) -> Result<bool> {
    if self.len > 0 && !(x > self.last_x) {
      return Err(Error::SequenceOrderViolation {
        x: x.as_f64(),
        last_x: self.last_x.as_f64(),
      });
    }

    self.last_x = x;
    let (p1, p2) = self.shifted(x, y);

    match self.len {
      0 => {
        self.first_x = x;
        self.rect[0] = p1;
        self.rect[1] = p2;
        self.upper.clear();
        self.lower.clear();
        self.upper.push(p1);
        self.lower.push(p2);
        self.upper_start = 0;
        self.lower_start = 0;
        self.len = 1;
        self.rect_len = 1;
        return Ok(true);
      }
      1 => {
        self.rect[2] = p2;
        self.rect[3] = p1;
        self.upper.push(p1);
        self.lower.push(p2);
        self.len = 2;
        self.rect_len = 2;
        return Ok(true);
      }
      _ => {}
    }

    if self.outside(p1, p2) {
      self.len = 0;
      return Ok(false);
    }

    let slope1 = self.rect[2] - self.rect[0];
    let slope2 = self.rect[3] - self.rect[1];

    if p1 - self.rect[1] < slope2 {
      // Tighten the max slope
      let mut min = self.lower[self.lower_start] - p1;
      let mut min_i = self.lower_start;
      for i in self.lower_start + 1..self.lower.len() {
        let val = self.lower[i] - p1;
        if val > min {
          break;
        }
        min = val;
        min_i = i;
      }

      self.rect[1] = self.lower[min_i];
      self.rect[3] = p1;
      self.lower_start = min_i;

      let mut end = self.upper.len();
      while end >= self.upper_start + 2
        && cross(self.upper[end - 2], self.upper[end - 1], p1) != Ordering::Greater
      {
        end -= 1;
      }
      self.upper.truncate(end);
      self.upper.push(p1);
    }

    if p2 - self.rect[0] > slope1 {
      // Tighten the min slope
      let mut max = self.upper[self.upper_start] - p2;
      let mut max_i = self.upper_start;
      for i in self.upper_start + 1..self.upper.len() {
        let val = self.upper[i] - p2;
        if val < max {
          break;
        }
        max = val;
        max_i = i;
      }

      self.rect[0] = self.upper[max_i];
      self.rect[2] = p2;
      self.upper_start = max_i;

      let mut end = self.lower.len();
      while end >= self.lower_start + 2
        && cross(self.lower[end - 2], self.lower[end - 1], p2) != Ordering::Less
      {
        end -= 1;
      }
      self.lower.truncate(end);
      self.lower.push(p2);
    }

    self.len += 1;
    self.rect_len = self.len;
    Ok(true)
  }

  /// Descriptor of the open segment, or of the one just closed by an
  /// infeasible point. `None` right after `new` or `reset`.
  /// 当前开放段的描述；若刚遇到不可行点，则为刚关闭的段。`new`/`reset` 后为 `None`。
  #[must_use]
  pub fn segment(&self) -> Option<SegmentDescriptor<X, Y>> {
    match self.rect_len {
      0 => None,
      1 => Some(SegmentDescriptor::new(
        [self.rect[0], self.rect[1], self.rect[0], self.rect[1]],
        self.first_x,
      )),
      _ => Some(SegmentDescriptor::new(self.rect, self.first_x)),
    }
  }

  /// Start a new segment
  /// 开始新段
  pub fn reset(&mut self) {
    self.len = 0;
    self.rect_len = 0;
    self.lower.clear();
    self.upper.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn chains_stay_convex() {
    let mut seg = SegmentBuilder::<u64, u64>::new(2).unwrap();
    let mut rng = fastrand::Rng::with_seed(7);
    let mut x = 0u64;
    for y in 0..500u64 {
      x += 1 + rng.u64(..4);
      if !seg.add_point(x, y).unwrap() {
        seg.reset();
        seg.add_point(x, y).unwrap();
      }
      let up = &seg.upper[seg.upper_start..];
      for w in up.windows(3) {
        assert_eq!(cross(w[0], w[1], w[2]), Ordering::Greater);
      }
      let lo = &seg.lower[seg.lower_start..];
      for w in lo.windows(3) {
        assert_eq!(cross(w[0], w[1], w[2]), Ordering::Less);
      }
    }
  }

  #[test]
  fn order_violation_keeps_state() {
    let mut seg = SegmentBuilder::<u64, u64>::new(1).unwrap();
    for (x, y) in [(1, 0), (3, 1), (5, 2)] {
      assert!(seg.add_point(x, y).unwrap());
    }
    let before = (seg.upper.clone(), seg.lower.clone(), seg.rect);
    assert!(seg.add_point(5, 3).is_err());
    assert_eq!(before, (seg.upper.clone(), seg.lower.clone(), seg.rect));
    assert_eq!(seg.len(), 3);
  }
}
