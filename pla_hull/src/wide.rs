//! Overflow-safe accumulators for slope cross products
//! 斜率交叉乘积的防溢出累加类型
//!
//! Integer keys widen to `i128`, float keys to [`Ext`].
//! 整数键扩展为 `i128`，浮点键扩展为 [`Ext`]。

#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

use std::{
  cmp::Ordering,
  fmt::Debug,
  ops::{Add, Mul, Sub},
};

/// Signed accumulator at least twice as wide as the coordinate it holds
/// 至少两倍于坐标位宽的有符号累加类型
pub trait Wide:
  Copy
  + Debug
  + PartialEq
  + Add<Output = Self>
  + Sub<Output = Self>
  + Mul<Output = Self>
  + Send
  + Sync
  + 'static
{
  const ZERO: Self;

  fn from_i128(v: i128) -> Self;

  fn from_f64(v: f64) -> Self;

  fn as_f64(self) -> f64;

  /// Compare `a * b` with `c * d`
  /// 比较 `a * b` 与 `c * d`
  fn cmp_products(a: Self, b: Self, c: Self, d: Self) -> Ordering;

  /// `n / d`, integers round half away from zero
  /// `n / d`，整数按四舍五入（远离零）
  fn div_round(n: Self, d: Self) -> Self;

  fn half(self) -> Self;
}

impl Wide for i128 {
  const ZERO: Self = 0;

  #[inline(always)]
  fn from_i128(v: i128) -> Self {
    v
  }

  #[inline(always)]
  fn from_f64(v: f64) -> Self {
    v.round() as i128
  }

  #[inline(always)]
  fn as_f64(self) -> f64 {
    self as f64
  }

  #[inline(always)]
  fn cmp_products(a: Self, b: Self, c: Self, d: Self) -> Ordering {
    (a * b).cmp(&(c * d))
  }

  #[inline]
  fn div_round(n: Self, d: Self) -> Self {
    let rounding = (if (n < 0) != (d < 0) { -d } else { d }) / 2;
    (n + rounding) / d
  }

  #[inline(always)]
  fn half(self) -> Self {
    self / 2
  }
}

/// Compensated `f64` for float key domains
/// 浮点键域使用的补偿 `f64`
///
/// Product comparisons go through Kahan's FMA difference of products, so the
/// sign of `a*b - c*d` is exact to about one ulp of the true difference.
/// 乘积比较使用 Kahan 的 FMA 乘积差算法，`a*b - c*d` 的符号误差约为一个 ulp。
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Ext(pub f64);

impl Add for Ext {
  type Output = Self;

  #[inline(always)]
  fn add(self, rhs: Self) -> Self {
    Self(self.0 + rhs.0)
  }
}

impl Sub for Ext {
  type Output = Self;

  #[inline(always)]
  fn sub(self, rhs: Self) -> Self {
    Self(self.0 - rhs.0)
  }
}

impl Mul for Ext {
  type Output = Self;

  #[inline(always)]
  fn mul(self, rhs: Self) -> Self {
    Self(self.0 * rhs.0)
  }
}

/// `a*b - c*d` with a single rounding error
/// 仅含一次舍入误差的 `a*b - c*d`
#[inline]
fn diff_of_products(a: f64, b: f64, c: f64, d: f64) -> f64 {
  let w = c * d;
  let err = (-c).mul_add(d, w);
  a.mul_add(b, -w) + err
}

impl Wide for Ext {
  const ZERO: Self = Self(0.0);

  #[inline(always)]
  fn from_i128(v: i128) -> Self {
    Self(v as f64)
  }

  #[inline(always)]
  fn from_f64(v: f64) -> Self {
    Self(v)
  }

  #[inline(always)]
  fn as_f64(self) -> f64 {
    self.0
  }

  #[inline]
  fn cmp_products(a: Self, b: Self, c: Self, d: Self) -> Ordering {
    diff_of_products(a.0, b.0, c.0, d.0)
      .partial_cmp(&0.0)
      .unwrap_or(Ordering::Equal)
  }

  #[inline(always)]
  fn div_round(n: Self, d: Self) -> Self {
    Self(n.0 / d.0)
  }

  #[inline(always)]
  fn half(self) -> Self {
    Self(self.0 / 2.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn i128_div_round_half_away() {
    assert_eq!(i128::div_round(5, 2), 3);
    assert_eq!(i128::div_round(-5, 2), -3);
    assert_eq!(i128::div_round(4, 3), 1);
    assert_eq!(i128::div_round(5, -3), -2);
  }

  #[test]
  fn ext_cancellation() {
    // (1e8 + 1)^2 is not representable, a naive product difference rounds to 0
    let a = Ext(1e8 + 1.0);
    let c = Ext(1e8);
    assert_eq!(Ext::cmp_products(a, a, c, Ext(1e8 + 2.0)), Ordering::Greater);
  }
}
