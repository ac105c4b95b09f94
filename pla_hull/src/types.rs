//! Coordinate traits, points and exact slopes
//! 坐标约束、点与精确斜率

#![allow(clippy::cast_precision_loss, clippy::cast_lossless)]

use std::{cmp::Ordering, fmt::Debug, ops::Sub};

use crate::{Ext, Wide};

/// Key (x) domain
/// 键（x）域
pub trait Key: Copy + Default + PartialOrd + Debug + Send + Sync + 'static {
  /// Accumulator used for slope cross products
  /// 斜率交叉乘积使用的累加类型
  type Wide: Wide;

  /// Integer domains get an exactly rounded intercept
  /// 整数域得到精确舍入的截距
  const INTEGRAL: bool;

  fn widen(self) -> Self::Wide;

  fn as_f64(self) -> f64;
}

macro_rules! impl_int_key {
  ($($t:ty),*) => {
    $(
      impl Key for $t {
        type Wide = i128;
        const INTEGRAL: bool = true;

        #[inline(always)]
        fn widen(self) -> i128 {
          self as i128
        }

        #[inline(always)]
        fn as_f64(self) -> f64 {
          self as f64
        }
      }
    )*
  };
}

impl_int_key!(u8, i8, u16, i16, u32, i32, u64, i64, usize, isize);

macro_rules! impl_float_key {
  ($($t:ty),*) => {
    $(
      impl Key for $t {
        type Wide = Ext;
        const INTEGRAL: bool = false;

        #[inline(always)]
        fn widen(self) -> Ext {
          Ext(self as f64)
        }

        #[inline(always)]
        fn as_f64(self) -> f64 {
          self as f64
        }
      }
    )*
  };
}

impl_float_key!(f32, f64);

/// Rank (y) domain, always integral
/// 排名（y）域，总是整数
pub trait Rank: Copy + Default + Ord + Debug + Send + Sync + 'static {
  const ZERO: Self;

  /// `self + eps`, saturating at the type bound
  /// `self + eps`，在类型上界处饱和
  fn shift_up(self, eps: Self) -> Self;

  /// `self - eps`, saturating at the type bound
  /// `self - eps`，在类型下界处饱和
  fn shift_down(self, eps: Self) -> Self;

  fn to_i128(self) -> i128;

  fn as_f64(self) -> f64;
}

macro_rules! impl_rank {
  ($($t:ty),*) => {
    $(
      impl Rank for $t {
        const ZERO: Self = 0;

        #[inline(always)]
        fn shift_up(self, eps: Self) -> Self {
          self.saturating_add(eps)
        }

        #[inline(always)]
        fn shift_down(self, eps: Self) -> Self {
          self.saturating_sub(eps)
        }

        #[inline(always)]
        fn to_i128(self) -> i128 {
          self as i128
        }

        #[inline(always)]
        fn as_f64(self) -> f64 {
          self as f64
        }
      }
    )*
  };
}

impl_rank!(u32, i32, u64, i64, usize);

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point<X, Y> {
  pub x: X,
  pub y: Y,
}

impl<X: Key, Y: Rank> Point<X, Y> {
  #[inline(always)]
  pub const fn new(x: X, y: Y) -> Self {
    Self { x, y }
  }

  #[inline(always)]
  pub(crate) fn wide_y(self) -> X::Wide {
    X::Wide::from_i128(self.y.to_i128())
  }
}

impl<X: Key, Y: Rank> Sub for Point<X, Y> {
  type Output = Slope<X::Wide>;

  #[inline(always)]
  fn sub(self, p: Self) -> Slope<X::Wide> {
    Slope {
      dx: self.x.widen() - p.x.widen(),
      dy: self.wide_y() - p.wide_y(),
    }
  }
}

/// Rational slope dy/dx, compared by cross multiplication
/// 有理斜率 dy/dx，通过交叉相乘比较
///
/// Comparisons assume both `dx` share a sign, which holds for slopes taken
/// between points of one strictly increasing run.
/// 比较要求两个 `dx` 同号，在严格递增序列中取点时总成立。
#[derive(Clone, Copy, Debug, Default)]
pub struct Slope<W> {
  pub dx: W,
  pub dy: W,
}

impl<W: Wide> Slope<W> {
  #[inline(always)]
  pub const fn new(dx: W, dy: W) -> Self {
    Self { dx, dy }
  }

  #[inline]
  pub fn as_f64(self) -> f64 {
    self.dy.as_f64() / self.dx.as_f64()
  }
}

impl<W: Wide> PartialEq for Slope<W> {
  #[inline]
  fn eq(&self, p: &Self) -> bool {
    W::cmp_products(self.dy, p.dx, self.dx, p.dy) == Ordering::Equal
  }
}

impl<W: Wide> PartialOrd for Slope<W> {
  #[inline]
  fn partial_cmp(&self, p: &Self) -> Option<Ordering> {
    Some(W::cmp_products(self.dy, p.dx, self.dx, p.dy))
  }
}

/// Orientation of `o -> a -> b`: Greater is a left turn
/// `o -> a -> b` 的转向：Greater 表示左转
#[inline]
pub(crate) fn cross<X: Key, Y: Rank>(o: Point<X, Y>, a: Point<X, Y>, b: Point<X, Y>) -> Ordering {
  let oa = a - o;
  let ob = b - o;
  X::Wide::cmp_products(oa.dx, ob.dy, oa.dy, ob.dx)
}
