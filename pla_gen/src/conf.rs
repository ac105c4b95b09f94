//! Generator configuration
//! 生成器配置

use crate::KeyDist;

/// Default configuration values
/// 默认配置值
pub mod default {
  pub const SEED: u64 = 2_303_649_288;
  /// Global slope = dy / dx, both drawn uniformly from these inclusive ranges
  /// 全局斜率 = dy / dx，二者均从以下闭区间均匀抽取
  pub const GLOBAL_DX: (i64, i64) = (101, 102);
  pub const GLOBAL_DY: (i64, i64) = (1, 10);
  pub const LOCAL_SLOPE_CAP: f64 = 0.2;
  pub const SEARCH_CAP: usize = 1 << 20;
  /// Offset spread of the single-level generator
  /// 单层生成器的偏移离散度
  pub const SIGMA: f64 = 20.0;
  /// Widest open window when a segment holds a single point
  /// 段内仅有一个点时的最大开放窗口
  pub const INCREASE_BOUND: i64 = 1000;
  /// Random model slopes stay below `i64::MAX / (keys * SLOPE_HEADROOM)`
  /// 随机模型斜率不超过 `i64::MAX / (keys * SLOPE_HEADROOM)`
  pub const SLOPE_HEADROOM: f64 = 1000.0;
}

/// Generator configuration item
/// 生成器配置项
#[derive(Debug, Clone, Copy)]
pub enum Conf {
  /// Seed of the generator's own random source
  /// 生成器自有随机源的种子
  Seed(u64),
  /// How a key is picked inside its feasible window
  /// 在可行窗口内选键的方式
  Dist(KeyDist),
  /// Inclusive range of the global slope denominator
  /// 全局斜率分母的闭区间
  GlobalDx(i64, i64),
  /// Inclusive range of the global slope numerator
  /// 全局斜率分子的闭区间
  GlobalDy(i64, i64),
  /// Local slope search nudges the slope below this
  /// 局部斜率搜索将斜率推到此值以下
  LocalSlopeCap(f64),
  /// Iteration cap of every nudging loop
  /// 每个微调循环的迭代上限
  SearchCap(usize),
  /// Shuffle single-level output with the seeded source
  /// 用带种子的随机源打乱单层生成结果
  Shuffle(bool),
}

/// Parsed configuration
/// 解析后的配置
#[derive(Debug, Clone, Copy)]
pub struct ParsedConf {
  pub seed: u64,
  pub dist: KeyDist,
  pub global_dx: (i64, i64),
  pub global_dy: (i64, i64),
  pub local_slope_cap: f64,
  pub search_cap: usize,
  pub shuffle: bool,
}

impl Default for ParsedConf {
  fn default() -> Self {
    Self {
      seed: default::SEED,
      dist: KeyDist::Uniform,
      global_dx: default::GLOBAL_DX,
      global_dy: default::GLOBAL_DY,
      local_slope_cap: default::LOCAL_SLOPE_CAP,
      search_cap: default::SEARCH_CAP,
      shuffle: false,
    }
  }
}

#[inline]
fn range(lo: i64, hi: i64) -> (i64, i64) {
  let lo = lo.max(1);
  (lo, hi.max(lo))
}

impl ParsedConf {
  pub fn new(conf: &[Conf]) -> Self {
    let mut c = Self::default();
    for item in conf {
      match *item {
        Conf::Seed(v) => c.seed = v,
        Conf::Dist(v) => c.dist = v.sanitize(),
        Conf::GlobalDx(lo, hi) => c.global_dx = range(lo, hi),
        Conf::GlobalDy(lo, hi) => c.global_dy = range(lo, hi),
        Conf::LocalSlopeCap(v) => {
          if v > 0.0 && v < 1.0 {
            c.local_slope_cap = v;
          }
        }
        Conf::SearchCap(v) => c.search_cap = v.max(1),
        Conf::Shuffle(v) => c.shuffle = v,
      }
    }
    c
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clamps() {
    let c = ParsedConf::new(&[
      Conf::GlobalDx(0, -5),
      Conf::GlobalDy(3, 7),
      Conf::LocalSlopeCap(4.0),
      Conf::SearchCap(0),
      Conf::Seed(9),
    ]);
    assert_eq!(c.global_dx, (1, 1));
    assert_eq!(c.global_dy, (3, 7));
    assert_eq!(c.local_slope_cap, default::LOCAL_SLOPE_CAP);
    assert_eq!(c.search_cap, 1);
    assert_eq!(c.seed, 9);
  }
}
