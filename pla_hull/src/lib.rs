//! # Optimal PLA: streaming convex-hull segmentation
//! 最优分段线性逼近：流式凸包分段
//!
//! Keeps, in amortized O(1) per point, the exact set of lines that fit every
//! point of the open segment within ±epsilon.
//! 以均摊 O(1) 的代价维护能在 ±epsilon 内拟合当前段所有点的直线集合。
//!
//! ## Usage / 使用方法
//!
//! ```rust
//! use pla_hull::{SegmentBuilder, count_sorted};
//!
//! let mut seg = SegmentBuilder::<u64, u64>::new(0).unwrap();
//! assert!(seg.add_point(1, 1).unwrap());
//! assert!(seg.add_point(2, 2).unwrap());
//! assert!(seg.add_point(3, 3).unwrap());
//!
//! let keys: Vec<u64> = (0..1000).map(|i| i * 3).collect();
//! assert_eq!(count_sorted(&keys, 4).unwrap(), 1);
//! ```

mod builder;
pub mod error;
mod metric;
mod segment;
mod types;
mod wide;

pub use builder::SegmentBuilder;
pub use error::{Error, Result};
pub use metric::{Metric, count_segments, count_sorted, measure, window_skew};
pub use segment::{Line, SegmentDescriptor};
pub use types::{Key, Point, Rank, Slope};
pub use wide::{Ext, Wide};
