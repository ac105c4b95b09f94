//! # Synthetic keys with prescribed PLA segment counts
//! 具有指定分段数的合成键
//!
//! Generates strictly increasing keys that an optimal PLA splits into a
//! chosen number of local segments at a small epsilon and of global
//! segments at a large one.
//! 生成严格递增的键，使最优分段线性逼近在小 epsilon 下恰好分成指定数量的局部段，
//! 在大 epsilon 下分成指定数量的全局段。
//!
//! ```rust
//! use pla_gen::{Target, assemble};
//!
//! let ds = assemble(
//!   Target {
//!     local_eps: 2,
//!     global_eps: 32,
//!     local_segments: 40,
//!     global_segments: 4,
//!     total_keys: 20_000,
//!   },
//!   &[],
//! )
//! .unwrap();
//! assert_eq!(ds.keys.len(), 20_000);
//! assert!(ds.keys.windows(2).all(|w| w[0] < w[1]));
//! ```

mod assemble;
pub mod conf;
mod dist;
pub mod dump;
pub mod error;
mod keygen;
mod plan;
mod single;

pub use assemble::{Dataset, DatasetAssembler, Report, Target, assemble, check_monotonic};
pub use conf::{Conf, ParsedConf};
pub use dist::KeyDist;
pub use error::{Error, Result};
pub use keygen::ConstraintKeyGen;
pub use plan::{GlobalPart, Plan};
pub use single::{Scored, single_level, single_level_mse};
