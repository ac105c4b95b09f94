//! Partition of keys into global and local segments
//! 键在全局段与局部段之间的划分

use crate::{Error, Result};

/// Key layout of one global segment
/// 一个全局段的键布局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalPart {
  pub locals: usize,
  pub keys_per_local: usize,
  /// Last local segment takes the remainder
  /// 最后一个局部段承接余数
  pub keys_in_last_local: usize,
}

impl GlobalPart {
  fn new(keys: usize, locals: usize) -> Self {
    let keys_per_local = keys / locals;
    Self {
      locals,
      keys_per_local,
      keys_in_last_local: keys_per_local + keys % locals,
    }
  }

  #[inline]
  pub fn local_size(&self, j: usize) -> usize {
    if j + 1 == self.locals {
      self.keys_in_last_local
    } else {
      self.keys_per_local
    }
  }

  pub fn keys(&self) -> usize {
    (self.locals - 1) * self.keys_per_local + self.keys_in_last_local
  }
}

/// Global segments in key order; the last one takes every remainder
/// 按键序排列的全局段；最后一段承接所有余数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
  pub parts: Vec<GlobalPart>,
}

impl Plan {
  pub fn new(total_keys: usize, local_segments: usize, global_segments: usize) -> Result<Self> {
    if global_segments == 0 {
      return Err(Error::config("at least one global segment is required"));
    }
    if local_segments < global_segments {
      return Err(Error::config("fewer local segments than global segments"));
    }
    let locals = local_segments / global_segments;
    let keys = total_keys / global_segments;
    let regular = GlobalPart::new(keys, locals);
    let last = GlobalPart::new(
      keys + total_keys % global_segments,
      locals + local_segments % global_segments,
    );
    // Every local line needs a second key to aim at
    if regular.keys_per_local < 2 || last.keys_per_local < 2 {
      return Err(Error::config(format!(
        "{total_keys} keys cannot fill {local_segments} local segments with two keys each"
      )));
    }
    let mut parts = vec![regular; global_segments - 1];
    parts.push(last);
    Ok(Self { parts })
  }

  pub fn keys(&self) -> usize {
    self.parts.iter().map(GlobalPart::keys).sum()
  }

  pub fn locals(&self) -> usize {
    self.parts.iter().map(|p| p.locals).sum()
  }
}
