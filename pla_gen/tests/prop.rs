//! Property tests for dataset generation
//! 数据集生成的属性测试

use pla_gen::{Conf, Error, Plan, Target, assemble};
use proptest::prelude::*;

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(48))]

  #[test]
  fn keys_strictly_increase(
    seed in any::<u64>(),
    local_eps in 0i64..8,
    extra_eps in 8i64..64,
    global_segments in 1usize..5,
    locals_per_global in 1usize..5,
    keys_per_local in 2usize..200,
  ) {
    let local_segments = global_segments * locals_per_global;
    let t = Target {
      local_eps,
      global_eps: local_eps + extra_eps,
      local_segments,
      global_segments,
      total_keys: local_segments * keys_per_local,
    };
    match assemble(t, &[Conf::Seed(seed), Conf::SearchCap(1 << 12)]) {
      Ok(ds) => {
        prop_assert_eq!(ds.keys.len(), t.total_keys);
        prop_assert!(ds.keys[0] >= 1);
        prop_assert!(ds.keys.windows(2).all(|w| w[0] < w[1]));
      }
      Err(e) => prop_assert!(
        matches!(e, Error::InfeasibleSlopeSeparation { .. }),
        "{e}"
      ),
    }
  }

  #[test]
  fn plan_partitions(n in 1usize..100_000, g in 1usize..20, per in 1usize..10) {
    let l = g * per;
    if let Ok(p) = Plan::new(n, l, g) {
      prop_assert_eq!(p.keys(), n);
      prop_assert_eq!(p.locals(), l);
      prop_assert!(p.parts.iter().all(|part| part.keys_per_local >= 2));
    }
  }
}
