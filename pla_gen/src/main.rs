use std::path::PathBuf;

use aok::{OK, Void};
use clap::Parser;
use log::info;
use pla_gen::{Conf, KeyDist, Target, assemble, conf::default, dump};

/// Write keys with prescribed local / global segment counts to a dump file
/// 生成具有指定局部 / 全局分段数的键并写入转储文件
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, allow_negative_numbers = true)]
struct Args {
  local_epsilon: i64,
  global_epsilon: i64,
  local_segment_count: usize,
  global_segment_count: usize,
  total_keys: usize,
  output_path: PathBuf,

  #[arg(short, long, default_value_t = default::SEED)]
  seed: u64,

  /// Offset keys by |N(0, sigma)| instead of uniformly
  #[arg(long)]
  sigma: Option<f64>,
}

fn main() -> Void {
  log_init::init();
  let args = Args::parse();

  let mut conf = vec![Conf::Seed(args.seed)];
  if let Some(sigma) = args.sigma {
    conf.push(Conf::Dist(KeyDist::Normal { sigma }));
  }
  let ds = assemble(
    Target {
      local_eps: args.local_epsilon,
      global_eps: args.global_epsilon,
      local_segments: args.local_segment_count,
      global_segments: args.global_segment_count,
      total_keys: args.total_keys,
    },
    &conf,
  )?;
  dump::write(&args.output_path, &ds.keys)?;
  info!(
    "{} keys written to {}",
    ds.keys.len(),
    args.output_path.display()
  );
  println!(
    "local {} / {}, global {} / {}",
    ds.report.local_actual,
    ds.report.local_target,
    ds.report.global_actual,
    ds.report.global_target
  );
  OK
}
