use std::path::PathBuf;

use aok::{OK, Void};
use clap::Parser;
use pla_gen::dump;
use pla_hull::measure;

/// Count optimal PLA segments of a key dump at each epsilon
/// 统计键转储文件在各 epsilon 下的最优分段数
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
  path: PathBuf,

  #[arg(required = true)]
  epsilons: Vec<u64>,

  /// Also report the mean squared error of the fitted lines
  #[arg(long)]
  mse: bool,
}

fn main() -> Void {
  log_init::init();
  let args = Args::parse();

  let mut keys = dump::read(&args.path)?;
  keys.sort_unstable();
  for eps in args.epsilons {
    let m = measure(&keys, eps, args.mse)?;
    match m.mse {
      Some(mse) => println!("eps {eps}: {} segments, mse {mse:.4}", m.segments),
      None => println!("eps {eps}: {} segments", m.segments),
    }
  }
  OK
}
