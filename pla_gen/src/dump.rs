//! Key dump files: a native-endian u64 count followed by that many u64 keys
//! 键转储文件：原生字节序的 u64 数量，后接同样数量的 u64 键

use std::{
  fs::File,
  io::{BufWriter, Write},
  path::Path,
};

use crate::{Error, Result};

const WORD: usize = size_of::<u64>();

pub fn write(path: impl AsRef<Path>, keys: &[u64]) -> Result<()> {
  let mut out = BufWriter::new(File::create(path)?);
  out.write_all(&(keys.len() as u64).to_ne_bytes())?;
  for k in keys {
    out.write_all(&k.to_ne_bytes())?;
  }
  out.flush()?;
  Ok(())
}

pub fn read(path: impl AsRef<Path>) -> Result<Vec<u64>> {
  let buf = std::fs::read(path)?;
  let len = buf.len();
  if len < WORD || len % WORD != 0 {
    return Err(Error::BadDump { len });
  }
  let mut words = buf.chunks_exact(WORD).map(|c| {
    let mut w = [0u8; WORD];
    w.copy_from_slice(c);
    u64::from_ne_bytes(w)
  });
  let count = words.next().unwrap_or(0);
  if count != (len / WORD - 1) as u64 {
    return Err(Error::BadDump { len });
  }
  Ok(words.collect())
}
