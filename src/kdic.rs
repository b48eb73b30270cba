//! Compiled binary dictionary format (`KDIC`). Compiling bakes the fully
//! built dictionary (variants generated, filters applied, costs resolved)
//! into an open-addressing hash table over a NUL-terminated string pool,
//! so loading needs no text parsing and no cost computation.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! magic        = "KDIC"
//! version      = u32 (= 1)
//! num_entries  = u32
//! table_size   = u32 (power of two)
//! default_cost = f32
//! unknown_cost = f32
//! max_bytes    = u32 (DP lookahead bound, in code points)
//! reserved     = u32 (= 0)
//! table[table_size] of { offset: u32, cost: f32 }
//! string_pool  (byte 0 is a NUL sentinel; offset 0 marks an empty slot)
//! ```

use std::fs;
use std::path::Path;

use crate::dictionary::Dictionary;
use crate::{Error, Result};

pub const MAGIC: [u8; 4] = *b"KDIC";
pub const VERSION: u32 = 1;

const HEADER_LEN: usize = 32;
const SLOT_LEN: usize = 8;
const MAX_LOAD: f64 = 0.70;

/// djb2 over the word's UTF-8 bytes; keys the open-addressing table.
pub fn djb2(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 5381;
    for &b in bytes {
        hash = hash.wrapping_mul(33).wrapping_add(u32::from(b));
    }
    hash
}

/// Serialize a built dictionary. Entries are placed in sorted order so the
/// same dictionary always produces the same bytes.
pub fn encode(dict: &Dictionary) -> Vec<u8> {
    let mut entries: Vec<(&str, f32)> = dict.entries().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let num_entries = entries.len() as u32;
    let mut table_size: u32 = 1;
    while f64::from(table_size) * MAX_LOAD < f64::from(num_entries) {
        table_size <<= 1;
    }
    let mask = table_size - 1;

    let mut table = vec![(0u32, 0f32); table_size as usize];
    let mut pool: Vec<u8> = vec![0];

    for (word, cost) in entries {
        let offset = pool.len() as u32;
        pool.extend_from_slice(word.as_bytes());
        pool.push(0);

        let mut slot = (djb2(word.as_bytes()) & mask) as usize;
        while table[slot].0 != 0 {
            slot = (slot + 1) & (mask as usize);
        }
        table[slot] = (offset, cost);
    }

    let mut out =
        Vec::with_capacity(HEADER_LEN + table.len() * SLOT_LEN + pool.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&num_entries.to_le_bytes());
    out.extend_from_slice(&table_size.to_le_bytes());
    out.extend_from_slice(&dict.default_cost().to_le_bytes());
    out.extend_from_slice(&dict.unknown_cost().to_le_bytes());
    out.extend_from_slice(&(dict.max_word_len() as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    for (offset, cost) in table {
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&cost.to_le_bytes());
    }
    out.extend_from_slice(&pool);
    out
}

/// Deserialize a dictionary previously written by [`encode`].
pub fn decode(bytes: &[u8]) -> Result<Dictionary> {
    let mut cursor = Cursor { bytes, pos: 0 };

    let magic = cursor.take(4)?;
    if magic != MAGIC {
        return Err(Error::InvalidKdic("bad magic".into()));
    }
    let version = cursor.u32()?;
    if version != VERSION {
        return Err(Error::InvalidKdic(format!(
            "unsupported version {version}"
        )));
    }

    let num_entries = cursor.u32()? as usize;
    let table_size = cursor.u32()? as usize;
    if table_size == 0 || !table_size.is_power_of_two() {
        return Err(Error::InvalidKdic(format!(
            "table size {table_size} is not a power of two"
        )));
    }
    let default_cost = cursor.f32()?;
    let unknown_cost = cursor.f32()?;
    let max_word_len = cursor.u32()? as usize;
    let _reserved = cursor.u32()?;

    let table_bytes = table_size
        .checked_mul(SLOT_LEN)
        .ok_or_else(|| Error::InvalidKdic("table size overflow".into()))?;
    let pool_start = HEADER_LEN + table_bytes;
    if bytes.len() < pool_start {
        return Err(Error::InvalidKdic("truncated hash table".into()));
    }
    let pool = &bytes[pool_start..];

    let mut entries = Vec::with_capacity(num_entries);
    for _ in 0..table_size {
        let offset = cursor.u32()? as usize;
        let cost = cursor.f32()?;
        if offset == 0 {
            continue;
        }
        if offset >= pool.len() {
            return Err(Error::InvalidKdic(format!(
                "string offset {offset} outside pool"
            )));
        }
        let tail = &pool[offset..];
        let end = tail
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::InvalidKdic("unterminated pool string".into()))?;
        let word = std::str::from_utf8(&tail[..end])
            .map_err(|e| Error::InvalidKdic(format!("pool string is not UTF-8: {e}")))?;
        entries.push((word.to_string(), cost));
    }

    if entries.len() != num_entries {
        return Err(Error::InvalidKdic(format!(
            "expected {num_entries} entries, found {}",
            entries.len()
        )));
    }

    Ok(Dictionary::from_precompiled(
        entries,
        default_cost,
        unknown_cost,
        max_word_len,
    ))
}

pub fn write_file(dict: &Dictionary, path: &Path) -> Result<()> {
    fs::write(path, encode(dict))?;
    Ok(())
}

pub fn read_file(path: &Path) -> Result<Dictionary> {
    if !path.exists() {
        return Err(Error::MissingDictionary(path.to_path_buf()));
    }
    decode(&fs::read(path)?)
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos + n;
        if end > self.bytes.len() {
            return Err(Error::InvalidKdic("truncated input".into()));
        }
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn f32(&mut self) -> Result<f32> {
        let b = self.take(4)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}
