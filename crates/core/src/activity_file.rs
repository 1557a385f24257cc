//! Append-only JSONL activity log protected by a SHA-256 hash chain.
//!
//! Line 1 is a header (`format_version`, `user_id`). Every following line is one
//! [`ActivityEntry`] wrapped with its sequence number, the previous record's hash and its own
//! hash, where `sha256_hex = hex(SHA-256(json({seq, entry}) || prev_sha256_hex))`.
//!
//! Records are never rewritten. Updating a day (a retry, or flagging it synced) appends a new
//! record for that date and readers resolve the day with last-write-wins.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::mem;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::activity::{ActivityEntry, ActivityLog};
use crate::error::ActivityLoadError;

pub const FORMAT_VERSION: u16 = 1;

/// Previous-hash value for the first record.
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
struct Header {
    format_version: u16,
    user_id: String,
}

/// The hashed part of a record.
#[derive(Serialize)]
struct HashedBody<'a> {
    seq: u64,
    entry: &'a ActivityEntry,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct RecordLine {
    seq: u64,
    entry: ActivityEntry,
    prev_sha256_hex: String,
    sha256_hex: String,
}

fn chain_hash(
    seq: u64,
    entry: &ActivityEntry,
    prev_sha256_hex: &str,
) -> serde_json::Result<String> {
    let body = serde_json::to_string(&HashedBody { seq, entry })?;
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    hasher.update(prev_sha256_hex.as_bytes());
    Ok(format!("{:064x}", hasher.finalize()))
}

pub struct ActivityLogWriter {
    out: BufWriter<File>,
    prev_sha256_hex: String,
    next_seq: u64,
}

impl ActivityLogWriter {
    /// Creates (or truncates) the file and writes the header.
    pub fn create(path: &Path, user_id: &str) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = BufWriter::new(File::create(path)?);
        let header = Header { format_version: FORMAT_VERSION, user_id: user_id.to_string() };
        writeln!(out, "{}", serde_json::to_string(&header).map_err(io::Error::other)?)?;
        out.flush()?;
        Ok(Self { out, prev_sha256_hex: GENESIS_HASH.to_string(), next_seq: 0 })
    }

    /// Continues a chain previously read with [`load_activity_log`].
    pub fn resume(path: &Path, loaded: &LoadedActivityLog) -> io::Result<Self> {
        let file = OpenOptions::new().append(true).open(path)?;
        Ok(Self {
            out: BufWriter::new(file),
            prev_sha256_hex: loaded.last_sha256_hex.clone(),
            next_seq: loaded.next_seq,
        })
    }

    /// Writes one record and flushes it before returning.
    pub fn append(&mut self, entry: &ActivityEntry) -> io::Result<()> {
        let sha256_hex =
            chain_hash(self.next_seq, entry, &self.prev_sha256_hex).map_err(io::Error::other)?;
        let line = RecordLine {
            seq: self.next_seq,
            entry: entry.clone(),
            prev_sha256_hex: mem::replace(&mut self.prev_sha256_hex, sha256_hex.clone()),
            sha256_hex,
        };
        writeln!(self.out, "{}", serde_json::to_string(&line).map_err(io::Error::other)?)?;
        self.out.flush()?;
        self.next_seq += 1;
        Ok(())
    }

    /// Appends a synced copy of the latest entry for each of `dates` and records it in `log`.
    /// Returns how many dates changed.
    pub fn mark_synced(&mut self, log: &mut ActivityLog, dates: &[NaiveDate]) -> io::Result<usize> {
        let mut changed = 0;
        for &date in dates {
            let Some(latest) = log.get(date).filter(|entry| !entry.synced) else {
                continue;
            };
            let synced = ActivityEntry { synced: true, ..latest.clone() };
            self.append(&synced)?;
            log.record(synced);
            changed += 1;
        }
        Ok(changed)
    }

    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }
}

/// A verified log plus the chain tip needed to keep appending.
#[derive(Debug)]
pub struct LoadedActivityLog {
    pub format_version: u16,
    pub log: ActivityLog,
    pub last_sha256_hex: String,
    pub next_seq: u64,
}

/// Reads and verifies a whole activity file, failing at the first bad line.
pub fn load_activity_log(path: &Path) -> Result<LoadedActivityLog, ActivityLoadError> {
    let content = fs::read_to_string(path)?;
    let lines: Vec<&str> = content.lines().collect();
    if lines.is_empty() {
        return Err(ActivityLoadError::EmptyFile);
    }
    if !content.ends_with('\n') {
        return Err(ActivityLoadError::IncompleteLine { line: lines.len() });
    }

    let header: Header = serde_json::from_str(lines[0])
        .map_err(|e| ActivityLoadError::InvalidHeader { line: 1, message: e.to_string() })?;
    if header.format_version != FORMAT_VERSION {
        return Err(ActivityLoadError::InvalidHeader {
            line: 1,
            message: format!("unsupported format_version {}", header.format_version),
        });
    }

    let mut log = ActivityLog::new(header.user_id);
    let mut prev = GENESIS_HASH.to_string();
    let mut next_seq = 0;

    for (offset, text) in lines.iter().enumerate().skip(1) {
        let line = offset + 1;
        let invalid = |message: String| ActivityLoadError::InvalidRecord { line, message };
        if text.is_empty() {
            return Err(invalid("empty line".to_string()));
        }
        let record: RecordLine = serde_json::from_str(text).map_err(|e| invalid(e.to_string()))?;
        if record.seq != next_seq {
            return Err(invalid(format!("expected seq {next_seq}, found {}", record.seq)));
        }
        let expected =
            chain_hash(record.seq, &record.entry, &prev).map_err(|e| invalid(e.to_string()))?;
        if record.prev_sha256_hex != prev || record.sha256_hex != expected {
            warn!(path = %path.display(), line, "activity log hash chain broken");
            return Err(ActivityLoadError::HashChainBroken { line });
        }
        log.record(record.entry);
        prev = record.sha256_hex;
        next_seq += 1;
    }

    debug!(path = %path.display(), records = next_seq, "loaded activity log");
    Ok(LoadedActivityLog {
        format_version: header.format_version,
        log,
        last_sha256_hex: prev,
        next_seq,
    })
}

/// Loads `path` and resumes it, or starts a fresh file for `user_id` when it does not exist.
pub fn open_activity_log(
    path: &Path,
    user_id: &str,
) -> Result<(ActivityLog, ActivityLogWriter), ActivityLoadError> {
    if !path.exists() {
        let writer = ActivityLogWriter::create(path, user_id)?;
        return Ok((ActivityLog::new(user_id), writer));
    }
    let loaded = load_activity_log(path)?;
    let writer = ActivityLogWriter::resume(path, &loaded)?;
    Ok((loaded.log, writer))
}

#[cfg(test)]
mod tests;
