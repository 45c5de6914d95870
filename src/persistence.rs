//! File I/O for the solution table.
//!
//! Binary format (little endian, no header): one u64 packed path per
//! combined state, orientation-major, so the entry of `(ori, perm)` starts at
//! byte `(ori * 5040 + perm) * 8`. The file is exactly
//! `3,674,160 * 8` bytes.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info};

use crate::error::SolveError;
use crate::store::{PackedPath, ScrambleStore, STATE_COUNT};

const ENTRY_BYTES: usize = std::mem::size_of::<u64>();

/// Exact size of a table file.
pub const TABLE_BYTES: u64 = (STATE_COUNT * ENTRY_BYTES) as u64;

/// Entries read or written per buffered chunk.
const CHUNK_ENTRIES: usize = 1 << 16;

/// Sibling of `path` that a table is written to before being renamed into
/// place.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("table"));
    name.push(".partial");
    path.with_file_name(name)
}

/// Writes the table to `path`, replacing any existing file.
///
/// The bytes go to a staging file in the same directory first, so an
/// interrupted write never leaves a truncated table at `path`.
pub fn save(store: &ScrambleStore, path: &Path) -> Result<(), SolveError> {
    let start_time = Instant::now();
    let staging = staging_path(path);

    if let Err(source) = write_entries(store, &staging) {
        let _ = fs::remove_file(&staging);
        return Err(SolveError::Io {
            path: staging,
            source,
        });
    }
    if let Err(source) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(SolveError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    info!(
        "Wrote {} ({} bytes) in {:.2?}",
        path.display(),
        TABLE_BYTES,
        start_time.elapsed()
    );
    Ok(())
}

fn write_entries(store: &ScrambleStore, path: &Path) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut buffer = Vec::with_capacity(CHUNK_ENTRIES * ENTRY_BYTES);
    for chunk in store.paths().chunks(CHUNK_ENTRIES) {
        buffer.clear();
        for entry in chunk {
            buffer.extend_from_slice(&entry.raw().to_le_bytes());
        }
        writer.write_all(&buffer)?;
    }
    writer.flush()?;
    writer.get_ref().sync_all()
}

/// Reads and validates a table from `path`.
///
/// A file that cannot be opened is [`SolveError::PersistenceUnavailable`],
/// one of the wrong size is [`SolveError::TableSizeMismatch`], and one with
/// impossible entries is [`SolveError::CorruptPersistedTable`].
pub fn load(path: &Path) -> Result<ScrambleStore, SolveError> {
    let start_time = Instant::now();
    let unavailable = |source| SolveError::PersistenceUnavailable {
        path: path.to_path_buf(),
        source,
    };
    let corrupt = |reason: String| SolveError::CorruptPersistedTable {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(unavailable)?;
    let length = file.metadata().map_err(unavailable)?.len();
    if length != TABLE_BYTES {
        return Err(SolveError::TableSizeMismatch {
            path: path.to_path_buf(),
            expected: TABLE_BYTES,
            found: length,
        });
    }

    let mut reader = BufReader::new(file);
    let mut paths = Vec::with_capacity(STATE_COUNT);
    let mut buffer = vec![0u8; CHUNK_ENTRIES * ENTRY_BYTES];
    while paths.len() < STATE_COUNT {
        let entries = (STATE_COUNT - paths.len()).min(CHUNK_ENTRIES);
        let bytes = &mut buffer[..entries * ENTRY_BYTES];
        reader
            .read_exact(bytes)
            .map_err(|e| corrupt(format!("read failed after {} entries: {e}", paths.len())))?;
        paths.extend(bytes.chunks_exact(ENTRY_BYTES).map(|raw| {
            let mut word = [0u8; ENTRY_BYTES];
            word.copy_from_slice(raw);
            PackedPath::from_raw(u64::from_le_bytes(word))
        }));
    }

    let store = ScrambleStore::from_paths(paths);
    store.validate().map_err(corrupt)?;
    debug!("Validated {} entries", STATE_COUNT);

    info!(
        "Loaded {} in {:.2?}",
        path.display(),
        start_time.elapsed()
    );
    Ok(store)
}
