use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::error::LedgerError;

/// Chunk name meaning "nothing to read"; its digest is the same marker.
pub const NO_CHUNK: &str = "0";

/// Largest chunk that will be hashed.
pub const MAX_CHUNK_BYTES: u64 = 64 * 1024 * 1024;

/// SHA-256 (lowercase hex) of a file chunk, streamed from disk.
///
/// Only regular files up to [`MAX_CHUNK_BYTES`] are read; devices, pipes
/// and directories are refused before any byte is consumed.
pub fn digest_file(block_name: &str) -> Result<String, LedgerError> {
    digest_capped(block_name, MAX_CHUNK_BYTES)
}

fn digest_capped(block_name: &str, max_bytes: u64) -> Result<String, LedgerError> {
    if block_name == NO_CHUNK {
        return Ok(NO_CHUNK.to_string());
    }

    let read_err = |source| LedgerError::FileRead {
        path: block_name.to_string(),
        source,
    };
    let path = Path::new(block_name);
    let meta = fs::metadata(path).map_err(read_err)?;
    if !meta.is_file() {
        return Err(read_err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }

    let file = File::open(path).map_err(read_err)?;
    // One byte past the cap tells an oversized file apart from an exact fit.
    let mut reader = BufReader::new(file).take(max_bytes + 1);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    let mut total: u64 = 0;
    loop {
        let n = reader.read(&mut buf).map_err(read_err)?;
        if n == 0 {
            break;
        }
        total += n as u64;
        if total > max_bytes {
            return Err(read_err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("chunk larger than {max_bytes} bytes"),
            )));
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
