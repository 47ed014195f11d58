//! Canonical block serialization and digests.
//!
//! A block is converted to a JSON value first, which sorts every object's
//! keys, and then written with `", "` / `": "` separators and ASCII-only
//! string escapes. That is the exact text `json.dumps(block, sort_keys=True)`
//! produces, so digests agree with the other nodes of the network.

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use sha2::{Digest, Sha256};
use std::io;

use super::Block;

/// Writes compact-but-spaced JSON with non-ASCII characters escaped.
struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    writer.write_all(format!("\\u{:04x}", unit).as_bytes())?;
                }
            }
        }
        Ok(())
    }
}

/// Canonical text of any serializable value (keys sorted at every level).
pub fn canonical_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let sorted = serde_json::to_value(value)?;
    let mut out = Vec::with_capacity(256);
    let mut ser = Serializer::with_formatter(&mut out, CanonicalFormatter);
    sorted.serialize(&mut ser)?;
    // Formatter only ever writes valid UTF-8.
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Lowercase hex SHA-256 of arbitrary bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Digest of a block's canonical form.
pub fn hash_block(block: &Block) -> String {
    // Blocks only hold strings and finite numbers, so serialization cannot fail.
    let text = canonical_json(block).unwrap_or_default();
    sha256_hex(text.as_bytes())
}
