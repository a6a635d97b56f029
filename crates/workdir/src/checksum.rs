//! SHA-256 file digests
//!
//! The mirror uses these to avoid rewriting target files whose content
//! already matches the source.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const PREFIX: &str = "sha256:";

/// Compute the checksum of in-memory content as `"sha256:<hex>"`.
pub fn compute_content_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Compute the checksum of a file as `"sha256:<hex>"`, streaming its
/// contents.
pub fn compute_file_checksum(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{}{:x}", PREFIX, hasher.finalize()))
}

/// Whether two files have identical content.
pub fn same_content(a: &Path, b: &Path) -> io::Result<bool> {
    Ok(compute_file_checksum(a)? == compute_file_checksum(b)?)
}
