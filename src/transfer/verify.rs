use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use sha1::{Digest, Sha1};

/// Compute the SHA-1 digest of a file by streaming it in chunks.
pub fn hash_file(path: &Path, chunk_size: usize) -> Result<Vec<u8>> {
    let mut file = File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let mut hasher = Sha1::new();
    let mut buffer = vec![0_u8; chunk_size.max(1)];
    loop {
        let read = file
            .read(&mut buffer)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hasher.finalize().to_vec())
}

/// Check that `destination` holds the same content as `source`.
///
/// Sizes are compared first. The destination is always hashed from disk;
/// the source is hashed only when no digest from the copy pass is given.
pub fn verify_copy(source: &Path, destination: &Path, source_digest: Option<&[u8]>, chunk_size: usize) -> Result<bool> {
    let source_size = fs::metadata(source)
        .with_context(|| format!("Failed to read metadata: {}", source.display()))?
        .len();
    let destination_size = fs::metadata(destination)
        .with_context(|| format!("Failed to read metadata: {}", destination.display()))?
        .len();
    if source_size != destination_size {
        return Ok(false);
    }

    let source_digest = match source_digest {
        Some(digest) => digest.to_vec(),
        None => hash_file(source, chunk_size)?,
    };
    let destination_digest = hash_file(destination, chunk_size)?;
    Ok(source_digest == destination_digest)
}
