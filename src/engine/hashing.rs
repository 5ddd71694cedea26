//! Block hashing: split content into fixed-size blocks and blake3 each one.

use anyhow::Result;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::BlockInfo;
use crate::utils::config::HashingConsts;

fn block_at(offset: u64, data: &[u8]) -> BlockInfo {
    BlockInfo {
        offset,
        size: data.len() as u32,
        hash: *blake3::hash(data).as_bytes(),
    }
}

fn check_block_size(block_size: usize) -> io::Result<()> {
    if block_size == 0 || block_size > u32::MAX as usize {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid block size {block_size}"),
        ));
    }
    Ok(())
}

/// Hash everything `reader` yields into blocks of `block_size` bytes (last may be shorter).
/// Empty input gives an empty list.
pub fn blocks<R: Read>(mut reader: R, block_size: usize) -> io::Result<Vec<BlockInfo>> {
    check_block_size(block_size)?;
    let mut blocks = Vec::new();
    let mut buf = Vec::with_capacity(block_size);
    let mut offset = 0u64;
    loop {
        buf.clear();
        let n = reader
            .by_ref()
            .take(block_size as u64)
            .read_to_end(&mut buf)?;
        if n == 0 {
            break;
        }
        blocks.push(block_at(offset, &buf));
        offset += n as u64;
        if n < block_size {
            break;
        }
    }
    Ok(blocks)
}

/// Same as [`blocks`] over an in-memory slice.
pub fn blocks_from_slice(data: &[u8], block_size: usize) -> io::Result<Vec<BlockInfo>> {
    check_block_size(block_size)?;
    let mut offset = 0u64;
    Ok(data
        .chunks(block_size)
        .map(|chunk| {
            let b = block_at(offset, chunk);
            offset += chunk.len() as u64;
            b
        })
        .collect())
}

/// Block-hash a file. Uses memory-mapped I/O for files above threshold, buffered reads otherwise.
pub fn hash_file_blocks(path: &Path, block_size: usize) -> Result<Vec<BlockInfo>> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();

    if size > HashingConsts::HASH_MMAP_THRESHOLD {
        // Memory-mapped I/O for large files; a concurrent writer changes mtime, so the next scan rehashes
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(blocks_from_slice(&mmap, block_size)?)
    } else {
        let reader = BufReader::with_capacity(block_size.min(1024 * 1024), file);
        Ok(blocks(reader, block_size)?)
    }
}

/// Compare two block lists by offset, size and hash.
pub fn blocks_equal(a: &[BlockInfo], b: &[BlockInfo]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}
