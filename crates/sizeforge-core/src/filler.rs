//! Filler content.
//!
//! Filler is pseudo-random so that deflate cannot shrink it, and seeded so
//! the same declared length always serializes to the same bytes.

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::io::{self, Write};

/// Seed used when none is given
pub const DEFAULT_SEED: u64 = 0x5EED_F111_u64;

/// Chunk size for streaming filler into a writer (64 KiB)
const WRITE_CHUNK: usize = 64 * 1024;

/// A run of filler content of a declared length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillerUnit {
    len: u64,
    seed: u64,
}

impl FillerUnit {
    /// Filler of `len` bytes with the default seed
    #[must_use]
    pub fn new(len: u64) -> Self {
        Self::with_seed(len, DEFAULT_SEED)
    }

    /// Filler of `len` bytes with an explicit seed
    #[must_use]
    pub fn with_seed(len: u64, seed: u64) -> Self {
        Self { len, seed }
    }

    /// Zero-length filler
    #[must_use]
    pub fn empty() -> Self {
        Self::new(0)
    }

    /// Same seed, different length
    #[must_use]
    pub fn resized(&self, len: u64) -> Self {
        Self::with_seed(len, self.seed)
    }

    /// Declared length in bytes
    #[must_use]
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the filler carries no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Seed of the content generator
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    /// Materialize the filler as raw bytes
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.len as usize];
        self.rng().fill_bytes(&mut bytes);
        bytes
    }

    /// Stream the filler into `writer` without holding it all in memory.
    ///
    /// # Errors
    ///
    /// Propagates any write error.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let mut rng = self.rng();
        let mut chunk = vec![0u8; WRITE_CHUNK];
        let mut remaining = self.len;

        while remaining > 0 {
            let n = remaining.min(WRITE_CHUNK as u64) as usize;
            rng.fill_bytes(&mut chunk[..n]);
            writer.write_all(&chunk[..n])?;
            remaining -= n as u64;
        }
        Ok(())
    }

    /// Materialize the filler as printable ASCII, one byte per character
    #[must_use]
    pub fn to_text(&self) -> String {
        self.rng()
            .sample_iter(&Alphanumeric)
            .take(self.len as usize)
            .map(char::from)
            .collect()
    }
}
