//! Precomputed configuration lookup tables.
//!
//! A table holds one bit per [`Configuration`], i.e. `2^26` bits (8 MiB).
//! On disk the bits are packed least-significant first: configuration `i`
//! lives in byte `i / 8`, bit `i % 8`.

use std::fs;
use std::path::Path;

use crate::configuration::{Configuration, CONFIGURATION_COUNT};
use crate::error::{Result, ThinningError};
use crate::oracle::{IsthmusOracle, SimplePointOracle};

/// Size in bytes of a serialized table.
pub const TABLE_BYTES: usize = CONFIGURATION_COUNT / 8;

const TABLE_WORDS: usize = CONFIGURATION_COUNT / 64;

/// A bit table indexed by configuration.
///
/// The same type serves as a simple point table or an isthmus table; which
/// one it is depends on how it was built.
#[derive(Clone, PartialEq, Eq)]
pub struct LookupTable {
    words: Vec<u64>,
}

impl std::fmt::Debug for LookupTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupTable")
            .field("entries", &CONFIGURATION_COUNT)
            .field("set", &self.count_set())
            .finish()
    }
}

impl LookupTable {
    /// Parses a packed table, rejecting any length other than [`TABLE_BYTES`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != TABLE_BYTES {
            return Err(ThinningError::MalformedTable(format!(
                "expected {TABLE_BYTES} bytes, got {}",
                bytes.len()
            )));
        }
        let words = bytes
            .chunks_exact(8)
            .map(|chunk| {
                let mut word = [0u8; 8];
                word.copy_from_slice(chunk);
                u64::from_le_bytes(word)
            })
            .collect();
        Ok(Self { words })
    }

    /// Reads a packed table from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let table = Self::from_bytes(&bytes)?;
        log::debug!(
            "loaded lookup table {} ({} configurations set)",
            path.display(),
            table.count_set()
        );
        Ok(table)
    }

    /// Writes the packed table to disk.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_bytes())?;
        Ok(())
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    /// Evaluates `predicate` on every configuration and stores the answers.
    ///
    /// This visits all `2^26` configurations; pair it with [`Self::save`] to
    /// build a table once and [`Self::load`] it afterwards.
    pub fn tabulate(mut predicate: impl FnMut(Configuration) -> Result<bool>) -> Result<Self> {
        let mut words = vec![0u64; TABLE_WORDS];
        for (w, word) in words.iter_mut().enumerate() {
            for bit in 0..64 {
                let index = w * 64 + bit;
                if predicate(Configuration::from_bits(index as u32))? {
                    *word |= 1 << bit;
                }
            }
        }
        Ok(Self { words })
    }

    /// Looks up a configuration.
    pub fn get(&self, configuration: Configuration) -> Result<bool> {
        let index = configuration.index();
        let word = self.words.get(index / 64).ok_or_else(|| {
            ThinningError::MalformedTable(format!(
                "configuration {:#x} outside table of {CONFIGURATION_COUNT} entries",
                configuration.bits()
            ))
        })?;
        Ok((word >> (index % 64)) & 1 == 1)
    }

    /// Number of configurations mapped to `true`.
    #[must_use]
    pub fn count_set(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

impl SimplePointOracle for LookupTable {
    fn is_simple(&self, configuration: Configuration) -> Result<bool> {
        self.get(configuration)
    }
}

impl IsthmusOracle for LookupTable {
    fn is_isthmus(&self, configuration: Configuration) -> Result<bool> {
        self.get(configuration)
    }
}
