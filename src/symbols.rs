//! Debug symbol table loader.
//!
//! A `.sym` file produced by the pokered build maps every named memory
//! region to a `bank:address` pair, one per line:
//!
//! ```text
//! 00:c001 wSoundID
//! 01:a462 sBox8
//! ```
//!
//! The file also carries comment and metadata lines this system does not
//! care about; anything that does not split into exactly two whitespace
//! tokens is skipped without complaint.

use indexmap::IndexMap;
use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Name → (bank, address) mapping, immutable once loaded.
pub struct SymbolTable {
    symbols: IndexMap<String, (u8, u16)>,
}

impl SymbolTable {
    /// Load a symbol table from a `.sym` file on disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SymbolTable, String> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| format!("Cannot open symbol file '{}': {}", path.display(), e))?;
        let table = Self::from_reader(BufReader::new(file))?;
        debug!(
            "Loaded {} symbols from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse symbol definitions from any line-oriented reader.
    ///
    /// Lines with an unexpected token count are silently skipped. Lines
    /// with two tokens but a malformed `bank:address` field are skipped
    /// with a warning rather than aborting the load; a single stray line
    /// in an externally generated file must not take the process down.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<SymbolTable, String> {
        let mut symbols = IndexMap::new();

        for (lineno, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Error reading symbol file: {}", e))?;
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() != 2 {
                continue;
            }

            let (location, name) = (parts[0], parts[1]);
            let Some((bank_str, addr_str)) = location.split_once(':') else {
                warn!(
                    "Skipping malformed symbol line {}: no bank:address in '{}'",
                    lineno + 1,
                    location
                );
                continue;
            };

            let bank = match u8::from_str_radix(bank_str, 16) {
                Ok(b) => b,
                Err(_) => {
                    warn!(
                        "Skipping symbol '{}' on line {}: bad bank '{}'",
                        name,
                        lineno + 1,
                        bank_str
                    );
                    continue;
                }
            };
            let addr = match u16::from_str_radix(addr_str, 16) {
                Ok(a) => a,
                Err(_) => {
                    warn!(
                        "Skipping symbol '{}' on line {}: bad address '{}'",
                        name,
                        lineno + 1,
                        addr_str
                    );
                    continue;
                }
            };

            symbols.insert(name.to_string(), (bank, addr));
        }

        Ok(SymbolTable { symbols })
    }

    /// Look up a symbol, returning its (bank, address) pair.
    pub fn get(&self, name: &str) -> Option<(u8, u16)> {
        self.symbols.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
