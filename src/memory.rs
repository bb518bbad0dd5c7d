//! Typed reads over the emulator's byte-addressable memory, resolved
//! through the symbol table.
//!
//! The emulator owns the memory; this module only ever borrows it through
//! the [`MemorySource`] trait and never caches a byte, so every read
//! reflects live state at call time.

use crate::symbols::SymbolTable;
use log::trace;

/// A byte-addressable view of the running program's memory.
///
/// Bank 0 covers the always-mapped region; banked reads must present both
/// bank and address. Sources without banking (flat dumps, test fixtures)
/// can rely on the default `read_banked`, which ignores the bank.
pub trait MemorySource {
    fn read(&self, addr: u16) -> u8;

    fn read_banked(&self, _bank: u8, addr: u16) -> u8 {
        self.read(addr)
    }
}

/// A flat memory image, e.g. a 64 KiB dump taken from the emulator.
/// Reads past the end of the image return 0.
impl MemorySource for Vec<u8> {
    fn read(&self, addr: u16) -> u8 {
        self.get(addr as usize).copied().unwrap_or(0)
    }
}

/// Either a symbolic name or a raw address. Raw addresses resolve with
/// bank 0. Call sites pass either form directly:
///
/// ```ignore
/// reader.read_byte("wXCoord")?;
/// reader.read_byte(0xD362)?;
/// ```
#[derive(Debug, Clone, Copy)]
pub enum MemRef<'a> {
    Name(&'a str),
    Addr(u16),
}

impl<'a> From<&'a str> for MemRef<'a> {
    fn from(name: &'a str) -> Self {
        MemRef::Name(name)
    }
}

impl<'a> From<u16> for MemRef<'a> {
    fn from(addr: u16) -> Self {
        MemRef::Addr(addr)
    }
}

/// Symbol-aware reader over a borrowed memory source.
pub struct MemoryReader<'a, M: MemorySource> {
    mem: &'a M,
    symbols: SymbolTable,
}

impl<'a, M: MemorySource> MemoryReader<'a, M> {
    pub fn new(mem: &'a M, symbols: SymbolTable) -> Self {
        MemoryReader { mem, symbols }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    fn resolve(&self, loc: MemRef) -> Result<(u8, u16), String> {
        match loc {
            MemRef::Name(name) => self
                .symbols
                .get(name)
                .ok_or_else(|| format!("Unknown symbol: {}", name)),
            MemRef::Addr(addr) => Ok((0, addr)),
        }
    }

    /// Read one byte at a symbol or raw address.
    pub fn read_byte<'r>(&self, loc: impl Into<MemRef<'r>>) -> Result<u8, String> {
        let (bank, addr) = self.resolve(loc.into())?;
        let value = if bank == 0 {
            self.mem.read(addr)
        } else {
            self.mem.read_banked(bank, addr)
        };
        trace!("read_byte {:02x}:{:04x} = {:#04x}", bank, addr, value);
        Ok(value)
    }

    /// Read a little-endian word (low byte first) at a symbol's address.
    pub fn read_word(&self, symbol: &str) -> Result<u16, String> {
        let (_, addr) = self.resolve(MemRef::Name(symbol))?;
        let low = self.mem.read(addr);
        let high = self.mem.read(addr.wrapping_add(1));
        Ok(((high as u16) << 8) | low as u16)
    }

    /// Read `length` consecutive bytes starting at a symbol or raw
    /// address. Bank selection only applies when the resolved bank is
    /// nonzero.
    pub fn read_bytes<'r>(
        &self,
        loc: impl Into<MemRef<'r>>,
        length: usize,
    ) -> Result<Vec<u8>, String> {
        let (bank, addr) = self.resolve(loc.into())?;
        let mut bytes = Vec::with_capacity(length);
        for i in 0..length {
            let a = addr.wrapping_add(i as u16);
            bytes.push(if bank == 0 {
                self.mem.read(a)
            } else {
                self.mem.read_banked(bank, a)
            });
        }
        Ok(bytes)
    }

    /// Decode the player's money: three packed-BCD bytes, least
    /// significant first. Each byte's low nibble is the units digit and
    /// high nibble the tens digit at increasing powers of 100, so three
    /// bytes cover six decimal digits.
    pub fn read_bcd_money(&self) -> Result<u32, String> {
        let bytes = self.read_bytes("wPlayerMoney", 3)?;
        let mut total: u32 = 0;
        let mut scale: u32 = 1;
        for b in bytes {
            total += (b & 0x0F) as u32 * scale + (b >> 4) as u32 * scale * 10;
            scale *= 100;
        }
        Ok(total)
    }
}
