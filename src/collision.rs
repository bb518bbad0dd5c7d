//! Passability extraction from the current tileset's collision list.
//!
//! `wTilesetCollisionPtr` points at a list of tile codes the player can
//! walk on, terminated by 0xFF. The list depends on the loaded tileset,
//! so it is re-read on every query rather than cached.

use crate::memory::{MemoryReader, MemorySource};
use log::debug;

/// Upper bound on the scan; the real lists are all far shorter, but the
/// data is only trusted as far as its terminator.
const SCAN_CAP: usize = 256;

/// Walk the collision list and return the currently passable tile codes.
/// The 0xFF sentinel is excluded. Errors if no sentinel appears within
/// the scan cap.
pub fn passable_tiles<M: MemorySource>(reader: &MemoryReader<M>) -> Result<Vec<u8>, String> {
    let ptr = reader.read_word("wTilesetCollisionPtr")?;
    let mut tiles = Vec::new();
    for offset in 0..SCAN_CAP {
        let tile = reader.read_byte(ptr.wrapping_add(offset as u16))?;
        if tile == 0xFF {
            debug!("{} passable tiles at {:#06x}", tiles.len(), ptr);
            return Ok(tiles);
        }
        tiles.push(tile);
    }
    Err(format!(
        "Collision list at {:#06x} has no 0xFF terminator within {} bytes",
        ptr, SCAN_CAP
    ))
}
