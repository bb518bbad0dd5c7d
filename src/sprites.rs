//! Sprite decoding from 4-byte object records.
//!
//! Two byte orderings exist for the same conceptual record and they are
//! decoded by two distinct functions, never inferred from the data:
//!
//! * raw hardware OAM: `(Y, X, tile, attr)` — [`parse_oam`];
//! * the pre-parsed map sprite buffer: `(Y, tile, attr, X)` —
//!   [`parse_map_sprites`].
//!
//! Raw coordinates carry the hardware display offset (X −8, Y −16); a
//! raw X or Y of zero marks an unused slot.

/// Sprite record size in bytes.
pub const OAM_ENTRY_SIZE: usize = 4;
/// The hardware OAM holds 40 entries of 4 bytes.
pub const OAM_SIZE: usize = 40 * OAM_ENTRY_SIZE;

/// Which way a sprite is facing, from bits 2-3 of its tile index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Down,
    Up,
    Left,
    Right,
    Unknown,
}

impl Facing {
    /// Map a facing code (0x00/0x04/0x08/0x0C) to a direction. Any other
    /// value is Unknown.
    pub fn from_code(code: u8) -> Facing {
        match code {
            0x00 => Facing::Down,
            0x04 => Facing::Up,
            0x08 => Facing::Left,
            0x0C => Facing::Right,
            _ => Facing::Unknown,
        }
    }

    /// Derive facing from a sprite tile index by masking with 0x0C.
    pub fn from_tile(tile: u8) -> Facing {
        Facing::from_code(tile & 0x0C)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Facing::Down => "Down",
            Facing::Up => "Up",
            Facing::Left => "Left",
            Facing::Right => "Right",
            Facing::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteIcon {
    Player,
    Npc,
}

/// A live sprite with corrected tile-grid coordinates. Ephemeral: derived
/// per frame from OAM and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub tile_x: i16,
    pub tile_y: i16,
    pub facing: Facing,
    pub icon: SpriteIcon,
}

/// A map object from the pre-parsed sprite buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapObject {
    pub tile_x: i16,
    pub tile_y: i16,
    pub tile: u8,
    pub attr: u8,
    pub interactive: bool,
}

/// Pixel position to tile position: subtract the hardware display offset
/// and floor-divide by the 8-pixel tile size.
fn to_tile_coords(x_raw: u8, y_raw: u8) -> (i16, i16) {
    let x_pixel = x_raw as i16 - 8;
    let y_pixel = y_raw as i16 - 16;
    (x_pixel.div_euclid(8), y_pixel.div_euclid(8))
}

/// Decode raw hardware OAM bytes, layout `(Y, X, tile, attr)` per entry.
///
/// Unused slots (raw X or Y of zero) are skipped, as are sprites whose
/// tile position lands outside the `screen_w` × `screen_h` tile bounds.
/// The first `player_slot_count` entries in scan order belong to the
/// player — a fact of this game's sprite allocation, which is why it is a
/// parameter and not a constant. Trailing bytes short of a full record
/// are ignored.
pub fn parse_oam(
    bytes: &[u8],
    screen_w: i16,
    screen_h: i16,
    player_slot_count: usize,
) -> Vec<Sprite> {
    let mut sprites = Vec::new();
    for (slot, entry) in bytes.chunks_exact(OAM_ENTRY_SIZE).enumerate() {
        let (y_raw, x_raw, tile) = (entry[0], entry[1], entry[2]);
        if y_raw == 0 || x_raw == 0 {
            continue;
        }
        let (tile_x, tile_y) = to_tile_coords(x_raw, y_raw);
        if tile_x < 0 || tile_x >= screen_w || tile_y < 0 || tile_y >= screen_h {
            continue;
        }
        sprites.push(Sprite {
            tile_x,
            tile_y,
            facing: Facing::from_tile(tile),
            icon: if slot < player_slot_count {
                SpriteIcon::Player
            } else {
                SpriteIcon::Npc
            },
        });
    }
    sprites
}

/// Decode the map sprite buffer, layout `(Y, tile, attr, X)` per entry.
///
/// Same unused-slot and coordinate rules as OAM, but no screen clipping:
/// map objects may sit anywhere. An object with a nonzero tile index is
/// considered interactive.
pub fn parse_map_sprites(bytes: &[u8]) -> Vec<MapObject> {
    let mut objects = Vec::new();
    for entry in bytes.chunks_exact(OAM_ENTRY_SIZE) {
        let (y_raw, tile, attr, x_raw) = (entry[0], entry[1], entry[2], entry[3]);
        if y_raw == 0 || x_raw == 0 {
            continue;
        }
        let (tile_x, tile_y) = to_tile_coords(x_raw, y_raw);
        objects.push(MapObject {
            tile_x,
            tile_y,
            tile,
            attr,
            interactive: tile != 0,
        });
    }
    objects
}
