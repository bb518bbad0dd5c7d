//! Overworld rendering: the visible background tile grid plus the sprite
//! overlay, merged into 2×2 blocks and emitted as a markdown table.
//!
//! Text and sprites both occupy 2×2 tile footprints on screen, so the
//! 20×18 tile viewport collapses to a 10×9 block table. A block holding
//! a sprite shows the sprite icon; a block holding an undecodable tile
//! shows that tile's `0x..` placeholder alone rather than a mixed string.

use crate::charmap::Charmap;
use crate::memory::{MemoryReader, MemorySource};
use crate::sprites::{parse_oam, Sprite, SpriteIcon, OAM_SIZE};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Visible screen size in tiles.
pub const SCREEN_TILE_WIDTH: usize = 20;
pub const SCREEN_TILE_HEIGHT: usize = 18;

/// The game allocates the first four OAM slots to the player's 2×2
/// sprite. A fact about this game's allocation order, not the hardware.
pub const PLAYER_OAM_SLOTS: usize = 4;

/// Window tile map in VRAM, where text boxes are composed.
const WINDOW_TILES_ADDR: u16 = 0x9C00;
/// VRAM tile maps are 32 tiles wide regardless of the visible width.
const VRAM_ROW_STRIDE: u16 = 32;

fn icon_str(icon: SpriteIcon) -> &'static str {
    match icon {
        SpriteIcon::Player => "◉",
        SpriteIcon::Npc => "⚪︎",
    }
}

/// Merge four decoded glyphs (top-left, top-right, bottom-left,
/// bottom-right) into one cell. If any of them is an unknown-tile hex
/// placeholder, the first one found wins the whole cell; mixing a
/// placeholder into a concatenation would produce an ambiguous string.
fn merge_block(tl: String, tr: String, bl: String, br: String) -> String {
    for glyph in [&tl, &tr, &bl, &br] {
        if glyph.starts_with("0x") {
            return glyph.clone();
        }
    }
    let mut cell = tl;
    cell.push_str(&tr);
    cell.push_str(&bl);
    cell.push_str(&br);
    cell
}

/// Render the visible overworld as a markdown table of 2×2 blocks.
///
/// Background tiles come from `wTileMap` as a flat run indexed
/// `row * width + col`; out-of-range lookups clamp to tile code 0.
/// Sprites come from the OAM buffer; where two sprites land in the same
/// block the player always wins.
pub fn render_overworld<M: MemorySource>(
    reader: &MemoryReader<M>,
    charmap: &Charmap,
    width: usize,
    height: usize,
) -> Result<String, String> {
    let bgmap = reader.read_bytes("wTileMap", width * height)?;
    let tile_char = |x: usize, y: usize| -> String {
        let tile = bgmap.get(y * width + x).copied().unwrap_or(0);
        charmap.decode(tile)
    };

    let oam_bytes = reader.read_bytes("wOAMBuffer", OAM_SIZE)?;
    let sprites = parse_oam(&oam_bytes, width as i16, height as i16, PLAYER_OAM_SLOTS);

    // Sprites occupy the block containing their top-left tile; the +1 on
    // Y compensates for sprites being drawn one row above their logical
    // tile.
    let mut blocks: HashMap<(i16, i16), &Sprite> = HashMap::new();
    for sprite in &sprites {
        let key = (
            sprite.tile_x.div_euclid(2),
            (sprite.tile_y + 1).div_euclid(2),
        );
        match blocks.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(sprite);
            }
            Entry::Occupied(mut slot) => {
                if sprite.icon == SpriteIcon::Player {
                    slot.insert(sprite);
                }
            }
        }
    }

    let block_w = (width + 1) / 2;
    let block_h = (height + 1) / 2;

    let header: Vec<String> = (0..block_w).map(|i| i.to_string()).collect();
    let mut rows = vec![
        format!("| {} |", header.join(" | ")),
        format!("| {} |", vec!["---"; block_w].join(" | ")),
    ];

    for block_row in 0..block_h {
        let mut cells = Vec::with_capacity(block_w);
        for block_col in 0..block_w {
            let cell = match blocks.get(&(block_col as i16, block_row as i16)) {
                Some(sprite) => icon_str(sprite.icon).to_string(),
                None => {
                    let x = block_col * 2;
                    let y = block_row * 2;
                    let tl = tile_char(x, y);
                    let tr = if x + 1 < width {
                        tile_char(x + 1, y)
                    } else {
                        String::new()
                    };
                    let bl = if y + 1 < height {
                        tile_char(x, y + 1)
                    } else {
                        String::new()
                    };
                    let br = if x + 1 < width && y + 1 < height {
                        tile_char(x + 1, y + 1)
                    } else {
                        String::new()
                    };
                    merge_block(tl, tr, bl, br)
                }
            };
            cells.push(cell);
        }
        rows.push(format!("| {} |", cells.join(" | ")));
    }

    Ok(rows.join("\n"))
}

/// Read the text currently composed in the VRAM window tile map, decoded
/// through the charmap. Tiles without a glyph contribute nothing here;
/// this is plain text extraction, not the placeholder-bearing map view.
pub fn read_window_text<M: MemorySource>(
    reader: &MemoryReader<M>,
    charmap: &Charmap,
    width: usize,
    height: usize,
) -> Result<String, String> {
    let mut lines = Vec::with_capacity(height);
    for row in 0..height {
        let base = WINDOW_TILES_ADDR.wrapping_add(row as u16 * VRAM_ROW_STRIDE);
        let tiles = reader.read_bytes(base, width)?;
        let line: String = tiles
            .iter()
            .filter_map(|tile| charmap.glyph(*tile))
            .collect();
        lines.push(line.trim().to_string());
    }
    Ok(lines.join("\n").trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolTable;
    use std::io::Cursor;

    const TILE_MAP_ADDR: usize = 0xC3A0;
    const OAM_ADDR: usize = 0xC300;

    const SYMBOLS: &str = "\
00:c3a0 wTileMap
00:c300 wOAMBuffer
";

    fn symbols() -> SymbolTable {
        SymbolTable::from_reader(Cursor::new(SYMBOLS)).unwrap()
    }

    /// 4×4 tile screen of blank tiles (0x7F → space) for small tests.
    fn blank_memory() -> Vec<u8> {
        let mut mem = vec![0u8; 0x10000];
        for i in 0..16 {
            mem[TILE_MAP_ADDR + i] = 0x7F;
        }
        mem
    }

    fn set_oam(mem: &mut [u8], slot: usize, y: u8, x: u8, tile: u8) {
        let base = OAM_ADDR + slot * 4;
        mem[base] = y;
        mem[base + 1] = x;
        mem[base + 2] = tile;
    }

    #[test]
    fn test_table_shape() {
        let mem = blank_memory();
        let reader = MemoryReader::new(&mem, symbols());
        let table = render_overworld(&reader, &Charmap::default(), 4, 4).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4); // header + separator + 2 block rows
        assert_eq!(lines[0], "| 0 | 1 |");
        assert_eq!(lines[1], "| --- | --- |");
        assert!(lines[2].starts_with("| "));
        // Every row has the same cell count.
        let pipes = lines[0].matches('|').count();
        assert!(lines.iter().all(|l| l.matches('|').count() == pipes));
    }

    #[test]
    fn test_text_tiles_concatenate_in_row_major_order() {
        let mut mem = blank_memory();
        // Block (0,0) = tiles (0,0),(1,0),(0,1),(1,1) → "ABcd"
        mem[TILE_MAP_ADDR] = 0x80; // A
        mem[TILE_MAP_ADDR + 1] = 0x81; // B
        mem[TILE_MAP_ADDR + 4] = 0xA2; // c
        mem[TILE_MAP_ADDR + 5] = 0xA3; // d
        let reader = MemoryReader::new(&mem, symbols());
        let table = render_overworld(&reader, &Charmap::default(), 4, 4).unwrap();
        let row: Vec<&str> = table.lines().nth(2).unwrap().split(" | ").collect();
        assert_eq!(row[0], "| ABcd");
    }

    #[test]
    fn test_unknown_tile_placeholder_takes_whole_block() {
        let mut mem = blank_memory();
        mem[TILE_MAP_ADDR] = 0x80; // A
        mem[TILE_MAP_ADDR + 5] = 0x14; // unmapped → 0x14
        let reader = MemoryReader::new(&mem, symbols());
        let table = render_overworld(&reader, &Charmap::default(), 4, 4).unwrap();
        let row: Vec<&str> = table.lines().nth(2).unwrap().split(" | ").collect();
        assert_eq!(row[0], "| 0x14");
    }

    #[test]
    fn test_placeholder_first_found_in_scan_order() {
        let mut mem = blank_memory();
        mem[TILE_MAP_ADDR + 1] = 0x14; // TR unmapped
        mem[TILE_MAP_ADDR + 4] = 0x15; // BL unmapped
        let reader = MemoryReader::new(&mem, symbols());
        let table = render_overworld(&reader, &Charmap::default(), 4, 4).unwrap();
        let row: Vec<&str> = table.lines().nth(2).unwrap().split(" | ").collect();
        assert_eq!(row[0], "| 0x14");
    }

    #[test]
    fn test_sprite_icon_replaces_block() {
        let mut mem = blank_memory();
        set_oam(&mut mem, 0, 16, 8, 0x00); // player at tile (0,0)
        let reader = MemoryReader::new(&mem, symbols());
        let table = render_overworld(&reader, &Charmap::default(), 4, 4).unwrap();
        assert!(table.lines().nth(2).unwrap().contains('◉'));
    }

    #[test]
    fn test_player_beats_npc_in_same_block() {
        let mut mem = blank_memory();
        // Player (slot 0) and NPC (slot 4) land in the same 2×2 block.
        set_oam(&mut mem, 4, 16, 8, 0x00);
        set_oam(&mut mem, 0, 16, 9, 0x00);
        let reader = MemoryReader::new(&mem, symbols());
        let table = render_overworld(&reader, &Charmap::default(), 4, 4).unwrap();
        assert!(table.contains('◉'));
        assert!(!table.contains("⚪︎"));
    }

    #[test]
    fn test_npc_icon_used_for_later_slots() {
        let mut mem = blank_memory();
        set_oam(&mut mem, 5, 16, 8, 0x00);
        let reader = MemoryReader::new(&mem, symbols());
        let table = render_overworld(&reader, &Charmap::default(), 4, 4).unwrap();
        assert!(table.contains("⚪︎"));
    }

    #[test]
    fn test_window_text_read() {
        let mut mem = vec![0u8; 0x10000];
        let symbols = SymbolTable::from_reader(Cursor::new(SYMBOLS)).unwrap();
        // "HI" on the first window row, junk tile in between rows.
        mem[0x9C00] = 0x87; // H
        mem[0x9C01] = 0x88; // I
        mem[0x9C20] = 0x01; // no glyph, contributes nothing
        let reader = MemoryReader::new(&mem, symbols);
        let text = read_window_text(&reader, &Charmap::default(), 18, 2).unwrap();
        assert_eq!(text, "HI");
    }
}
