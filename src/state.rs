//! World-state synthesis: one consistent snapshot per query.
//!
//! [`snapshot`] performs a single synchronous burst of reads against the
//! memory source and assembles the result into an immutable record. The
//! snapshot has no identity beyond the instant it was read; callers that
//! interleave emulation stepping with decoding must serialize the two
//! themselves (the drive loop keeps at most one decode-and-dispatch cycle
//! in flight).

use crate::collision::passable_tiles;
use crate::memory::{MemoryReader, MemorySource};
use crate::sprites::{parse_map_sprites, Facing};
use crate::tables::Tables;
use log::{debug, warn};
use serde::Serialize;

/// hWY holds this value when no text box is drawn (the window is parked
/// below the visible screen).
const TEXT_BOX_HIDDEN_WY: u8 = 0x90;

/// Bag item list region read per snapshot: 10 (id, count) pairs.
const BAG_BYTES: usize = 20;

const PARTY_MAX: u8 = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentMode {
    pub overworld: bool,
    pub battle: bool,
    #[serde(rename = "isTextBoxVisible")]
    pub is_text_box_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverworldState {
    pub position: Position,
    pub facing_direction: String,
    pub current_map: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayTime {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainerState {
    pub money: u32,
    pub play_time: PlayTime,
    pub badges: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BagItem {
    pub name: String,
    pub count: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartyMon {
    pub species: String,
    pub level: u8,
    pub hp: u16,
    pub max_hp: u16,
    pub status: u8,
}

/// One complete world-state record, serializable straight to JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameState {
    pub current_mode: CurrentMode,
    pub overworld_state: OverworldState,
    pub trainer_state: TrainerState,
    pub inventory: Vec<BagItem>,
    pub party: Vec<PartyMon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enemy_pokemon: Option<PartyMon>,
    pub passable_tiles: Vec<String>,
}

/// Build a snapshot of the current game state. All reads happen in one
/// synchronous burst with no intervening waits, so the result represents
/// a single instant as long as nothing advances the emulator mid-call.
pub fn snapshot<M: MemorySource>(
    reader: &MemoryReader<M>,
    tables: &Tables,
) -> Result<GameState, String> {
    let battle_counter = reader.read_byte("wIsInBattle")?;
    let window_y = reader.read_byte("hWY")?;
    let in_battle = battle_counter != 0;

    let current_mode = CurrentMode {
        overworld: !in_battle && window_y == TEXT_BOX_HIDDEN_WY,
        battle: in_battle,
        is_text_box_visible: window_y != TEXT_BOX_HIDDEN_WY,
    };

    let map_id = reader.read_byte("wCurMap")?;
    let overworld_state = OverworldState {
        position: Position {
            x: reader.read_byte("wXCoord")?,
            y: reader.read_byte("wYCoord")?,
        },
        facing_direction: Facing::from_code(reader.read_byte("wTrainerFacingDirection")?)
            .name()
            .to_string(),
        current_map: tables.maps.lookup(map_id),
    };

    let trainer_state = TrainerState {
        money: reader.read_bcd_money()?,
        play_time: PlayTime {
            hours: reader.read_byte("wPlayTimeHours")?,
            minutes: reader.read_byte("wPlayTimeMinutes")?,
            seconds: reader.read_byte("wPlayTimeSeconds")?,
        },
        badges: reader.read_byte("wObtainedBadges")?.count_ones(),
    };

    let passable = passable_tiles(reader)?
        .iter()
        .map(|tile| format!("{:#x}", tile))
        .collect();

    let enemy_pokemon = if in_battle {
        Some(read_enemy(reader, tables)?)
    } else {
        None
    };

    debug!(
        "Snapshot: map={} pos=({},{}) battle={}",
        overworld_state.current_map,
        overworld_state.position.x,
        overworld_state.position.y,
        in_battle
    );

    Ok(GameState {
        current_mode,
        overworld_state,
        trainer_state,
        inventory: read_inventory(reader, tables)?,
        party: read_party(reader, tables)?,
        enemy_pokemon,
        passable_tiles: passable,
    })
}

/// Decode the bag: (item id, count) pairs, terminated by 0xFF.
fn read_inventory<M: MemorySource>(
    reader: &MemoryReader<M>,
    tables: &Tables,
) -> Result<Vec<BagItem>, String> {
    let bytes = reader.read_bytes("wBagItems", BAG_BYTES)?;
    let mut items = Vec::new();
    for pair in bytes.chunks_exact(2) {
        let id = pair[0];
        if id == 0xFF || id == 0 {
            break;
        }
        items.push(BagItem {
            name: tables.items.lookup(id),
            count: pair[1],
        });
    }
    Ok(items)
}

/// Decode the party from the numbered `wPartyMon<n>…` symbols.
fn read_party<M: MemorySource>(
    reader: &MemoryReader<M>,
    tables: &Tables,
) -> Result<Vec<PartyMon>, String> {
    let mut count = reader.read_byte("wPartyCount")?;
    if count > PARTY_MAX {
        warn!("Party count {} exceeds maximum, clamping", count);
        count = PARTY_MAX;
    }

    let mut party = Vec::with_capacity(count as usize);
    for i in 1..=count {
        let species_id = reader.read_byte(format!("wPartyMon{}", i).as_str())?;
        party.push(PartyMon {
            species: tables.species.lookup(species_id),
            level: reader.read_byte(format!("wPartyMon{}Level", i).as_str())?,
            hp: reader.read_word(&format!("wPartyMon{}HP", i))?,
            max_hp: reader.read_word(&format!("wPartyMon{}MaxHP", i))?,
            status: reader.read_byte(format!("wPartyMon{}Status", i).as_str())?,
        });
    }
    Ok(party)
}

fn read_enemy<M: MemorySource>(
    reader: &MemoryReader<M>,
    tables: &Tables,
) -> Result<PartyMon, String> {
    let species_id = reader.read_byte("wEnemyMonSpecies")?;
    Ok(PartyMon {
        species: tables.species.lookup(species_id),
        level: reader.read_byte("wEnemyMonLevel")?,
        hp: reader.read_word("wEnemyMonHP")?,
        max_hp: reader.read_word("wEnemyMonMaxHP")?,
        status: reader.read_byte("wEnemyMonStatus")?,
    })
}

/// Tile coordinates of everything the player can interact with: map
/// sprites with a nonzero tile index, sign posts, and hidden objects.
pub fn interactive_objects<M: MemorySource>(
    reader: &MemoryReader<M>,
) -> Result<Vec<(i16, i16)>, String> {
    let raw = reader.read_bytes("wMapSpriteData", 40)?;
    let mut coords: Vec<(i16, i16)> = parse_map_sprites(&raw)
        .iter()
        .filter(|obj| obj.interactive)
        .map(|obj| (obj.tile_x, obj.tile_y))
        .collect();

    // Sign coordinates are stored as (y, x) pairs; empty slots read 0,0.
    let signs = reader.read_bytes("wSignCoords", 32)?;
    for pair in signs.chunks_exact(2) {
        let (y, x) = (pair[0], pair[1]);
        if y == 0 && x == 0 {
            continue;
        }
        coords.push((x as i16, y as i16));
    }

    let hidden_x = reader.read_bytes("wHiddenObjectX", 10)?;
    let hidden_y = reader.read_bytes("wHiddenObjectY", 10)?;
    for (x, y) in hidden_x.iter().zip(hidden_y.iter()) {
        if *x == 0 && *y == 0 {
            continue;
        }
        coords.push((*x as i16, *y as i16));
    }

    Ok(coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolTable;
    use std::io::Cursor;

    const SYMBOLS: &str = "\
00:d057 wIsInBattle
00:ff4a hWY
00:d35e wCurMap
00:d361 wYCoord
00:d362 wXCoord
00:c109 wTrainerFacingDirection
00:d347 wPlayerMoney
00:da40 wPlayTimeHours
00:da42 wPlayTimeMinutes
00:da44 wPlayTimeSeconds
00:d356 wObtainedBadges
00:d530 wTilesetCollisionPtr
00:d31d wBagItems
00:d163 wPartyCount
00:d164 wPartyMon1
00:d18c wPartyMon1Level
00:d16c wPartyMon1HP
00:d18d wPartyMon1MaxHP
00:d16f wPartyMon1Status
00:cfe5 wEnemyMonSpecies
00:cff3 wEnemyMonLevel
00:cfe6 wEnemyMonHP
00:cff4 wEnemyMonMaxHP
00:cfe9 wEnemyMonStatus
00:c200 wMapSpriteData
00:d4b1 wSignCoords
00:d4d4 wHiddenObjectX
00:d4e0 wHiddenObjectY
";

    fn base_memory() -> Vec<u8> {
        let mut mem = vec![0u8; 0x10000];
        mem[0xFF4A] = 0x90; // no text box
        mem[0xD35E] = 0x00; // PALLET_TOWN
        mem[0xD362] = 5;
        mem[0xD361] = 6;
        mem[0xC109] = 0x08; // Left
        mem[0xD347] = 0x23; // money 123
        mem[0xD348] = 0x01;
        mem[0xDA40] = 2;
        mem[0xDA42] = 30;
        mem[0xDA44] = 59;
        mem[0xD356] = 0b0000_0101; // two badges
        // Collision pointer → 0x0580, list {0x1a} 0xFF
        mem[0xD530] = 0x80;
        mem[0xD531] = 0x05;
        mem[0x0580] = 0x1A;
        mem[0x0581] = 0xFF;
        // One potion, then terminator.
        mem[0xD31D] = 0x14;
        mem[0xD31E] = 3;
        mem[0xD31F] = 0xFF;
        // Party of one Pikachu.
        mem[0xD163] = 1;
        mem[0xD164] = 0x54;
        mem[0xD18C] = 12;
        mem[0xD16C] = 28;
        mem[0xD16D] = 0;
        mem[0xD18D] = 33;
        mem[0xD18E] = 0;
        mem
    }

    fn symbols() -> SymbolTable {
        SymbolTable::from_reader(Cursor::new(SYMBOLS)).unwrap()
    }

    #[test]
    fn test_overworld_snapshot() {
        let mem = base_memory();
        let reader = MemoryReader::new(&mem, symbols());
        let state = snapshot(&reader, &Tables::default()).unwrap();

        assert!(state.current_mode.overworld);
        assert!(!state.current_mode.battle);
        assert!(!state.current_mode.is_text_box_visible);
        assert_eq!(state.overworld_state.position.x, 5);
        assert_eq!(state.overworld_state.position.y, 6);
        assert_eq!(state.overworld_state.facing_direction, "Left");
        assert_eq!(state.overworld_state.current_map, "PALLET_TOWN");
        assert_eq!(state.trainer_state.money, 123);
        assert_eq!(state.trainer_state.play_time.minutes, 30);
        assert_eq!(state.trainer_state.badges, 2);
        assert_eq!(state.passable_tiles, vec!["0x1a".to_string()]);
        assert_eq!(state.inventory.len(), 1);
        assert_eq!(state.inventory[0].name, "POTION");
        assert_eq!(state.inventory[0].count, 3);
        assert_eq!(state.party.len(), 1);
        assert_eq!(state.party[0].species, "PIKACHU");
        assert_eq!(state.party[0].hp, 28);
        assert!(state.enemy_pokemon.is_none());
    }

    #[test]
    fn test_text_box_flags() {
        let mut mem = base_memory();
        mem[0xFF4A] = 0x00; // window drawn over the screen
        let reader = MemoryReader::new(&mem, symbols());
        let state = snapshot(&reader, &Tables::default()).unwrap();
        assert!(state.current_mode.is_text_box_visible);
        assert!(!state.current_mode.overworld);
    }

    #[test]
    fn test_battle_includes_enemy() {
        let mut mem = base_memory();
        mem[0xD057] = 1;
        mem[0xCFE5] = 0xA5; // RATTATA
        mem[0xCFF3] = 3;
        mem[0xCFE6] = 11;
        mem[0xCFF4] = 12;
        let reader = MemoryReader::new(&mem, symbols());
        let state = snapshot(&reader, &Tables::default()).unwrap();
        assert!(state.current_mode.battle);
        assert!(!state.current_mode.overworld);
        let enemy = state.enemy_pokemon.unwrap();
        assert_eq!(enemy.species, "RATTATA");
        assert_eq!(enemy.level, 3);
        assert_eq!(enemy.hp, 11);
    }

    #[test]
    fn test_unknown_map_fallback() {
        let mut mem = base_memory();
        mem[0xD35E] = 0xF7;
        let reader = MemoryReader::new(&mem, symbols());
        let state = snapshot(&reader, &Tables::default()).unwrap();
        assert_eq!(state.overworld_state.current_map, "UNKNOWN_MAP_247");
    }

    #[test]
    fn test_snapshot_idempotent_on_unchanged_memory() {
        let mem = base_memory();
        let reader = MemoryReader::new(&mem, symbols());
        let tables = Tables::default();
        let first = snapshot(&reader, &tables).unwrap();
        let second = snapshot(&reader, &tables).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mem = base_memory();
        let reader = MemoryReader::new(&mem, symbols());
        let state = snapshot(&reader, &Tables::default()).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&state).unwrap()).unwrap();
        assert_eq!(json["current_mode"]["isTextBoxVisible"], false);
        assert_eq!(json["overworld_state"]["position"]["x"], 5);
        assert_eq!(json["trainer_state"]["play_time"]["hours"], 2);
        assert_eq!(json["passable_tiles"][0], "0x1a");
        // Out of battle the enemy field is omitted entirely.
        assert!(json.get("enemy_pokemon").is_none());
    }

    #[test]
    fn test_interactive_objects() {
        let mut mem = base_memory();
        // One map sprite (Y, tile, attr, X) at tile (2,2).
        mem[0xC200] = 32;
        mem[0xC201] = 0x08;
        mem[0xC202] = 0;
        mem[0xC203] = 24;
        // One sign at (y=4, x=7).
        mem[0xD4B1] = 4;
        mem[0xD4B2] = 7;
        // One hidden object at (3, 9).
        mem[0xD4D4] = 3;
        mem[0xD4E0] = 9;
        let reader = MemoryReader::new(&mem, symbols());
        let coords = interactive_objects(&reader).unwrap();
        assert_eq!(coords, vec![(2, 2), (7, 4), (3, 9)]);
    }
}
