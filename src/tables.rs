//! Static ID→name lookup tables: map IDs, bag item IDs, and species IDs.
//!
//! These are configuration data, not logic. The built-in defaults cover
//! the commonly encountered IDs; anything unmapped falls back to an
//! `UNKNOWN_<KIND>_<id>` string with the literal decimal id, so the
//! consumer still gets a stable, distinguishable name. Tables are
//! injected at construction and can be replaced wholesale from TOML.

use indexmap::IndexMap;

/// Parse a `"0x1a"` or `"1a"` style hex key from a TOML table.
pub(crate) fn parse_hex_key(key: &str) -> Result<u8, String> {
    let digits = key.strip_prefix("0x").unwrap_or(key);
    u8::from_str_radix(digits, 16).map_err(|_| format!("Bad hex key '{}' in table", key))
}

/// One immutable ID→name table with an `UNKNOWN_…` fallback.
pub struct NameTable {
    prefix: String,
    names: IndexMap<u8, String>,
}

impl NameTable {
    pub fn new(prefix: impl Into<String>, names: IndexMap<u8, String>) -> Self {
        NameTable {
            prefix: prefix.into(),
            names,
        }
    }

    fn from_static(prefix: &str, entries: &[(u8, &str)]) -> Self {
        NameTable {
            prefix: prefix.to_string(),
            names: entries
                .iter()
                .map(|(id, name)| (*id, name.to_string()))
                .collect(),
        }
    }

    /// The name for an id, or `PREFIX_<id>` when unmapped.
    pub fn lookup(&self, id: u8) -> String {
        match self.names.get(&id) {
            Some(name) => name.clone(),
            None => format!("{}_{}", self.prefix, id),
        }
    }
}

/// The full set of injected lookup tables the synthesizer needs.
pub struct Tables {
    pub maps: NameTable,
    pub items: NameTable,
    pub species: NameTable,
}

impl Default for Tables {
    fn default() -> Self {
        Tables {
            maps: NameTable::from_static("UNKNOWN_MAP", MAP_NAMES),
            items: NameTable::from_static("UNKNOWN_ITEM", ITEM_NAMES),
            species: NameTable::from_static("UNKNOWN_POKEMON", SPECIES_NAMES),
        }
    }
}

impl Tables {
    /// Load replacement tables from TOML. Sections left out keep the
    /// built-in defaults. Keys are hex tile ids as strings:
    ///
    /// ```toml
    /// [maps]
    /// "0x00" = "PALLET_TOWN"
    /// [species]
    /// "0x54" = "PIKACHU"
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Tables, String> {
        #[derive(serde::Deserialize)]
        struct TablesFile {
            #[serde(default)]
            maps: Option<IndexMap<String, String>>,
            #[serde(default)]
            items: Option<IndexMap<String, String>>,
            #[serde(default)]
            species: Option<IndexMap<String, String>>,
        }

        fn convert(
            raw: IndexMap<String, String>,
            prefix: &str,
        ) -> Result<NameTable, String> {
            let mut names = IndexMap::new();
            for (key, name) in raw {
                names.insert(parse_hex_key(&key)?, name);
            }
            Ok(NameTable::new(prefix, names))
        }

        let file: TablesFile =
            toml::from_str(text).map_err(|e| format!("Bad tables TOML: {}", e))?;
        let defaults = Tables::default();
        Ok(Tables {
            maps: match file.maps {
                Some(raw) => convert(raw, "UNKNOWN_MAP")?,
                None => defaults.maps,
            },
            items: match file.items {
                Some(raw) => convert(raw, "UNKNOWN_ITEM")?,
                None => defaults.items,
            },
            species: match file.species {
                Some(raw) => convert(raw, "UNKNOWN_POKEMON")?,
                None => defaults.species,
            },
        })
    }
}

const MAP_NAMES: &[(u8, &str)] = &[
    (0x00, "PALLET_TOWN"),
    (0x01, "VIRIDIAN_CITY"),
    (0x02, "PEWTER_CITY"),
    (0x03, "CERULEAN_CITY"),
    (0x04, "LAVENDER_TOWN"),
    (0x05, "VERMILION_CITY"),
    (0x06, "CELADON_CITY"),
    (0x07, "FUCHSIA_CITY"),
    (0x08, "CINNABAR_ISLAND"),
    (0x09, "INDIGO_PLATEAU"),
    (0x0A, "SAFFRON_CITY"),
    (0x0C, "ROUTE_1"),
    (0x0D, "ROUTE_2"),
    (0x0E, "ROUTE_3"),
    (0x0F, "ROUTE_4"),
    (0x10, "ROUTE_5"),
    (0x11, "ROUTE_6"),
    (0x12, "ROUTE_7"),
    (0x13, "ROUTE_8"),
    (0x14, "ROUTE_9"),
    (0x15, "ROUTE_10"),
    (0x16, "ROUTE_11"),
    (0x17, "ROUTE_12"),
    (0x18, "ROUTE_13"),
    (0x19, "ROUTE_14"),
    (0x1A, "ROUTE_15"),
    (0x1B, "ROUTE_16"),
    (0x1C, "ROUTE_17"),
    (0x1D, "ROUTE_18"),
    (0x1E, "ROUTE_19"),
    (0x1F, "ROUTE_20"),
    (0x20, "ROUTE_21"),
    (0x21, "ROUTE_22"),
    (0x22, "ROUTE_23"),
    (0x23, "ROUTE_24"),
    (0x24, "ROUTE_25"),
    (0x25, "REDS_HOUSE_1F"),
    (0x26, "REDS_HOUSE_2F"),
    (0x27, "BLUES_HOUSE"),
    (0x28, "OAKS_LAB"),
    (0x29, "VIRIDIAN_POKECENTER"),
    (0x2A, "VIRIDIAN_MART"),
    (0x2B, "VIRIDIAN_SCHOOL_HOUSE"),
    (0x2C, "VIRIDIAN_NICKNAME_HOUSE"),
    (0x2D, "VIRIDIAN_GYM"),
    (0x2E, "DIGLETTS_CAVE_ROUTE_2"),
    (0x2F, "VIRIDIAN_FOREST_NORTH_GATE"),
    (0x30, "ROUTE_2_TRADE_HOUSE"),
    (0x31, "ROUTE_2_GATE"),
    (0x32, "VIRIDIAN_FOREST_SOUTH_GATE"),
    (0x33, "VIRIDIAN_FOREST"),
    (0x34, "MUSEUM_1F"),
    (0x35, "MUSEUM_2F"),
    (0x36, "PEWTER_GYM"),
    (0x3A, "PEWTER_POKECENTER"),
    (0x3B, "MT_MOON_1F"),
    (0x3C, "MT_MOON_B1F"),
    (0x3D, "MT_MOON_B2F"),
];

const ITEM_NAMES: &[(u8, &str)] = &[
    (0x01, "MASTER_BALL"),
    (0x02, "ULTRA_BALL"),
    (0x03, "GREAT_BALL"),
    (0x04, "POKE_BALL"),
    (0x05, "TOWN_MAP"),
    (0x06, "BICYCLE"),
    (0x08, "SAFARI_BALL"),
    (0x09, "POKEDEX"),
    (0x0A, "MOON_STONE"),
    (0x0B, "ANTIDOTE"),
    (0x0C, "BURN_HEAL"),
    (0x0D, "ICE_HEAL"),
    (0x0E, "AWAKENING"),
    (0x0F, "PARLYZ_HEAL"),
    (0x10, "FULL_RESTORE"),
    (0x11, "MAX_POTION"),
    (0x12, "HYPER_POTION"),
    (0x13, "SUPER_POTION"),
    (0x14, "POTION"),
    (0x1D, "ESCAPE_ROPE"),
    (0x1E, "REPEL"),
    (0x20, "FIRE_STONE"),
    (0x21, "THUNDER_STONE"),
    (0x22, "WATER_STONE"),
    (0x23, "HP_UP"),
    (0x24, "PROTEIN"),
    (0x25, "IRON"),
    (0x26, "CARBOS"),
    (0x27, "CALCIUM"),
    (0x28, "RARE_CANDY"),
    (0x29, "DOME_FOSSIL"),
    (0x2A, "HELIX_FOSSIL"),
    (0x2B, "SECRET_KEY"),
    (0x2D, "BIKE_VOUCHER"),
    (0x2F, "LEAF_STONE"),
    (0x30, "CARD_KEY"),
    (0x31, "NUGGET"),
    (0x33, "POKE_DOLL"),
    (0x34, "FULL_HEAL"),
    (0x35, "REVIVE"),
    (0x36, "MAX_REVIVE"),
];

// Internal species ids, not Pokédex order.
const SPECIES_NAMES: &[(u8, &str)] = &[
    (0x01, "RHYDON"),
    (0x02, "KANGASKHAN"),
    (0x03, "NIDORAN_M"),
    (0x04, "CLEFAIRY"),
    (0x05, "SPEAROW"),
    (0x06, "VOLTORB"),
    (0x07, "NIDOKING"),
    (0x08, "SLOWBRO"),
    (0x09, "IVYSAUR"),
    (0x0A, "EXEGGUTOR"),
    (0x0B, "LICKITUNG"),
    (0x0C, "EXEGGCUTE"),
    (0x0D, "GRIMER"),
    (0x0E, "GENGAR"),
    (0x0F, "NIDORAN_F"),
    (0x10, "NIDOQUEEN"),
    (0x11, "CUBONE"),
    (0x12, "RHYHORN"),
    (0x13, "LAPRAS"),
    (0x14, "ARCANINE"),
    (0x15, "MEW"),
    (0x16, "GYARADOS"),
    (0x17, "SHELLDER"),
    (0x18, "TENTACOOL"),
    (0x19, "GASTLY"),
    (0x1A, "SCYTHER"),
    (0x1B, "STARYU"),
    (0x1C, "BLASTOISE"),
    (0x1D, "PINSIR"),
    (0x1E, "TANGELA"),
    (0x24, "PIDGEY"),
    (0x25, "PIDGEOTTO"),
    (0x26, "PIDGEOT"),
    (0x54, "PIKACHU"),
    (0x55, "RAICHU"),
    (0x66, "EEVEE"),
    (0x70, "WEEDLE"),
    (0x71, "KAKUNA"),
    (0x72, "BEEDRILL"),
    (0x7B, "CATERPIE"),
    (0x7C, "METAPOD"),
    (0x7D, "BUTTERFREE"),
    (0x83, "MEWTWO"),
    (0x84, "SNORLAX"),
    (0x99, "BULBASAUR"),
    (0x9A, "VENUSAUR"),
    (0xA5, "RATTATA"),
    (0xA6, "RATICATE"),
    (0xB0, "CHARMANDER"),
    (0xB1, "SQUIRTLE"),
    (0xB2, "CHARMELEON"),
    (0xB3, "WARTORTLE"),
    (0xB4, "CHARIZARD"),
];
