//! Tile-code to display-glyph decoding.
//!
//! The game draws text by writing one-byte tile codes into the background
//! and window tile maps. This table maps each code to the character(s) it
//! renders: letters, digits, punctuation, composite contraction glyphs
//! like `'s`, and control markers such as the text-advance arrow. Box
//! border tiles decode to the empty string on purpose; an *unmapped* code
//! instead decodes to a `0x..` hex placeholder so downstream consumers can
//! tell "unknown tile" apart from "decoded but blank".

use indexmap::IndexMap;
use std::collections::HashMap;

lazy_static! {
    static ref DEFAULT_GLYPHS: HashMap<u8, String> = {
        let mut m = HashMap::new();
        for (i, c) in ('A'..='Z').enumerate() {
            m.insert(0x80 + i as u8, c.to_string());
        }
        for (i, c) in ('a'..='z').enumerate() {
            m.insert(0xA0 + i as u8, c.to_string());
        }
        for (i, c) in ('0'..='9').enumerate() {
            m.insert(0xF6 + i as u8, c.to_string());
        }
        // Text box borders render as nothing; 0x7F is the blank tile.
        for code in 0x79..=0x7E {
            m.insert(code, String::new());
        }
        let fixed: &[(u8, &str)] = &[
            (0x76, "_"),
            (0x77, "-"),
            (0x7F, " "),
            (0x9A, "("),
            (0x9B, ")"),
            (0x9C, ":"),
            (0x9D, ";"),
            (0x9E, "["),
            (0x9F, "]"),
            (0xBA, "é"),
            (0xBB, "'d"),
            (0xBC, "'l"),
            (0xBD, "'s"),
            (0xBE, "'t"),
            (0xBF, "'v"),
            (0xE0, "'"),
            (0xE1, "<PK>"),
            (0xE2, "<MN>"),
            (0xE3, "-"),
            (0xE4, "'r"),
            (0xE5, "'m"),
            (0xE6, "?"),
            (0xE7, "!"),
            (0xE8, "."),
            (0xE9, "ァ"),
            (0xEA, "ゥ"),
            (0xEB, "ェ"),
            (0xEC, "▷"),
            (0xED, "▶"),
            (0xEE, "▼"),
            (0xEF, "♂"),
            (0xF0, "ED"),
            (0xF1, "×"),
            (0xF2, "<DOT>"),
            (0xF3, "/"),
            (0xF4, ","),
            (0xF5, "♀"),
        ];
        for (code, glyph) in fixed {
            m.insert(*code, glyph.to_string());
        }
        m
    };
}

/// Immutable tile→glyph lookup, injected at construction so tests can
/// substitute a minimal table.
pub struct Charmap {
    glyphs: HashMap<u8, String>,
}

impl Default for Charmap {
    fn default() -> Self {
        Charmap {
            glyphs: DEFAULT_GLYPHS.clone(),
        }
    }
}

impl Charmap {
    pub fn new(glyphs: HashMap<u8, String>) -> Self {
        Charmap { glyphs }
    }

    /// Load a replacement table from TOML of the form:
    ///
    /// ```toml
    /// [glyphs]
    /// "0x80" = "A"
    /// "0x7f" = " "
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Charmap, String> {
        #[derive(serde::Deserialize)]
        struct CharmapFile {
            glyphs: IndexMap<String, String>,
        }

        let file: CharmapFile =
            toml::from_str(text).map_err(|e| format!("Bad charmap TOML: {}", e))?;
        let mut glyphs = HashMap::new();
        for (key, glyph) in file.glyphs {
            glyphs.insert(crate::tables::parse_hex_key(&key)?, glyph);
        }
        Ok(Charmap { glyphs })
    }

    /// The glyph for a tile code, or `None` for codes outside the table.
    pub fn glyph(&self, tile: u8) -> Option<&str> {
        self.glyphs.get(&tile).map(String::as_str)
    }

    /// Decode a tile code to its display string. Unmapped codes become a
    /// literal `0x..` placeholder; the renderer keys off that prefix.
    pub fn decode(&self, tile: u8) -> String {
        match self.glyph(tile) {
            Some(g) => g.to_string(),
            None => format!("{:#x}", tile),
        }
    }
}
