#![crate_name = "redscope"]

//! Symbolic memory decoder for Pokémon Red running under a Game Boy
//! emulator. Resolves named memory regions through a debug symbol table,
//! reads typed values (byte/word/BCD) out of the live address space, and
//! synthesizes one consistent, JSON-serializable world-state snapshot per
//! poll, plus a compact markdown rendering of the visible overworld.

#[macro_use]
extern crate lazy_static;

pub mod charmap;
pub mod collision;
pub mod memory;
pub mod render;
pub mod sprites;
pub mod state;
pub mod symbols;
pub mod tables;
