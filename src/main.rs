use log::{debug, info};
use redscope::charmap::Charmap;
use redscope::memory::MemoryReader;
use redscope::render::{render_overworld, SCREEN_TILE_HEIGHT, SCREEN_TILE_WIDTH};
use redscope::state;
use redscope::symbols::SymbolTable;
use redscope::tables::Tables;
use std::env;
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    // Display help information if arguments are missing
    // Exit with success status since user is requesting help, not encountering an error
    if args.len() < 3 {
        println!("redscope - decode a Pokémon Red memory image into a world-state snapshot");
        println!();
        println!("Usage: {} <symbols.sym> <memory.bin> [tables.toml]", args[0]);
        println!("Examples:");
        println!("  {} data/pokered.sym dumps/oaks_lab.bin", args[0]);
        println!(
            "  {} data/pokered.sym dumps/oaks_lab.bin data/tables.toml",
            args[0]
        );
        println!();
        println!("memory.bin is a flat dump of the 16-bit address space;");
        println!("tables.toml optionally replaces the built-in ID-to-name tables");
        return Ok(());
    }

    let sym_path = &args[1];
    let dump_path = &args[2];

    debug!("Loading symbol file: {}", sym_path);
    let symbols = SymbolTable::from_file(sym_path).map_err(into_io)?;
    info!("Loaded {} symbols", symbols.len());

    // Load the memory dump with user-friendly error handling
    let dump = match fs::read(dump_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            match e.kind() {
                std::io::ErrorKind::NotFound => {
                    eprintln!("Error: Memory dump not found: {}", dump_path);
                    eprintln!();
                    eprintln!("Please check:");
                    eprintln!("• File path is correct");
                    eprintln!("• You're running from the right directory");
                }
                _ => {
                    eprintln!("Error: Cannot read memory dump '{}': {}", dump_path, e);
                }
            }
            std::process::exit(1);
        }
    };
    info!("Memory dump: {} bytes", dump.len());

    let tables = match args.get(3) {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("Cannot read tables file '{}': {}", path, e))
                .map_err(into_io)?;
            Tables::from_toml_str(&text).map_err(into_io)?
        }
        None => Tables::default(),
    };

    let reader = MemoryReader::new(&dump, symbols);
    let charmap = Charmap::default();

    let snapshot = state::snapshot(&reader, &tables).map_err(into_io)?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    println!();
    println!(
        "{}",
        render_overworld(&reader, &charmap, SCREEN_TILE_WIDTH, SCREEN_TILE_HEIGHT)
            .map_err(into_io)?
    );

    Ok(())
}

fn into_io(e: String) -> Box<dyn std::error::Error> {
    Box::new(std::io::Error::other(e))
}
