use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use facility_gen::engine::{Output, OutputBlock, render_ascii_map};
use facility_gen::world::{GameMap, load_map_from_file, validate_map};
use facility_gen::{Explorer, MapGenerator, load_catalog_from_file};

/// Generate a facility map from room templates and walk through it.
#[derive(Parser)]
#[command(about, long_about = None, version)]
struct Args {
    /// Room template catalog (TOML, or JSON when the file ends in .json)
    #[arg(short, long, default_value = "assets/site19.toml")]
    templates: PathBuf,

    /// Maximum number of rooms to place
    #[arg(short, long, default_value_t = 15)]
    rooms: usize,

    /// Seed for a reproducible map; random when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Clearance level of the player
    #[arg(short, long, default_value_t = 0)]
    clearance: u8,

    /// Load a previously dumped map instead of generating one
    #[arg(short, long, conflicts_with = "seed")]
    map: Option<PathBuf>,

    /// Write the map as JSON to this file
    #[arg(long)]
    dump_json: Option<PathBuf>,

    /// Print the ASCII map before playing
    #[arg(long, default_value_t = false)]
    show_map: bool,

    /// Do not start the interactive loop
    #[arg(long, default_value_t = false)]
    no_play: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

fn flush_output(out: Output) {
    let mut printed_anything = false;
    let mut started_events = false;

    for block in out.blocks {
        match block {
            OutputBlock::Title(t) => {
                println!("\n{}", t);
                printed_anything = true;
            }
            OutputBlock::Text(line) => {
                println!("{}", line);
                printed_anything = true;
            }
            OutputBlock::Event(ev) => {
                if !started_events {
                    if printed_anything {
                        println!(); // visual separation before first event
                    }
                    started_events = true;
                }
                println!("{}", ev);
                printed_anything = true;
            }
            OutputBlock::Map(art) => {
                println!("\n{}\n", art);
                printed_anything = true;
            }
            OutputBlock::Exits(exits) => {
                println!("\n{}", exits);
                printed_anything = true;
            }
        }
    }
}

fn build_map(args: &Args) -> Result<GameMap, String> {
    if let Some(path) = &args.map {
        let map = load_map_from_file(path)
            .map_err(|e| format!("Failed to load map file '{}': {e}", path.display()))?;
        for problem in validate_map(&map) {
            warn!("{}: {}", path.display(), problem);
        }
        return Ok(map);
    }

    let catalog = load_catalog_from_file(&args.templates).map_err(|e| {
        format!(
            "Failed to load template file '{}': {e}",
            args.templates.display()
        )
    })?;
    debug!(
        "Loaded {} templates from {}",
        catalog.len(),
        args.templates.display()
    );

    let seed = args.seed.unwrap_or_else(rand::random);
    println!("Map seed: {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut generator = MapGenerator::new(&catalog, args.rooms);
    generator
        .generate(&mut rng)
        .map_err(|e| format!("Cannot generate a map: {e}"))
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if args.debug {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let map = match build_map(&args) {
        Ok(m) => m,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    println!("Map has {} rooms. Start at: {}", map.len(), map.start_room);

    if let Some(path) = &args.dump_json {
        let written = serde_json::to_string_pretty(&map)
            .map_err(io::Error::other)
            .and_then(|json| fs::write(path, json));
        match written {
            Ok(()) => println!("Map data saved to: {}", path.display()),
            Err(e) => {
                eprintln!("Failed to save map data to '{}': {e}", path.display());
                return ExitCode::FAILURE;
            }
        }
    }

    let mut explorer = Explorer::new(map, args.clearance);

    if args.show_map {
        let markers = explorer.entity_markers();
        println!(
            "\n{}\n",
            render_ascii_map(&explorer.map, &markers, Some(explorer.map.start_room.as_str()))
        );
    }

    if args.no_play {
        return ExitCode::SUCCESS;
    }

    match play(&mut explorer) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("I/O error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn play(explorer: &mut Explorer) -> io::Result<()> {
    println!();
    println!(
        "You hold Clearance Level {}. Type 'look', 'map', a direction, or 'quit'.",
        explorer.clearance_level
    );

    match explorer.initialize() {
        Some(out) => flush_output(out),
        None => {
            eprintln!("Error: start_room '{}' not found.", explorer.map.start_room);
            return Ok(());
        }
    }

    let stdin = io::stdin();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        let bytes_read = stdin.read_line(&mut input)?;
        if bytes_read == 0 {
            println!("\nGoodbye.");
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let (out, quit) = explorer.step(input);
        flush_output(out);

        if quit {
            break;
        }
    }

    Ok(())
}
