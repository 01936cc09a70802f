//! floorforge: dungeon content from unreliable parts
//!
//! Synthesizes floors, spawns, and story beats, and prints them as JSON
//! on stdout. Diagnostics go to stderr through the logger, so the output
//! stays pipeable.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use ff_core::pipeline::{synthesize_floor, FloorRequest};
use ff_core::provider::{LocalProvider, StoryRequest};
use ff_core::spawn::{generate_enemies, generate_weapons, SpawnRequest};
use ff_core::story::generate_story;

/// Procedural floor synthesis for dungeon crawlers
#[derive(Parser, Debug)]
#[command(name = "floorforge")]
#[command(author, version, about = "Forge complete dungeon floors", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize one complete floor
    Floor {
        /// Number of rooms on the floor
        #[arg(short = 'n', long = "rooms", default_value_t = 6)]
        rooms: usize,

        /// Area theme passed to the content provider
        #[arg(short, long, default_value = "catacombs")]
        area: String,

        /// Floor tile candidates, comma separated
        #[arg(long, value_delimiter = ',', default_value = "mud,slate,moss")]
        floor_tiles: Vec<String>,

        /// Wall tile candidates, comma separated
        #[arg(long, value_delimiter = ',', default_value = "brick,granite,bone")]
        wall_tiles: Vec<String>,

        /// Seed for reproducible local generation
        #[arg(short, long)]
        seed: Option<u64>,

        /// Provider deadline in seconds
        #[arg(short, long, default_value_t = 5)]
        timeout: u64,

        /// Print the JSON on one line
        #[arg(long)]
        compact: bool,
    },

    /// Generate a batch of enemies
    Enemies {
        /// Number of enemies to generate
        #[arg(short = 'n', long = "count", default_value_t = 5)]
        count: usize,

        /// Sprite names the provider may assign, comma separated
        #[arg(long, value_delimiter = ',', default_value = "bat,rat,slime,skeleton")]
        sprites: Vec<String>,

        /// Provider deadline in seconds
        #[arg(short, long, default_value_t = 5)]
        timeout: u64,

        /// Print the JSON on one line
        #[arg(long)]
        compact: bool,
    },

    /// Generate a batch of weapons
    Weapons {
        /// Number of weapons to generate
        #[arg(short = 'n', long = "count", default_value_t = 5)]
        count: usize,

        /// Sprite names the provider may assign, comma separated
        #[arg(long, value_delimiter = ',', default_value = "sword,spear,axe,flail")]
        sprites: Vec<String>,

        /// Provider deadline in seconds
        #[arg(short, long, default_value_t = 5)]
        timeout: u64,

        /// Print the JSON on one line
        #[arg(long)]
        compact: bool,
    },

    /// Narrate the transition between two floors
    Story {
        /// Area the player is leaving
        #[arg(long, default_value = "catacombs")]
        prev_area: String,

        /// Area the player is entering
        #[arg(long, default_value = "sewers")]
        next_area: String,

        /// Story text the previous floor shipped with
        #[arg(long, default_value = "")]
        prev_story: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(err) = run(args.command) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    let provider = Arc::new(LocalProvider);

    match command {
        Command::Floor {
            rooms,
            area,
            floor_tiles,
            wall_tiles,
            seed,
            timeout,
            compact,
        } => {
            let mut request = FloorRequest::new(rooms, &area, floor_tiles, wall_tiles);
            request.seed = seed;
            request.timeout = Duration::from_secs(timeout);
            let plan = synthesize_floor(&request, provider)?;
            println!("{}", render(&plan, compact)?);
            log::info!("floor with {rooms} rooms written");
        }
        Command::Enemies {
            count,
            sprites,
            timeout,
            compact,
        } => {
            let mut request = SpawnRequest::new(count, sprites);
            request.timeout = Duration::from_secs(timeout);
            let batch = generate_enemies(&request, provider)?;
            println!("{}", render(&batch, compact)?);
        }
        Command::Weapons {
            count,
            sprites,
            timeout,
            compact,
        } => {
            let mut request = SpawnRequest::new(count, sprites);
            request.timeout = Duration::from_secs(timeout);
            let batch = generate_weapons(&request, provider)?;
            println!("{}", render(&batch, compact)?);
        }
        Command::Story {
            prev_area,
            next_area,
            prev_story,
        } => {
            let request = StoryRequest {
                prev_area,
                next_area,
                prev_story,
            };
            let story = generate_story(&request, provider.as_ref());
            println!("{}", serde_json::json!({ "story": story }));
        }
    }

    Ok(())
}

/// Render a value as JSON, indented unless asked for one line
fn render<T: serde::Serialize>(value: &T, compact: bool) -> Result<String, serde_json::Error> {
    if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
}
