use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use dungeon_layout::{
    DungeonGenerator, GeneratorConfig, NoiseParams, RoomRole, Strategy, TileMap,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    /// Closest pair across every partition split
    Sibling,
    /// Minimum spanning tree over all rooms
    Mst,
    /// Spanning tree of the nearest-neighbor graph plus a few loops
    Nearest,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Sibling => Strategy::BspSibling,
            StrategyArg::Mst => Strategy::Mst,
            StrategyArg::Nearest => Strategy::k_nearest(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "dungeon-layout")]
#[command(about = "Generate BSP dungeon floor layouts", long_about = None)]
struct Args {
    /// JSON generator config; omitted fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fixed seed (a random seed is drawn and printed otherwise)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Connection strategy, overriding the config
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Number of floors, overriding the config
    #[arg(short, long)]
    floors: Option<u32>,

    /// Carve room interiors with noise
    #[arg(long)]
    shape: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose {
        "dungeon_layout=debug,info"
    } else {
        "dungeon_layout=info"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &args.config {
        Some(path) => GeneratorConfig::from_path(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(strategy) = args.strategy {
        config = config.with_strategy(strategy.into());
    }
    if let Some(floors) = args.floors {
        config.floors = floors;
    }
    if args.shape && config.shaping.is_none() {
        config = config.with_shaping(NoiseParams::default());
    }

    let generator = DungeonGenerator::new(config)?;
    let layout = generator.generate();
    let (width, height) = (generator.config().width, generator.config().height);

    println!("seed {}", layout.seed);
    for floor in &layout.floors {
        let start = floor.room_with_role(RoomRole::Start);
        let end = floor.room_with_role(RoomRole::End);
        println!(
            "floor {}: {} rooms, {} connections ({} extra), {} segments, start {:?}, end {:?}",
            floor.index,
            floor.rooms.len(),
            floor.connections.len(),
            floor.connections.extras().len(),
            floor.segments().count(),
            start,
            end,
        );

        let map = TileMap::from_floor(floor, width as usize, height as usize);
        print!("{}", map.to_ascii());
    }
    for stair in &layout.stairs {
        println!(
            "stairs: floor {} room {} -> floor {} room {} at {:?}",
            stair.from_floor,
            stair.from_room,
            stair.from_floor + 1,
            stair.to_room,
            stair.position,
        );
    }

    Ok(())
}
