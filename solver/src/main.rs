use anyhow::{Context, Result};
use clap::Parser;
use dungeon_solver::{
    render, replay_route, Dungeon, PathTable, RecomputeStrategy, Resolver, Room, SolverConfig,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dungeon-solver")]
#[command(about = "Finds a route through a dungeon of locked rooms, fetching keys on the way", long_about = None)]
struct Args {
    /// Edge list: room count, start, end, then src,dst,weight lines
    graph_file: PathBuf,

    /// Key list: room,reduction,target[,target...] lines
    key_file: PathBuf,

    /// Override the start room from the graph file
    #[arg(long)]
    start: Option<Room>,

    /// Override the end room from the graph file
    #[arg(long)]
    end: Option<Room>,

    /// Print the solution as JSON
    #[arg(long)]
    json: bool,

    /// Dump the weight, key and distance matrices to stderr before solving
    #[arg(long)]
    show_matrices: bool,

    /// Give up after this many resolver iterations (defaults to DUNGEON_MAX_ITERATIONS)
    #[arg(long)]
    max_iterations: Option<usize>,

    /// How to refresh shortest paths after a key pickup (defaults to DUNGEON_RECOMPUTE)
    #[arg(long, value_enum)]
    recompute: Option<RecomputeStrategy>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .with_context(|| format!("invalid log level {:?}", args.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = SolverConfig::from_env().context("invalid solver settings in environment")?;
    if let Some(limit) = args.max_iterations {
        config.max_iterations = Some(limit);
    }
    if let Some(recompute) = args.recompute {
        config.recompute = recompute;
    }

    let mut dungeon = Dungeon::load(&args.graph_file, &args.key_file).with_context(|| {
        format!(
            "failed to load dungeon from {} and {}",
            args.graph_file.display(),
            args.key_file.display()
        )
    })?;
    let start = args.start.unwrap_or(dungeon.start);
    let end = args.end.unwrap_or(dungeon.end);

    if args.show_matrices {
        eprintln!("weights:\n{}", render::weights(&dungeon.graph));
        eprintln!("keys:\n{}", render::keys(&dungeon.graph));
        eprintln!(
            "distances:\n{}",
            render::distances(&PathTable::compute(&dungeon.graph))
        );
    }

    let original = dungeon.graph.clone();
    let solution = Resolver::new(&mut dungeon.graph)
        .with_config(config)
        .solve(start, end)
        .with_context(|| format!("no route from room {} to room {}", start, end))?;

    let replay = replay_route(&original, start, end, &solution.path)
        .context("solved route does not replay on the original dungeon")?;
    info!(
        cost = replay.cost,
        keys = ?replay.keys_picked_up,
        detours = solution.detours,
        "route replayed"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&solution)?);
    } else {
        println!("{:?}", solution.path);
    }
    Ok(())
}
