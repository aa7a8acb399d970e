mod command;
mod config;
mod render;
mod runner;

use clap::Parser;
use common::games::SessionRng;
use common::games::snake::GameSession;
use common::storage::FileKeyValueStore;
use common::{log, logger};

#[derive(Parser)]
#[command(name = "grid_snake_client")]
struct Args {
    /// Path of the YAML config file; defaults to one next to the executable.
    #[arg(long)]
    config: Option<String>,
    /// Overrides the storage location from the config.
    #[arg(long)]
    data_dir: Option<String>,
    /// Fixes food and obstacle placement for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Snake".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config_manager = config::get_config_manager(args.config.as_deref());
    let config = config_manager.get_or_init_config()?;

    let data_dir = args.data_dir.unwrap_or(config.storage.location.clone());
    let rng = match args.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    log!("Starting with data directory {} and seed {}", data_dir, rng.seed());

    let store = FileKeyValueStore::new(data_dir);
    let session = GameSession::boot(store, config.engine.clone(), rng);

    runner::run(session, config.engine.frame_delta()).await;
    Ok(())
}
