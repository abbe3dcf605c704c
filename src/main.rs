use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use whiskers_lib::app::{load_config, ShutdownManager, Simulation, TracingRenderTarget};
use whiskers_lib::model::metrics::init_logging;
use whiskers_lib::model::persistence::{
    from_definition_code, save_registry, FileStore, StoreFormat,
};
use whiskers_lib::model::CatSettings;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Number of cats to spawn (overrides the config)
    #[arg(long)]
    cats: Option<usize>,

    /// Frames to run before exiting
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// World seed (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Pace frames at the configured FPS instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Directory to save the cats into when the run ends
    #[arg(long)]
    export: Option<PathBuf>,

    /// Collection name used with --export
    #[arg(long, default_value = "session")]
    collection: String,

    /// File format used with --export
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    format: ExportFormat,

    /// Definition code of a cat to add alongside the spawned ones (repeatable)
    #[arg(long = "adopt", value_name = "CODE")]
    adopt: Vec<String>,

    /// Interaction targets to scatter around the room
    #[arg(long, default_value_t = 8)]
    targets: usize,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ExportFormat {
    Json,
    Rkyv,
}

impl From<ExportFormat> for StoreFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Json => StoreFormat::GzipJson,
            ExportFormat::Rkyv => StoreFormat::Rkyv,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = load_config(&args.config)?;
    if let Some(cats) = args.cats {
        config.world.initial_cats = cats;
    }
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }

    let frame = Duration::from_secs_f32(config.frame_ms() / 1000.0);
    let mut sim = Simulation::new(config, TracingRenderTarget::default())?;
    for code in &args.adopt {
        let definition = from_definition_code(code)?;
        let name = definition.name.clone();
        let id = sim.add_cat(CatSettings::from_definition(definition))?;
        tracing::info!(%id, %name, "Adopted cat");
    }
    sim.scatter_targets(args.targets);

    let shutdown = ShutdownManager::new();
    shutdown.listen_for_ctrl_c();

    if args.realtime {
        let mut interval = tokio::time::interval(frame);
        for _ in 0..args.ticks {
            interval.tick().await;
            if shutdown.is_shutdown_requested() {
                break;
            }
            sim.tick();
        }
    } else {
        for _ in 0..args.ticks {
            if shutdown.is_shutdown_requested() {
                break;
            }
            sim.tick();
        }
    }

    let metrics = sim.metrics();
    tracing::info!(
        ticks = metrics.tick_count(),
        cats = sim.registry().len(),
        meals = metrics.counter("meals"),
        play_sessions = metrics.counter("play_sessions"),
        behavior_changes = metrics.counter("behavior_changed"),
        elapsed_ms = metrics.elapsed().as_millis() as u64,
        "Run finished"
    );

    if let Some(dir) = &args.export {
        let mut store = FileStore::open_with_format(dir, args.format.into())?;
        let saved = save_registry(&mut store, &args.collection, sim.registry_mut())?;
        tracing::info!(saved, dir = %dir.display(), collection = %args.collection, "Exported cats");
    }

    sim.shutdown();
    Ok(())
}
