use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::Parser;
use dronereel::{JournalScene, MemoryScene, ReplayConfig, ReplaySession, SceneAdapter};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dronereel", version)]
struct Cli {
    /// Newline-delimited JSON trace, one take per line.
    #[arg(long)]
    trace: PathBuf,

    /// JSON config; fields not given keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Take to build (0-based). Repeat to build several in order.
    #[arg(long = "take", conflicts_with = "all_takes")]
    takes: Vec<usize>,

    /// Build every take in the trace.
    #[arg(long)]
    all_takes: bool,

    /// Write engine commands here, one JSON object per line.
    #[arg(long)]
    journal: Option<PathBuf>,

    /// Write the final scene state as JSON.
    #[arg(long)]
    dump_scene: Option<PathBuf>,

    /// Render each take to `<dir>/take_NN.mp4`.
    #[arg(long)]
    render_dir: Option<PathBuf>,

    /// Remove every object from the scene before building the cast.
    #[arg(long)]
    clear: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ReplayConfig::from_json_file(path)?,
        None => ReplayConfig::default(),
    };
    config.trace_path = cli.trace.clone();

    let scene = match &cli.journal {
        Some(path) => {
            let f = File::create(path)
                .with_context(|| format!("create journal '{}'", path.display()))?;
            let journal = JournalScene::new(MemoryScene::new(), BufWriter::new(f));
            let journal = replay(&cli, config, journal)?;
            let written = journal.written();
            let (scene, mut out) = journal.finish()?;
            out.flush().context("flush journal")?;
            tracing::info!(commands = written, path = %path.display(), "wrote journal");
            scene
        }
        None => replay(&cli, config, MemoryScene::new())?,
    };

    if let Some(path) = &cli.dump_scene {
        write_snapshot(path, &scene)?;
    }
    Ok(())
}

fn replay<S: SceneAdapter>(cli: &Cli, config: ReplayConfig, scene: S) -> anyhow::Result<S> {
    let mut session = ReplaySession::new(config, scene)?;
    let count = session.load_trace(&cli.trace)?;
    session.bootstrap(cli.clear)?;

    let takes: Vec<usize> = if cli.all_takes {
        (0..count).collect()
    } else if cli.takes.is_empty() {
        vec![0]
    } else {
        cli.takes.clone()
    };

    for take in takes {
        match &cli.render_dir {
            Some(dir) => {
                if !session.render_take(take, dir)? {
                    tracing::warn!(take, "take built but not rendered");
                }
            }
            None => {
                let report = session.create_animation(take)?;
                println!("{}", serde_json::to_string(&report)?);
            }
        }
    }

    session.finish();
    Ok(session.into_scene())
}

fn write_snapshot(path: &Path, scene: &MemoryScene) -> anyhow::Result<()> {
    let f = File::create(path).with_context(|| format!("create '{}'", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, &scene.snapshot()).context("serialize scene")?;
    w.flush().context("flush scene snapshot")?;
    Ok(())
}
