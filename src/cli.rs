use crate::{
    chunk_plan::ChunkPlan,
    config::Config,
    engine::EdaxSolver,
    parser::{PositionRecord, parse_report},
    pipeline::BatchOrchestrator,
    util::{ensure_dir, now_rfc3339},
};
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "edax-batch")]
#[command(about = "Batch driver for the Edax solver (report parsing + parallel chunked solving)")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./edax-batch.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the engine's name and version.
    Version {},
    /// Show how a batch of the given size would be split.
    Plan {
        #[arg(long)]
        count: usize,
        #[arg(long)]
        parallelism: Option<usize>,
    },
    /// Parse a captured solve report.
    Parse {
        #[arg(long)]
        input: PathBuf,
    },
    /// Solve positions, one per line of --input or given with --position.
    Solve {
        #[arg(long, conflicts_with = "position")]
        input: Option<PathBuf>,
        #[arg(long)]
        position: Vec<String>,
        #[arg(long)]
        parallelism: Option<usize>,
        #[arg(long)]
        pretty: bool,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg_path = resolve_config_path(args.config.as_deref());
    let cfg = match cfg_path {
        Some(p) => Config::load(&p)?,
        None => Config::default(),
    };
    let _guard = init_logging(&args, &cfg)?;

    match &args.cmd {
        Command::Version {} => version(&cfg),
        Command::Plan { count, parallelism } => plan(&cfg, *count, *parallelism),
        Command::Parse { input } => parse(input),
        Command::Solve {
            input,
            position,
            parallelism,
            pretty,
        } => solve(&cfg, input.as_deref(), position, *parallelism, *pretty),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    ["edax-batch.toml", "edax-batch.example.toml"]
        .into_iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

fn init_logging(args: &Args, cfg: &Config) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Records go to stdout; logs stay on stderr.
    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if cfg.logging.write_to_file && !cfg.logging.file_path.is_empty() {
        let path = Path::new(&cfg.logging.file_path);
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn version(cfg: &Config) -> Result<()> {
    let solver = EdaxSolver::new(cfg)?;
    println!("{}", solver.version()?);
    Ok(())
}

fn plan(cfg: &Config, count: usize, parallelism: Option<usize>) -> Result<()> {
    let parallelism = parallelism.unwrap_or_else(|| cfg.batch.effective_parallelism());
    let plan = ChunkPlan::partition(count, parallelism);
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

fn parse(input: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("reading report: {}", input.display()))?;
    let summary = parse_report(&raw).with_context(|| format!("parsing {}", input.display()))?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn solve(
    cfg: &Config,
    input: Option<&Path>,
    given: &[String],
    parallelism: Option<usize>,
    pretty: bool,
) -> Result<()> {
    let positions = match input {
        Some(path) => read_positions(path)?,
        None => given.to_vec(),
    };
    if positions.is_empty() {
        return Err(anyhow!("no positions given; use --input or --position"));
    }

    let mut cfg = cfg.clone();
    if let Some(p) = parallelism {
        cfg.batch.parallelism = p;
    }

    let solver = EdaxSolver::new(&cfg)?;
    info!("engine {}", solver.executable().display());
    let orch = BatchOrchestrator::new(&cfg, solver)?;

    let started = now_rfc3339();
    let output = orch.solve_detailed(&positions)?;
    let finished = now_rfc3339();

    print_records(&output.records, pretty || cfg.output.format == "pretty")?;

    if cfg.output.write_report_json {
        let path = Path::new(&cfg.output.report_path);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let doc = serde_json::json!({
            "started": started,
            "finished": finished,
            "positions": positions.len(),
            "total_nodes": output.report.total_nodes(),
            "report": output.report,
        });
        std::fs::write(path, serde_json::to_string_pretty(&doc)?)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("batch report written to {}", path.display());
    }

    Ok(())
}

fn read_positions(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading positions: {}", path.display()))?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

fn print_records(records: &[PositionRecord], pretty: bool) -> Result<()> {
    if pretty {
        let blocks: Vec<String> = records.iter().map(PositionRecord::pretty).collect();
        println!("{}", blocks.join("\n\n"));
    } else {
        println!("{}", serde_json::to_string_pretty(records)?);
    }
    Ok(())
}
