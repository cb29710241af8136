use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use graphic_nrt::{
    CompositionRuntime, FrameIndex, NrtSession, SceneRuntime, Schedule, ScheduleEntry,
    SimulationOptions, VisualState, fingerprint_table, play_live,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "graphic-nrt", version)]
struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "warn", global = true)]
    log: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate a schedule and print a summary of the resulting table.
    Simulate(SimulateArgs),
    /// Seek to a timestamp and print the restored visual state as JSON.
    Seek(SeekArgs),
    /// Play the schedule live, frame by frame, and print the visual state as JSON.
    Play(PlayArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Scene description JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Schedule JSON: an array of entries or `{ "schedule": [...] }`.
    #[arg(long)]
    schedule: PathBuf,

    /// Simulation options JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the simulated frame bound.
    #[arg(long)]
    max_duration: Option<u64>,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    input: SceneArgs,

    /// Write the full simulation table as JSON.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SeekArgs {
    #[command(flatten)]
    input: SceneArgs,

    /// Target timestamp in milliseconds.
    #[arg(long, allow_negative_numbers = true)]
    at_ms: f64,
}

#[derive(Args, Debug)]
struct PlayArgs {
    #[command(flatten)]
    input: SceneArgs,

    /// Print one JSON line per frame instead of the final state only.
    #[arg(long)]
    every_frame: bool,
}

#[derive(Serialize)]
struct FrameLine {
    frame: FrameIndex,
    state: VisualState,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScheduleFile {
    Bare(Vec<ScheduleEntry>),
    Wrapped { schedule: Vec<ScheduleEntry> },
}

impl ScheduleFile {
    fn into_entries(self) -> Vec<ScheduleEntry> {
        match self {
            Self::Bare(entries) | Self::Wrapped { schedule: entries } => entries,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log)),
        )
        .init();

    match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args),
        Command::Seek(args) => cmd_seek(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse {what} JSON '{}'", path.display()))
}

fn load_options(args: &SceneArgs) -> anyhow::Result<SimulationOptions> {
    let mut opts = match &args.config {
        Some(path) => read_json::<SimulationOptions>(path, "config")?,
        None => SimulationOptions::default(),
    };
    if let Some(max) = args.max_duration {
        opts.max_duration = max;
    }
    Ok(opts)
}

fn build(args: &SceneArgs) -> anyhow::Result<(SceneRuntime, NrtSession, Vec<ScheduleEntry>)> {
    let def = read_json(&args.scene, "scene")?;
    let rt = SceneRuntime::new(&def).context("build scene runtime")?;
    let entries = read_json::<ScheduleFile>(&args.schedule, "schedule")?.into_entries();
    let session = NrtSession::new(load_options(args)?);
    Ok((rt, session, entries))
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let (mut rt, mut session, entries) = build(&args.input)?;
    let report = session
        .set_actions_schedule(&mut rt, &entries)
        .context("simulate schedule")?;
    let table = session.table().context("simulation produced no table")?;

    println!(
        "frames={} truncated={} generation={} fingerprint={}",
        report.frames,
        report.truncated,
        report.generation,
        fingerprint_table(table)
    );

    if let Some(out) = &args.out {
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        let f = File::create(out).with_context(|| format!("create '{}'", out.display()))?;
        serde_json::to_writer_pretty(f, table)
            .with_context(|| format!("write table '{}'", out.display()))?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

fn cmd_seek(args: SeekArgs) -> anyhow::Result<()> {
    let (mut rt, mut session, entries) = build(&args.input)?;
    session
        .set_actions_schedule(&mut rt, &entries)
        .context("simulate schedule")?;
    let outcome = session
        .go_to_time(&mut rt, args.at_ms)
        .with_context(|| format!("seek to {} ms", args.at_ms))?;
    tracing::info!(?outcome, "seek finished");

    let state = rt.visual_state();
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let (mut rt, session, entries) = build(&args.input)?;
    let opts = *session.options();
    let schedule = Schedule::normalize(&entries, rt.fps()).context("normalize schedule")?;

    let mut lines = Vec::new();
    let run = play_live(&mut rt, &schedule, &opts, |frame, rt| {
        if args.every_frame {
            lines.push(FrameLine {
                frame,
                state: rt.visual_state(),
            });
        }
    })
    .context("play schedule")?;
    tracing::info!(frames = run.frames, truncated = run.truncated, "live run finished");

    if args.every_frame {
        for line in &lines {
            println!("{}", serde_json::to_string(line)?);
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&rt.visual_state())?);
    }
    Ok(())
}
