//! puzzle15 CLI: drive the camera 15-puzzle from a still image or a synthetic feed.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::ScopedJoinHandle;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use puzzle15_app::{
    FrameLoopReport, Puzzle15Processor, PuzzleConfig, TapOutcome, app_version, drive_frames,
    schedule_frames,
};
use puzzle15_capture::{FrameSource, StillImageSource, SyntheticFrameSource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "puzzle15")]
#[command(about = "Sliding 15-puzzle overlay for camera frames")]
#[command(version)]
struct Cli {
    /// JSON config file (defaults apply when omitted).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shuffle one frame, apply taps, and write the result as an image.
    Render(RenderArgs),

    /// Feed synthetic frames on one thread while another thread taps.
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
struct SourceArgs {
    /// Input image; a synthetic gradient is used when omitted.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Synthetic frame width.
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Synthetic frame height.
    #[arg(long, default_value_t = 480)]
    height: u32,
}

#[derive(Debug, Clone, Args)]
struct RenderArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Tap in frame pixels, `X,Y`; may be repeated.
    #[arg(long = "tap", value_parser = parse_tap)]
    taps: Vec<(i64, i64)>,

    /// Toggle tile numbers once before rendering.
    #[arg(long)]
    toggle_numbers: bool,

    /// Output image path (format from extension).
    #[arg(long)]
    out: PathBuf,
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Number of frames to deliver.
    #[arg(long, default_value_t = 120)]
    frames: usize,

    /// Frame delivery rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Random taps injected by the input thread.
    #[arg(long, default_value_t = 200)]
    taps: usize,
}

fn parse_tap(raw: &str) -> Result<(i64, i64), String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {raw:?}"))?;
    let x = x.trim().parse().map_err(|_| format!("invalid x in {raw:?}"))?;
    let y = y.trim().parse().map_err(|_| format!("invalid y in {raw:?}"))?;
    Ok((x, y))
}

fn open_source(args: &SourceArgs) -> CliResult<Box<dyn FrameSource>> {
    let source: Box<dyn FrameSource> = match &args.image {
        Some(path) => Box::new(StillImageSource::open(path)?),
        None => Box::new(SyntheticFrameSource::new(args.width, args.height)?),
    };
    Ok(source)
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = PuzzleConfig::load(cli.config.as_deref())?;
    tracing::info!(version = app_version(), seed = ?config.seed, "puzzle15 starting");

    match cli.command {
        Commands::Render(args) => run_render(&config, &args),
        Commands::Run(args) => run_live(&config, &args),
    }
}

fn run_render(config: &PuzzleConfig, args: &RenderArgs) -> CliResult<()> {
    let source = open_source(&args.source)?;
    let (width, height) = source.frame_size();

    let processor = Puzzle15Processor::new(config);
    processor.set_frame_size(width, height)?;
    processor.new_game()?;

    for &(x, y) in &args.taps {
        let outcome = processor.handle_tap(x, y)?;
        tracing::info!(x, y, ?outcome, "tap applied");
    }
    if args.toggle_numbers {
        processor.toggle_labels()?;
    }

    let frame = source.next_frame(0)?;
    {
        let rendered = processor.render_frame(&frame)?;
        write_image(&args.out, &rendered)?;
    }

    let board = processor.board()?;
    tracing::info!(
        out = %args.out.display(),
        tiles = ?board.tiles(),
        "rendered puzzle frame"
    );
    Ok(())
}

fn write_image(path: &Path, frame: &puzzle15_core::Frame) -> CliResult<()> {
    let image = image::RgbaImage::from_raw(frame.width, frame.height, frame.rgba.clone())
        .ok_or("rendered frame buffer does not match its geometry")?;
    image.save(path)?;
    Ok(())
}

fn run_live(config: &PuzzleConfig, args: &RunArgs) -> CliResult<()> {
    let source = open_source(&args.source)?;
    let (width, height) = source.frame_size();

    let processor = Puzzle15Processor::new(config);
    processor.set_frame_size(width, height)?;
    processor.new_game()?;

    let schedule = schedule_frames(args.fps, 0, args.frames)?;
    let interval = Duration::from_millis(1_000 / args.fps as u64);
    let frames_done = AtomicBool::new(false);
    let tap_seed = config.seed.unwrap_or_default() ^ 0x5EED;

    let (report, tap_stats) = std::thread::scope(|scope| {
        let input = scope.spawn(|| {
            let mut rng = StdRng::seed_from_u64(tap_seed);
            let mut stats = TapStats::default();
            for _ in 0..args.taps {
                if frames_done.load(Ordering::Relaxed) {
                    break;
                }
                let x = rng.random_range(0..width as i64);
                let y = rng.random_range(0..height as i64);
                match processor.handle_tap(x, y) {
                    Ok(TapOutcome::Moved { .. }) => stats.moves += 1,
                    Ok(TapOutcome::NoMove) => stats.non_moves += 1,
                    Ok(TapOutcome::Rejected) => stats.rejected += 1,
                    Err(error) => {
                        tracing::error!(%error, "tap delivery failed");
                        break;
                    }
                }
                std::thread::sleep(interval / 2);
            }
            stats
        });

        // One timestamp per call so the lock is free while this thread sleeps.
        let mut report = FrameLoopReport::default();
        let mut outcome = Ok(());
        for timestamp in schedule.chunks(1) {
            match drive_frames(&processor, source.as_ref(), timestamp, |_| {}) {
                Ok(step) => {
                    report.rendered += step.rendered;
                    report.size_mismatches += step.size_mismatches;
                }
                Err(error) => {
                    outcome = Err(error);
                    break;
                }
            }
            std::thread::sleep(interval);
        }
        frames_done.store(true, Ordering::Relaxed);

        let stats = join_tap_injector(input);
        (outcome.map(|()| report), stats)
    });

    let report = report?;
    let board = processor.board()?;
    tracing::info!(
        rendered = report.rendered,
        dropped = report.size_mismatches,
        moves = tap_stats.moves,
        non_moves = tap_stats.non_moves,
        rejected = tap_stats.rejected,
        tiles = ?board.tiles(),
        "live run finished"
    );
    Ok(())
}

#[derive(Debug, Default)]
struct TapStats {
    moves: usize,
    non_moves: usize,
    rejected: usize,
}

/// Waits for the tap injector; a panic is logged and reported as no taps.
fn join_tap_injector(handle: ScopedJoinHandle<'_, TapStats>) -> TapStats {
    handle.join().unwrap_or_else(|_| {
        tracing::error!("tap injector thread panicked; tap counts are incomplete");
        TapStats::default()
    })
}
