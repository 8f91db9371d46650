use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use liftoff::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, TICK_STEP};
use liftoff::{
    Canvas, CpuSurface, CrashTrigger, FrameClock, IntervalClock, ManualClock, RunMode, Session,
    SessionOpts, SpriteSet,
};

#[derive(Parser, Debug)]
#[command(name = "liftoff", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the live animation loop, dumping frames as PNGs.
    Run(RunArgs),
    /// Render a single inspect frame at a pinned elapsed time.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Asset root containing rocket/, crash/, earning.png and the font.
    #[arg(long)]
    assets: PathBuf,

    /// Display font inside the asset root.
    #[arg(long, default_value = "font.ttf")]
    font: PathBuf,

    /// Output directory for PNG frames.
    #[arg(long)]
    out: PathBuf,

    /// Number of ticks to run.
    #[arg(long, default_value_t = 400)]
    ticks: u64,

    /// Write every Nth frame.
    #[arg(long, default_value_t = 1)]
    every: u64,

    /// Seed for the crash RNG.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Disable the probabilistic crash trigger (rounds never crash).
    #[arg(long)]
    no_crash: bool,

    /// Pace ticks on the real 50ms clock instead of rendering flat out.
    #[arg(long)]
    realtime: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Asset root containing rocket/, crash/, earning.png and the font.
    #[arg(long)]
    assets: PathBuf,

    /// Display font inside the asset root.
    #[arg(long, default_value = "font.ttf")]
    font: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Elapsed round time to pin the frame at.
    #[arg(long, default_value_t = 13.0)]
    elapsed: f64,

    /// Payout pop-up time to animate to before capturing.
    #[arg(long, default_value_t = 0.5)]
    popup: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn load_surface(assets: &Path, font: &Path) -> anyhow::Result<CpuSurface> {
    let font_bytes = liftoff::load_font_bytes(assets.join(font))?;
    let canvas = Canvas {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
    };
    Ok(CpuSurface::new(canvas, font_bytes)?)
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let sprites = SpriteSet::load(&args.assets)?;
    let mut surface = load_surface(&args.assets, &args.font)?;

    let opts = SessionOpts {
        mode: RunMode::Live,
        trigger: if args.no_crash {
            CrashTrigger::Disabled
        } else {
            CrashTrigger::default()
        },
        seed: args.seed,
    };
    let mut session = Session::new(opts, sprites, &surface)?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let mut clock: Box<dyn FrameClock> = if args.realtime {
        Box::new(IntervalClock::animation())
    } else {
        Box::new(ManualClock)
    };

    let every = args.every.max(1);
    for tick in 0..args.ticks {
        clock.wait_for_tick();
        session.step(&mut surface)?;
        if tick.is_multiple_of(every) {
            write_png(&surface, &args.out.join(format!("frame_{tick:05}.png")))?;
        }
    }

    eprintln!("wrote {} ticks to {}", args.ticks, args.out.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let sprites = SpriteSet::load(&args.assets)?;
    let mut surface = load_surface(&args.assets, &args.font)?;

    let opts = SessionOpts {
        mode: RunMode::Inspect {
            elapsed: args.elapsed,
        },
        trigger: CrashTrigger::Disabled,
        seed: 0,
    };
    let mut session = Session::new(opts, sprites, &surface)?;

    // Each inspect tick advances the pop-up by one TICK_STEP.
    let ticks = (args.popup / TICK_STEP).ceil().max(1.0) as u64;
    for _ in 0..ticks {
        session.step(&mut surface)?;
    }

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    write_png(&surface, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn write_png(surface: &CpuSurface, path: &Path) -> anyhow::Result<()> {
    // The background is opaque, so premultiplied output equals straight RGBA.
    let frame = surface.frame();
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}
