use std::path::{Path, PathBuf};

use anyhow::Context as _;
use backdrop::{
    CpuPainter, Explosion, ExplosionConfig, FrameRGBA, HeadlessDriver, InteractionEvent,
    ManualScheduler, MOBILE_BREAKPOINT_PX, Painter, ParticleBackground, ParticleConfig, Preset,
    Rgba8, paint_immediate,
};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Parser, Debug)]
#[command(name = "backdrop", version)]
struct Cli {
    /// Log engine events to stderr (repeat for more detail).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a particle background as a PNG sequence.
    Frames(FramesArgs),
    /// Render a one-shot explosion until it burns out.
    Explode(ExplodeArgs),
    /// Print a preset's particle sets as JSON.
    Preset(PresetArgs),
}

#[derive(Args, Debug)]
struct Surface {
    /// Surface width in pixels.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Background color (`#rrggbb`); transparent when omitted.
    #[arg(long)]
    background: Option<String>,

    /// Output directory for `frame_NNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct FramesArgs {
    /// Preset name (ambient, ambient-low, ambient-high, interactive, constellation,
    /// constellation-light, drift, drift-trail, advanced).
    #[arg(long, default_value = "constellation")]
    preset: String,

    /// JSON file with one particle set or an array of sets; overrides `--preset`.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    surface: Surface,

    /// Number of frames to write.
    #[arg(long, default_value_t = 60)]
    frames: u64,

    /// Animation frames per second.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Pointer position in pixels, `X,Y`.
    #[arg(long, value_parser = parse_pointer)]
    pointer: Option<(f64, f64)>,
}

#[derive(Args, Debug)]
struct ExplodeArgs {
    /// Burst origin x in pixels; defaults to the surface center.
    #[arg(long)]
    x: Option<f64>,

    /// Burst origin y in pixels; defaults to the surface center.
    #[arg(long)]
    y: Option<f64>,

    #[command(flatten)]
    surface: Surface,

    /// Particles in the burst.
    #[arg(long)]
    count: Option<usize>,

    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Safety cap on written frames.
    #[arg(long, default_value_t = 600)]
    max_frames: u64,
}

#[derive(Args, Debug)]
struct PresetArgs {
    /// Preset name.
    name: String,

    /// Apply the mobile count reduction for this viewport width.
    #[arg(long)]
    width: Option<f64>,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ConfigFile {
    Many(Vec<ParticleConfig>),
    One(Box<ParticleConfig>),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Frames(args) => cmd_frames(args),
        Command::Explode(args) => cmd_explode(args),
        Command::Preset(args) => cmd_preset(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_pointer(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{v}': {e}"))
    };
    Ok((parse(x)?, parse(y)?))
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let mut layers = match &args.config {
        Some(path) => load_layers(path)?,
        None => Preset::from_name(&args.preset)?.layers_for_width(f64::from(args.surface.width)),
    };
    if let Some(seed) = args.seed {
        for (i, layer) in layers.iter_mut().enumerate() {
            layer.seed = Some(seed.wrapping_add(i as u64));
        }
    }

    let mut painter = make_painter(&args.surface)?;
    let viewport = painter.size();
    let mut background = ParticleBackground::with_layers(layers, ManualScheduler::new());
    let writer = background
        .mount(viewport)
        .context("background was already mounted")?;
    if let Some((x, y)) = args.pointer {
        writer.push(InteractionEvent::PointerMoved { x, y });
    }

    let out_dir = &args.surface.out_dir;
    create_dir(out_dir)?;
    let report = HeadlessDriver::new(args.fps)?
        .with_max_frames(args.frames)
        .run(&mut background, &mut painter, |i, p| {
            write_png(&out_dir.join(frame_name(i)), p.finish()).map_err(Into::into)
        })?;
    background.unmount();

    eprintln!("wrote {} frames to {}", report.frames, out_dir.display());
    Ok(())
}

fn cmd_explode(args: ExplodeArgs) -> anyhow::Result<()> {
    let mut config = ExplosionConfig {
        seed: args.seed,
        ..ExplosionConfig::default()
    };
    if let Some(count) = args.count {
        config.particle_count = count;
    }
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut painter = make_painter(&args.surface)?;
    let size = painter.size();
    let origin = backdrop::Point::new(
        args.x.unwrap_or(size.width * 0.5),
        args.y.unwrap_or(size.height * 0.5),
    );

    let mut explosion = Explosion::new(config).on_complete(|| tracing::info!("explosion complete"));
    explosion.trigger(origin, &mut rng);

    let out_dir = &args.surface.out_dir;
    create_dir(out_dir)?;
    let lines = backdrop::ConnectionParams::default();
    let mut frames = 0u64;
    while explosion.is_active() && frames < args.max_frames {
        explosion.step();
        paint_immediate(&mut painter, explosion.particles(), &[], &lines);
        write_png(&out_dir.join(frame_name(frames)), painter.finish())?;
        frames += 1;
    }

    eprintln!("wrote {frames} frames to {}", out_dir.display());
    Ok(())
}

fn cmd_preset(args: PresetArgs) -> anyhow::Result<()> {
    let preset = Preset::from_name(&args.name)?;
    let layers = preset.layers_for_width(args.width.unwrap_or(MOBILE_BREAKPOINT_PX));
    let json = serde_json::to_string_pretty(&layers).context("serialize preset")?;
    println!("{json}");
    Ok(())
}

fn load_layers(path: &Path) -> anyhow::Result<Vec<ParticleConfig>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    let parsed: ConfigFile = serde_json::from_str(&text)
        .with_context(|| format!("parse config '{}'", path.display()))?;
    let layers = match parsed {
        ConfigFile::Many(layers) => layers,
        ConfigFile::One(layer) => vec![*layer],
    };
    for layer in &layers {
        layer
            .validate()
            .with_context(|| format!("invalid config '{}'", path.display()))?;
    }
    Ok(layers)
}

fn make_painter(surface: &Surface) -> anyhow::Result<CpuPainter> {
    let mut painter = CpuPainter::new(surface.width, surface.height)?;
    if let Some(hex) = &surface.background {
        painter = painter.with_background(Rgba8::from_hex(hex)?);
    }
    Ok(painter)
}

fn create_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("create output dir '{}'", dir.display()))
}

fn frame_name(index: u64) -> String {
    format!("frame_{index:05}.png")
}

fn write_png(path: &Path, frame: FrameRGBA) -> anyhow::Result<()> {
    let frame = frame.into_straight();
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), "frame written");
    Ok(())
}
