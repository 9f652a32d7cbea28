use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "distortion", version)]
struct Cli {
    /// Raise log verbosity (`-v` debug, `-vv` trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render a scene as a numbered PNG sequence.
    Frames(FramesArgs),
    /// Print the pillow outline as SVG path data.
    Path(PathArgs),
    /// Write the built-in demo scene as JSON.
    Scene(SceneArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON (defaults to the built-in demo).
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Frame index (0-based).
    #[arg(long, conflicts_with = "time_secs")]
    frame: Option<u64>,

    /// Stage time in seconds; the last frame at or before it is rendered.
    #[arg(long)]
    time_secs: Option<f64>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Input scene JSON (defaults to the built-in demo).
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Output directory for `frame_NNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Only write every n-th frame.
    #[arg(long, default_value_t = 1)]
    every: u64,
}

#[derive(Parser, Debug)]
struct PathArgs {
    #[arg(long)]
    width: f64,

    #[arg(long)]
    height: f64,

    /// Distortion amount (0 is a plain rectangle).
    #[arg(long, default_value_t = 1.0)]
    distortion: f64,
}

#[derive(Parser, Debug)]
struct SceneArgs {
    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Path(args) => cmd_path(args),
        Command::Scene(args) => cmd_scene(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_scene(path: Option<&Path>) -> anyhow::Result<distortion::SceneSpec> {
    let scene = match path {
        Some(p) => distortion::SceneSpec::from_path(p)
            .with_context(|| format!("load scene '{}'", p.display()))?,
        None => distortion::SceneSpec::demo(),
    };
    scene.validate()?;
    Ok(scene)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = load_scene(args.scene.as_deref())?;
    let mut stage = distortion::Stage::from_scene(&scene)?;
    let frame = match (args.frame, args.time_secs) {
        (Some(f), _) => distortion::FrameIndex(f),
        (None, Some(t)) => {
            anyhow::ensure!(t.is_finite() && t >= 0.0, "--time-secs must be finite and >= 0");
            stage.clock().frame_at(t)
        }
        (None, None) => distortion::FrameIndex(0),
    };

    let mut rasterizer = distortion::CpuRasterizer::new();
    let rgba = stage.render_frame(frame, &mut rasterizer)?;
    write_png(&args.out, rgba)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.every > 0, "--every must be > 0");
    let scene = load_scene(args.scene.as_deref())?;
    let mut stage = distortion::Stage::from_scene(&scene)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let range = distortion::FrameRange::new(
        distortion::FrameIndex(0),
        distortion::FrameIndex(scene.duration_frames()),
    )?;
    let mut written = 0u64;
    let mut rasterizer = distortion::CpuRasterizer::new();
    stage.render_frames(range, &mut rasterizer, |frame, rgba| {
        if frame.0 % args.every != 0 {
            return Ok(());
        }
        let path = args.out_dir.join(format!("frame_{:05}.png", frame.0));
        write_png(&path, rgba)?;
        written += 1;
        Ok(())
    })?;

    eprintln!("wrote {written} frames to {}", args.out_dir.display());
    Ok(())
}

fn cmd_path(args: PathArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.width.is_finite() && args.height.is_finite() && args.width > 0.0 && args.height > 0.0,
        "--width/--height must be finite and > 0"
    );
    anyhow::ensure!(args.distortion.is_finite(), "--distortion must be finite");
    let path = distortion::ShapeRenderer::pillow_path(
        distortion::Size::new(args.width, args.height),
        args.distortion,
    );
    println!("{}", path.to_svg());
    Ok(())
}

fn cmd_scene(args: SceneArgs) -> anyhow::Result<()> {
    let json = distortion::SceneSpec::demo().to_json_pretty()?;
    match args.out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(&out, json + "\n")
                .with_context(|| format!("write scene '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn write_png(path: &Path, mut rgba: distortion::FrameRGBA) -> distortion::DistortionResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            distortion::DistortionError::render(format!(
                "create output dir '{}': {e}",
                parent.display()
            ))
        })?;
    }
    rgba.unpremultiply();
    image::save_buffer_with_format(
        path,
        &rgba.data,
        rgba.width,
        rgba.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| distortion::DistortionError::render(format!("write png '{}': {e}", path.display())))
}
