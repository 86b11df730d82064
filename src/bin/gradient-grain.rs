use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use gradient_grain::{
    Design, Editor, EditorSettings, ExportFormat, NoopScheduler, PaletteTheme, Resolution,
    StopList, palette::pastel_stop,
};
use rand::{SeedableRng, rngs::StdRng};

#[derive(Parser, Debug)]
#[command(name = "gradient-grain", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a design at export resolution and write PNG or JPEG.
    Export(ExportArgs),
    /// Render the on-screen preview (optionally with handles) as a PNG.
    Preview(PreviewArgs),
    /// Write a new design with a randomized palette.
    Randomize(RandomizeArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input design JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory; the file name is derived from the size and format.
    #[arg(long)]
    out: PathBuf,

    /// Named resolution (hd, fullhd, 4k). Ignored when --width/--height are set.
    #[arg(long, conflicts_with_all = ["width", "height"])]
    resolution: Option<Resolution>,

    /// Explicit output width in pixels.
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Explicit output height in pixels.
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// png or jpeg.
    #[arg(long, default_value = "png")]
    format: ExportFormat,

    /// Optional editor settings JSON.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Grain RNG seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input design JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Draw stop handles.
    #[arg(long)]
    handles: bool,

    /// Stop index to draw with the hover glow.
    #[arg(long)]
    hover: Option<usize>,

    /// Optional editor settings JSON.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Grain RNG seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct RandomizeArgs {
    /// pastel, vibrant, earthy, neon or monochrome.
    #[arg(long, default_value = "pastel")]
    theme: PaletteTheme,

    /// Number of stops, at least 2.
    #[arg(long, default_value_t = 3)]
    stops: usize,

    #[arg(long)]
    seed: Option<u64>,

    /// Output design JSON path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    gradient_grain::logging::init_logging();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Randomize(args) => cmd_randomize(args),
    }
}

fn read_design(path: &Path) -> anyhow::Result<Design> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("open design '{}'", path.display()))?;
    let design = Design::from_json_str(&text).with_context(|| "parse design JSON")?;
    Ok(design)
}

fn read_settings(path: Option<&Path>) -> anyhow::Result<EditorSettings> {
    match path {
        Some(p) => Ok(EditorSettings::load(p)?),
        None => Ok(EditorSettings::default()),
    }
}

fn make_editor(
    design: Design,
    settings: EditorSettings,
    seed: Option<u64>,
) -> anyhow::Result<Editor> {
    let editor = Editor::with_design(design, settings, Box::new(NoopScheduler))?;
    Ok(match seed {
        Some(s) => editor.with_seed(s),
        None => editor,
    })
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let design = read_design(&args.in_path)?;
    let settings = read_settings(args.settings.as_deref())?;
    let mut editor = make_editor(design, settings, args.seed)?;

    let image = match (args.width, args.height) {
        (Some(w), Some(h)) => editor.export_image(w, h, args.format)?,
        _ => editor.export_preset(args.resolution.unwrap_or(Resolution::FullHd), args.format)?,
    };
    let path = image.write_to_dir(&args.out)?;
    tracing::info!(
        width = image.width,
        height = image.height,
        bytes = image.bytes.len(),
        "exported"
    );
    println!("{}", path.display());
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let design = read_design(&args.in_path)?;
    let settings = read_settings(args.settings.as_deref())?;
    let mut editor = make_editor(design, settings, args.seed)?;

    let layers = editor.render(editor.dims(), editor.noise(), args.handles, args.hover)?;
    if !layers.skipped.is_empty() {
        eprintln!("skipped stops with invalid colors: {:?}", layers.skipped);
    }
    let merged = layers.into_merged()?;
    let bytes = gradient_grain::encode(merged, ExportFormat::Png, 100)?;
    std::fs::write(&args.out, bytes)
        .with_context(|| format!("write preview '{}'", args.out.display()))?;
    println!("{}", args.out.display());
    Ok(())
}

fn cmd_randomize(args: RandomizeArgs) -> anyhow::Result<()> {
    if args.stops < 2 {
        anyhow::bail!("--stops must be at least 2, got {}", args.stops);
    }
    let mut rng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let mut current = StopList::pastel_default();
    while current.len() < args.stops {
        current.push(pastel_stop(&mut rng))?;
    }
    let stops = gradient_grain::randomize_palette(&current, args.theme, &mut rng);
    let stops = StopList::new(stops.as_slice().iter().take(args.stops).cloned().collect())?;

    let design = Design {
        stops,
        ..Design::default()
    };
    std::fs::write(&args.out, design.to_json_string()?)
        .with_context(|| format!("write design '{}'", args.out.display()))?;
    println!("{}", args.out.display());
    Ok(())
}
