use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use pixelsmith::image_store::save_png;
use pixelsmith::palette::Palette;
use pixelsmith::{Document, Editor, EditorConfig};

#[derive(Parser, Debug)]
#[command(name = "pixelsmith", version)]
struct Cli {
    /// Editor config JSON; defaults apply to anything it leaves out.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a saved document and write it as a PNG.
    Render(RenderArgs),
    /// Convert a palette between JSON and GIMP `.gpl`.
    Palette(PaletteArgs),
    /// Write an empty document.
    New(NewArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input document JSON.
    input: PathBuf,

    /// Output PNG path.
    #[arg(short, long)]
    out: PathBuf,

    /// Screen pixels per cell.
    #[arg(long, default_value_t = 1)]
    scale: u32,
}

#[derive(Parser, Debug)]
struct PaletteArgs {
    /// Palette to read (`.json` or `.gpl`).
    input: PathBuf,

    /// Palette to write; the format follows the extension.
    #[arg(short, long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct NewArgs {
    /// Output document JSON.
    #[arg(short, long)]
    out: PathBuf,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("read config '{}'", path.display()))?,
        None => EditorConfig::default(),
    };

    match cli.cmd {
        Command::Render(args) => cmd_render(args, config),
        Command::Palette(args) => cmd_palette(args),
        Command::New(args) => cmd_new(args, config),
    }
}

fn cmd_render(args: RenderArgs, config: EditorConfig) -> anyhow::Result<()> {
    let document = Document::load(&args.input)
        .with_context(|| format!("read document '{}'", args.input.display()))?;
    let editor = Editor::from_document(document, config)?;

    save_png(&editor.composite(), &args.out, args.scale)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_palette(args: PaletteArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("read palette '{}'", args.input.display()))?;

    let palette = match extension(&args.input).as_deref() {
        Some("gpl") => Palette::from_gpl(&text),
        Some("json") => Palette::from_json(&text),
        _ => bail!("unknown palette format: '{}'", args.input.display()),
    };
    let Some(palette) = palette else {
        bail!("no palette found in '{}'", args.input.display());
    };

    let output = match extension(&args.out).as_deref() {
        Some("gpl") => palette.to_gpl(),
        Some("json") => palette.to_json()?,
        _ => bail!("unknown palette format: '{}'", args.out.display()),
    };
    std::fs::write(&args.out, output)
        .with_context(|| format!("write palette '{}'", args.out.display()))?;
    eprintln!("wrote {} ({} colors)", args.out.display(), palette.colors.len());
    Ok(())
}

fn cmd_new(args: NewArgs, config: EditorConfig) -> anyhow::Result<()> {
    let width = args.width.unwrap_or(config.default_width);
    let height = args.height.unwrap_or(config.default_height);
    if width == 0 || height == 0 {
        bail!("canvas must be at least 1x1, got {width}x{height}");
    }

    let editor = Editor::with_size(width, height, config);
    editor
        .to_document()
        .save(&args.out)
        .with_context(|| format!("write document '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}
