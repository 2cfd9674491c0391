use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Environment variable naming a replacement caption font file.
const FONT_ENV: &str = "PHOTO_CAPTION_FONT";

#[derive(Parser, Debug)]
#[command(name = "photo-caption", version)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Compositor options JSON.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Burn a caption onto a photo and write the JPEG.
    Compose(ComposeArgs),
    /// Shrink, caption and store a photo; prints the stored URL and id as JSON.
    Publish(PublishArgs),
    /// Print how caption text wraps on a photo of the given size.
    Wrap(WrapArgs),
}

#[derive(Args, Debug)]
struct CaptionArgs {
    /// Date line.
    #[arg(long)]
    date: Option<String>,
    /// Activity line ("-" when empty).
    #[arg(long)]
    activity: Option<String>,
    /// Location line.
    #[arg(long)]
    location: Option<String>,
    /// Time line.
    #[arg(long)]
    time: Option<String>,

    /// Caption color: #rgb, #rrggbb, #rrggbbaa or a name.
    #[arg(long, default_value = "white")]
    color: photo_caption::CaptionColor,

    /// Re-encode the photo without a caption.
    #[arg(long, default_value_t = false)]
    no_caption: bool,
}

impl CaptionArgs {
    fn lines(&self) -> [String; 4] {
        photo_caption::CaptionFields {
            date: self.date.clone(),
            activity: self.activity.clone(),
            location: self.location.clone(),
            time: self.time.clone(),
        }
        .lines()
    }
}

#[derive(Args, Debug)]
struct ComposeArgs {
    /// Input photo.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    caption: CaptionArgs,
}

#[derive(Args, Debug)]
struct PublishArgs {
    /// Input photo.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Store root directory.
    #[arg(long)]
    store: PathBuf,

    /// Destination folder inside the store.
    #[arg(long, conflicts_with = "month")]
    folder: Option<String>,

    /// Monthly activity folder as YYYY-MM (e.g. 2025-08 -> kegiatan/agustus-2025).
    #[arg(long)]
    month: Option<String>,

    /// Longest edge before captioning.
    #[arg(long, default_value_t = 1280)]
    max_edge: u32,

    /// Byte budget for the shrunk photo.
    #[arg(long, default_value_t = 200 * 1024)]
    max_bytes: usize,

    #[command(flatten)]
    caption: CaptionArgs,
}

#[derive(Args, Debug)]
struct WrapArgs {
    /// Photo width in pixels.
    #[arg(long)]
    width: u32,

    /// Photo height in pixels.
    #[arg(long)]
    height: u32,

    /// Caption line; repeat for several lines.
    #[arg(long = "text", required = true)]
    text: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let compositor = build_compositor(cli.config.as_deref())?;
    match cli.cmd {
        Command::Compose(args) => cmd_compose(&compositor, args),
        Command::Publish(args) => cmd_publish(&compositor, args),
        Command::Wrap(args) => cmd_wrap(&compositor, args),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_compositor(config: Option<&Path>) -> anyhow::Result<photo_caption::Compositor> {
    let opts = match config {
        Some(path) => photo_caption::CompositorOpts::from_path(path)?,
        None => photo_caption::CompositorOpts::default(),
    }
    .with_env_overrides();

    let compositor = match std::env::var_os(FONT_ENV) {
        Some(font) => {
            let face = photo_caption::FontFace::from_path(&font)
                .with_context(|| format!("load {FONT_ENV} font '{}'", Path::new(&font).display()))?;
            photo_caption::Compositor::with_face(opts, face)?
        }
        None => photo_caption::Compositor::new(opts)?,
    };
    Ok(compositor)
}

fn read_photo(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read photo '{}'", path.display()))
}

fn cmd_compose(compositor: &photo_caption::Compositor, args: ComposeArgs) -> anyhow::Result<()> {
    let photo = read_photo(&args.in_path)?;
    let out = compositor.composite(
        &photo,
        &args.caption.lines(),
        args.caption.color,
        !args.caption.no_caption,
    )?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &out.bytes)
        .with_context(|| format!("write jpeg '{}'", args.out.display()))?;
    out.preview.release();

    eprintln!("wrote {} ({}x{})", args.out.display(), out.width, out.height);
    Ok(())
}

fn cmd_publish(compositor: &photo_caption::Compositor, args: PublishArgs) -> anyhow::Result<()> {
    let folder = match (&args.folder, &args.month) {
        (Some(folder), _) => folder.clone(),
        (None, Some(month)) => month_folder(month)?,
        (None, None) => anyhow::bail!("either --folder or --month is required"),
    };

    let photo = read_photo(&args.in_path)?;
    let shrunk = photo_caption::shrink_for_upload(
        &photo,
        &photo_caption::ShrinkOpts {
            max_edge: args.max_edge,
            max_bytes: args.max_bytes,
            ..photo_caption::ShrinkOpts::default()
        },
    )?;
    if !shrunk.within_budget {
        tracing::warn!(
            len = shrunk.bytes.len(),
            max_bytes = args.max_bytes,
            "photo still over budget at lowest quality"
        );
    }

    let out = compositor.composite(
        &shrunk.bytes,
        &args.caption.lines(),
        args.caption.color,
        !args.caption.no_caption,
    )?;

    let uploader = photo_caption::DirectoryUploader::new(&args.store)?;
    let stored = photo_caption::Uploader::upload(&uploader, &out.bytes, &folder)?;
    out.preview.release();

    println!(
        "{}",
        serde_json::to_string(&stored).context("serialize stored photo")?
    );
    Ok(())
}

fn month_folder(month: &str) -> anyhow::Result<String> {
    let (y, m) = month
        .split_once('-')
        .with_context(|| format!("--month '{month}' is not YYYY-MM"))?;
    let year: i32 = y
        .parse()
        .with_context(|| format!("--month '{month}' has an invalid year"))?;
    let month: u32 = m
        .parse()
        .with_context(|| format!("--month '{month}' has an invalid month"))?;
    Ok(photo_caption::activity_folder(year, month)?)
}

fn cmd_wrap(compositor: &photo_caption::Compositor, args: WrapArgs) -> anyhow::Result<()> {
    let Some(plan) = compositor.plan(args.width, args.height, &args.text)? else {
        return Ok(());
    };
    for line in &plan.lines {
        println!("{line}");
    }
    eprintln!(
        "{} line(s), font {}px, max width {}px, {:?} (canvas {}x{})",
        plan.lines.len(),
        plan.metrics.font_size,
        plan.max_text_width,
        plan.placement,
        plan.width,
        plan.canvas_height
    );
    Ok(())
}
