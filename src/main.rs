use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::debug;

use shiplabel::symbols::QrSize;
use shiplabel::{
    CashlessBanner, Confirm, ExportFormat, FileExport, LabelEditor, LabelField, LabelRecord,
    PrintTarget, RenderConfig, ResetOutcome,
};

/// Shiplabel - render 100mm x 100mm shipping labels
#[derive(Parser, Debug)]
#[command(name = "shiplabel")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a label to an SVG or PNG file
    #[command(alias = "r")]
    Render(RenderArgs),

    /// Print every visible line of the label as text
    Snapshot(RecordArgs),

    /// List field identifiers with their default values
    Fields,

    /// Restore a record file to the default label, after confirmation
    Reset(ResetArgs),
}

/// Where the record comes from
#[derive(Parser, Debug)]
struct RecordArgs {
    /// JSON record; missing fields take default values
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Field assignment such as senderCity="KOTA MALANG" (repeatable)
    #[arg(short, long = "set", value_name = "FIELD=VALUE")]
    set: Vec<String>,

    /// Hide the cashless banner text when isCashless is false
    #[arg(long)]
    follow_cashless: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    record: RecordArgs,

    /// Output file
    #[arg(short, long)]
    out: PathBuf,

    /// Output format (defaults to the output file extension)
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Raster resolution for PNG output
    #[arg(long, default_value_t = 203)]
    dpi: u32,

    /// QR bitmap size
    #[arg(long, value_enum, default_value_t = QrSizeArg::Standard)]
    qr_size: QrSizeArg,
}

#[derive(Parser, Debug)]
struct ResetArgs {
    /// Record file to rewrite
    #[arg(short, long)]
    input: PathBuf,

    /// Answer yes without prompting
    #[arg(short = 'y', long)]
    yes: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Svg,
    Png,
}

impl From<FormatArg> for ExportFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Svg => ExportFormat::Svg,
            FormatArg::Png => ExportFormat::Png,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum QrSizeArg {
    /// 50px
    Compact,
    /// 65px
    Standard,
}

impl From<QrSizeArg> for QrSize {
    fn from(s: QrSizeArg) -> Self {
        match s {
            QrSizeArg::Compact => QrSize::Compact,
            QrSizeArg::Standard => QrSize::Standard,
        }
    }
}

/// Asks on stdin; anything but y/yes counts as no
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(_) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

fn read_record(path: &Path) -> Result<LabelRecord> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    let record = serde_json::from_str(&raw).with_context(|| format!("parsing {:?}", path))?;
    Ok(record)
}

fn load_editor(args: &RecordArgs) -> Result<LabelEditor> {
    let record = match &args.input {
        Some(path) => read_record(path)?,
        None => LabelRecord::default(),
    };
    let mut editor = LabelEditor::with_record(record);
    for assignment in &args.set {
        editor
            .assign(assignment)
            .with_context(|| format!("applying --set {}", assignment))?;
    }
    Ok(editor)
}

fn cashless_mode(args: &RecordArgs) -> CashlessBanner {
    if args.follow_cashless {
        CashlessBanner::FollowRecord
    } else {
        CashlessBanner::Always
    }
}

fn run_render(args: RenderArgs) -> Result<()> {
    let mut editor = load_editor(&args.record)?;
    let mut config = RenderConfig {
        dpi: args.dpi,
        cashless_banner: cashless_mode(&args.record),
        ..Default::default()
    };
    config.symbols.qr.size = args.qr_size.into();

    let target = match args.format {
        Some(f) => FileExport::new(&args.out, f.into()),
        None => FileExport::for_path(&args.out)?,
    };
    if target.format() == ExportFormat::Png && !cfg!(feature = "raster") {
        bail!("this build has no rasterizer; write .svg instead");
    }
    debug!("rendering revision {} to {:?}", editor.revision(), target.path());

    let label = editor.render(&config);
    target.print(&label)?;
    println!("{}", target.path().display());
    Ok(())
}

fn run_snapshot(args: RecordArgs) -> Result<()> {
    let mut editor = load_editor(&args)?;
    let config = RenderConfig {
        cashless_banner: cashless_mode(&args),
        ..Default::default()
    };
    let snapshot = editor.render(&config).text_snapshot();
    print!("{}", snapshot.text);
    Ok(())
}

fn run_fields() -> Result<()> {
    let defaults = LabelRecord::default();
    for field in LabelField::ALL {
        println!("{:<18} {}", field.name(), defaults.get(field).to_string().escape_debug());
    }
    Ok(())
}

fn run_reset(args: ResetArgs) -> Result<()> {
    let record = if args.input.exists() {
        read_record(&args.input)?
    } else {
        LabelRecord::default()
    };
    let mut editor = LabelEditor::with_record(record);
    let outcome = if args.yes {
        editor.reset(&shiplabel::FixedAnswer(true))
    } else {
        editor.reset(&StdinConfirm)
    };
    match outcome {
        ResetOutcome::Restored => {
            let json = serde_json::to_string_pretty(editor.record())?;
            fs::write(&args.input, json + "\n")
                .with_context(|| format!("writing {:?}", args.input))?;
            println!("reset {}", args.input.display());
        }
        ResetOutcome::Declined => println!("unchanged"),
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => run_render(args),
        Commands::Snapshot(args) => run_snapshot(args),
        Commands::Fields => run_fields(),
        Commands::Reset(args) => run_reset(args),
    }
}
