use anyhow::Result;
use clap::Parser;
use console::style;
use log::error;
use media_info::component::{MediaInfoReporter, RunSummary};
use media_info::config::{FrameTokenPolicy, InfoSettings, SETTINGS_FILE, SequenceMode};
use media_info::init;
use media_info::signal::setup_shutdown_signal;
use media_info::tools::FfprobeIntrospector;
use rust_i18n::t;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en-US");

/// Display information about images, image sequences and movies.
///
/// Example output:
///
///   yesterdayview.mov          640x424:1.51 RGB U8 00:02:00:01@12
///   dlad.dpx                        2048x1556:1.32 RGB U10
///   render####.exr                              00:00:41:16@24
///       0: A,B,G,R                       720x480:1.50 RGBA F16
///       1: Ambient                        720x480:1.50 RGB F16
#[derive(Parser)]
#[command(name = "media_info", version, verbatim_doc_comment)]
struct Cli {
    /// Images, image sequences or directories
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Don't show image information, only file names
    #[arg(short = 'x', long = "x-info")]
    x_info: bool,

    /// Show verbose image information
    #[arg(short, long)]
    verbose: bool,

    /// Show file path names
    #[arg(short = 'f', long)]
    file_path: bool,

    /// File sequencing mode
    #[arg(short = 'q', long = "seq", value_enum)]
    sequence: Option<SequenceMode>,

    /// Which digit run of a file name holds the frame number
    #[arg(long, value_enum)]
    frame_token: Option<FrameTokenPolicy>,

    /// Descend into sub-directories
    #[arg(short, long)]
    recurse: bool,

    /// Number of columns for formatting output; zero disables formatting
    #[arg(short, long, allow_negative_numbers = true)]
    columns: Option<i64>,

    /// Print the structured reports as JSON
    #[arg(long)]
    json: bool,

    /// Settings file
    #[arg(long, default_value = SETTINGS_FILE)]
    settings: PathBuf,
}

impl Cli {
    /// 命令列參數覆寫設定檔
    fn apply(&self, settings: &mut InfoSettings) {
        settings.x_info |= self.x_info;
        settings.verbose |= self.verbose;
        settings.file_path |= self.file_path;
        settings.recurse |= self.recurse;
        if let Some(sequence) = self.sequence {
            settings.sequence = sequence;
        }
        if let Some(frame_token) = self.frame_token {
            settings.frame_token = frame_token;
        }
        if self.columns.is_some() {
            settings.columns = self.columns;
        }
    }
}

fn main() -> ExitCode {
    init::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            error!("Program error: {e:#}");
            eprintln!("{} {e:#}", style(t!("error_prefix")).red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<RunSummary> {
    let mut settings = InfoSettings::load_from(&cli.settings)?;
    cli.apply(&mut settings);
    rust_i18n::set_locale(settings.language.as_str());

    let shutdown_signal = setup_shutdown_signal()?;
    let introspector = FfprobeIntrospector::default();
    let reporter = MediaInfoReporter::new(settings, &introspector, shutdown_signal);

    let mut out = io::stdout().lock();
    let summary = reporter.run(&cli.inputs, cli.json, &mut out)?;

    for reason in &summary.rejected {
        eprintln!(
            "{} {}",
            style(t!("error_prefix")).red().bold(),
            t!("batch_rejected", reason = reason)
        );
    }
    if summary.failed > 0 {
        eprintln!("{}", style(t!("failed_summary", count = summary.failed)).yellow());
    }
    if summary.interrupted {
        eprintln!("{}", style(t!("interrupted")).yellow());
    }

    Ok(summary)
}
