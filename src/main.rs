use anyhow::bail;
use anyhow::Context;
use clap::Parser;
use sheetcast::config::Config;
use sheetcast::feed::generate;
use sheetcast::feed::EnclosureLength;
use sheetcast::feed::FixedLength;
use sheetcast::feed::HttpLengthProbe;
use sheetcast::feed::StatusChannel;
use sheetcast::source::FileSource;
use sheetcast::source::SpreadsheetSource;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "sheetcast", version, about = "Builds a podcast RSS feed from a spreadsheet media log")]
struct Cli {
    /// Report progress on stderr while writing the feed to stdout.
    #[arg(short, long)]
    verbose: bool,

    /// Spreadsheet holding the media log: a name, a workbook path or a download URL.
    #[arg(short, long, value_name = "SPREADSHEET")]
    message_log: Option<String>,

    /// Worksheet of the media log.
    #[arg(short, long, value_name = "NAME")]
    worksheet: Option<String>,

    /// Maximum number of entries in the feed.
    #[arg(short, long, value_name = "COUNT")]
    length: Option<usize>,

    /// Only include entries recorded on this day of the week (repeatable).
    #[arg(short, long = "day", value_name = "WEEKDAY")]
    days: Vec<String>,

    /// Write the feed to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Directory spreadsheet names are resolved against.
    #[arg(long, value_name = "DIR")]
    source: Option<PathBuf>,

    /// Configuration file layered over the built-in defaults.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use the default enclosure length instead of asking the media host.
    #[arg(long)]
    no_probe: bool,

    /// Print the worksheet as a table and exit.
    #[arg(long)]
    dump: bool,
}

impl Cli {
    /// Command-line options win over the configuration file.
    fn apply(&self, config: &mut Config) {
        if let Some(spreadsheet) = &self.message_log {
            config.source.spreadsheet = spreadsheet.to_owned();
        }
        if let Some(worksheet) = &self.worksheet {
            config.source.worksheet = worksheet.to_owned();
        }
        if let Some(length) = self.length {
            config.selection.max_entries = length;
        }
        if !self.days.is_empty() {
            config.selection.weekdays = self.days.clone();
        }
        if let Some(root) = &self.source {
            config.source.root = root.to_owned();
        }
        if self.no_probe {
            config.enclosure.probe = false;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(if cli.verbose { "debug" } else { "warn" })),
        )
        .init();

    let mut config = Config::load(cli.config.as_deref()).context("Cannot load configuration")?;
    cli.apply(&mut config);

    if let Some(out) = &cli.out {
        let parent = out.parent().filter(|parent| !parent.as_os_str().is_empty()).unwrap_or(Path::new("."));
        if !parent.is_dir() {
            bail!("Output directory '{}' does not exist", parent.display());
        }
    }

    let source = FileSource::new(&config.source.root)
        .with_timeout(Duration::from_secs(config.source.timeout_secs));

    if cli.dump {
        let worksheet = source.fetch_worksheet(&config.source.spreadsheet, &config.source.worksheet)?;
        let mut stdout = std::io::stdout().lock();
        worksheet.describe(&worksheet.rows(), &mut stdout)?;
        return Ok(());
    }

    let lookup: Box<dyn EnclosureLength> = if config.enclosure.probe {
        Box::new(HttpLengthProbe::new(Duration::from_secs(config.enclosure.probe_timeout_secs)))
    } else {
        Box::new(FixedLength(config.enclosure.default_length))
    };

    // The feed is staged in memory and only reaches its destination complete.
    let mut document = Vec::new();
    let report = match &cli.out {
        Some(path) => {
            let mut stdout = std::io::stdout();
            let report = generate(&source, &config, lookup.as_ref(), StatusChannel::new(&mut stdout), &mut document)?;
            std::fs::write(path, &document).with_context(|| format!("Cannot write '{}'", path.display()))?;
            report
        }
        None => {
            let mut stderr = std::io::stderr();
            let status = if cli.verbose { StatusChannel::new(&mut stderr) } else { StatusChannel::silent() };
            let report = generate(&source, &config, lookup.as_ref(), status, &mut document)?;
            std::io::stdout().write_all(&document)?;
            report
        }
    };

    tracing::debug!(entries = report.entries, diagnostics = report.diagnostics.len(), "feed written");
    Ok(())
}
