//! CLI binary for summariq-client.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ClientConfig`, submits one document or text, and prints the summary.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use summariq_client::{
    format_summary, write_summary, ClientConfig, ConnectivityState, ErrorKind, InputMode, Phase,
    RequestKind, SubmissionFailure, SubmissionObserver, SummarizerClient,
    SummaryResult,
};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI observer using indicatif ─────────────────────────────────────────────

/// Terminal observer: a single spinner whose message follows the
/// orchestrator's phase.
struct CliObserver {
    bar: ProgressBar,
}

impl CliObserver {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("SummarIQ");
        bar.set_message("Starting…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl SubmissionObserver for CliObserver {
    fn on_phase_change(&self, _from: Phase, to: Phase) {
        let msg = match to {
            Phase::Validating => "Validating input…",
            Phase::AwaitingConnectivity => "Checking backend…",
            Phase::Submitting => "Summarizing…",
            _ => return,
        };
        self.bar.set_message(msg);
    }

    fn on_request_start(&self, kind: RequestKind) {
        if kind == RequestKind::ConnectivityProbe {
            self.bar.set_message("Connecting to backend…");
        }
    }

    fn on_connectivity_change(&self, state: &ConnectivityState) {
        if state.is_available() {
            self.bar.println(format!("  {} Backend available", green("✓")));
        } else {
            let why = state
                .last_error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_default();
            self.bar
                .println(format!("  {} Backend unavailable  {}", red("✗"), dim(&why)));
        }
    }

    fn on_success(&self, result: &SummaryResult) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {}  {}",
            green("✔"),
            bold(&result.title),
            dim(&format!(
                "{} words, {:.2}s",
                result.word_count, result.processing_time_seconds
            )),
        );
    }

    fn on_failure(&self, _failure: &SubmissionFailure) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summarize a PDF (stdout)
  summariq report.pdf

  # With notes and a title, written to a file
  summariq report.pdf --notes "Focus on revenue" --title "Q3 report" -o q3.md

  # Summarize pasted text
  summariq --text "Long article text..."

  # Summarize text from stdin
  cat article.txt | summariq --text-file -

  # JSON output with metadata
  summariq --json report.pdf > summary.json

  # Service housekeeping
  summariq --health
  summariq --list
  summariq --history
  summariq --clear-history

LIMITS:
  Documents   PDF only, at most 10 MB
  Text        at most 5000 characters

ENVIRONMENT VARIABLES:
  SUMMARIQ_BASE_URL        Service root (default http://localhost:8000)
  SUMMARIQ_TIMEOUT         Summarize timeout in seconds (default 30)
  SUMMARIQ_PROBE_TIMEOUT   Connectivity probe timeout in seconds (default 5)
  RUST_LOG                 Override log filter (e.g. summariq_client=debug)
"#;

/// Summarize PDF documents and text with a SummarIQ service.
#[derive(Parser, Debug)]
#[command(
    name = "summariq",
    version,
    about = "Summarize PDF documents and text with a SummarIQ service",
    long_about = "Submit a PDF document or a block of text to a SummarIQ summarization \
service and print the titled summary. The backend is probed first; nothing is sent \
while it is unreachable.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF document to summarize.
    #[arg(conflicts_with_all = ["text", "text_file"])]
    file: Option<PathBuf>,

    /// Summarize this text instead of a document.
    #[arg(long, conflicts_with = "text_file")]
    text: Option<String>,

    /// Summarize text read from a file, or `-` for stdin.
    #[arg(long, value_name = "PATH")]
    text_file: Option<PathBuf>,

    /// Additional context for the summarizer.
    #[arg(long, env = "SUMMARIQ_NOTES")]
    notes: Option<String>,

    /// Title hint for the summary.
    #[arg(long)]
    title: Option<String>,

    /// Service root URL.
    #[arg(long, env = "SUMMARIQ_BASE_URL", default_value = "http://localhost:8000")]
    base_url: String,

    /// Summarize request timeout in seconds.
    #[arg(long, env = "SUMMARIQ_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// Connectivity probe timeout in seconds.
    #[arg(long, env = "SUMMARIQ_PROBE_TIMEOUT", default_value_t = 5)]
    probe_timeout: u64,

    /// Write the summary to this file instead of stdout.
    #[arg(short, long, env = "SUMMARIQ_OUTPUT")]
    output: Option<PathBuf>,

    /// Output structured JSON (SummaryResult) instead of text.
    #[arg(long, env = "SUMMARIQ_JSON")]
    json: bool,

    /// Query the service health endpoint and exit.
    #[arg(long)]
    health: bool,

    /// List summaries stored by the service and exit.
    #[arg(long)]
    list: bool,

    /// Print the service conversation history and exit.
    #[arg(long)]
    history: bool,

    /// Clear the service conversation history and exit.
    #[arg(long)]
    clear_history: bool,

    /// Disable the spinner.
    #[arg(long, env = "SUMMARIQ_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SUMMARIQ_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "SUMMARIQ_QUIET")]
    quiet: bool,
}

impl Cli {
    fn is_aux(&self) -> bool {
        self.health || self.list || self.history || self.clear_history
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner carries the user-facing feedback; library logs would
    // tear it, so only errors are shown while it runs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.is_aux();
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build client ─────────────────────────────────────────────────────
    let observer = show_progress.then(CliObserver::new);
    let mut builder = ClientConfig::builder()
        .base_url(&cli.base_url)
        .summarize_timeout_secs(cli.timeout)
        .probe_timeout_secs(cli.probe_timeout);
    if let Some(ref o) = observer {
        builder = builder.observer(Arc::clone(o) as Arc<dyn SubmissionObserver>);
    }
    let config = builder.build().context("Invalid configuration")?;
    let client = SummarizerClient::new(config).context("Failed to create client")?;

    // ── Auxiliary modes ──────────────────────────────────────────────────
    if cli.is_aux() {
        return run_aux(&cli, &client).await;
    }

    // ── Collect input ────────────────────────────────────────────────────
    let mut input = client.new_input();
    if let Some(text) = read_text(&cli).await? {
        input.set_mode(InputMode::PasteText);
        input.set_text(text).context("Invalid text")?;
    } else if let Some(ref path) = cli.file {
        input
            .select_document_path(path)
            .await
            .with_context(|| format!("Cannot use {}", path.display()))?;
    }
    if let Some(ref notes) = cli.notes {
        input.set_notes(notes.as_str()).context("Invalid notes")?;
    }
    input.set_title(cli.title.clone());

    // ── Probe and submit ─────────────────────────────────────────────────
    client.start().await;

    let result = match client.submit(&input).await.into_result() {
        Some(Ok(result)) => result,
        Some(Err(failure)) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&failure)?);
            }
            print_hint(&failure, &cli.base_url);
            bail!("{}", failure.message());
        }
        None => bail!("A submission is already in progress"),
    };

    // ── Output ───────────────────────────────────────────────────────────
    let rendered = if cli.json {
        serde_json::to_string_pretty(&result).context("Failed to serialise summary")?
    } else {
        format_summary(&result)
    };

    if let Some(ref output_path) = cli.output {
        write_summary(output_path, &rendered)
            .await
            .context("Failed to save summary")?;
        if !cli.quiet {
            eprintln!(
                "{}  {}",
                green("✔"),
                bold(&format!("Saved to {}", output_path.display()))
            );
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(rendered.as_bytes())
            .context("Failed to write to stdout")?;
        if !rendered.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if !cli.quiet && !show_progress && !cli.json {
        eprintln!(
            "Summarized in {:.2}s, {} words",
            result.processing_time_seconds, result.word_count
        );
    }

    Ok(())
}

/// Text from `--text`, or from `--text-file` (`-` reads stdin).
async fn read_text(cli: &Cli) -> Result<Option<String>> {
    if let Some(ref text) = cli.text {
        return Ok(Some(text.clone()));
    }
    let Some(ref path) = cli.text_file else {
        return Ok(None);
    };
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read text from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read text from {:?}", path))?
    };
    Ok(Some(text))
}

fn print_hint(failure: &SubmissionFailure, base_url: &str) {
    if failure.kind == ErrorKind::BackendUnavailable {
        eprintln!(
            "{} check that the service is running at {} and retry (or run `summariq --health`)",
            cyan("hint:"),
            base_url
        );
    }
}

async fn run_aux(cli: &Cli, client: &SummarizerClient) -> Result<()> {
    if cli.health {
        let health = client.health().await.context("Health check failed")?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&health)?);
        } else {
            let mark = if health.is_healthy() { green("✔") } else { red("✘") };
            println!(
                "{} {}  {}",
                mark,
                bold(&health.status),
                dim(health.message.as_deref().unwrap_or(""))
            );
        }
    } else if cli.list {
        let records = client
            .list_summaries()
            .await
            .context("Failed to list summaries")?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&records)?);
        } else if records.is_empty() {
            println!("No stored summaries");
        } else {
            let now = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs_f64())
                .unwrap_or_default();
            for r in &records {
                println!(
                    "{}  {}  {}",
                    bold(&r.filename),
                    dim(&format!("{} bytes", r.size)),
                    dim(&format_age(now - r.created_at))
                );
            }
        }
    } else if cli.history {
        let history = client.history().await.context("Failed to fetch history")?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&history)?);
        } else {
            for entry in &history {
                println!("{} {}", cyan(&format!("{}:", entry.role)), entry.content);
            }
        }
    } else if cli.clear_history {
        let message = client
            .clear_history()
            .await
            .context("Failed to clear history")?;
        if !cli.quiet {
            println!("{} {}", green("✔"), message);
        }
    }
    Ok(())
}

fn format_age(seconds: f64) -> String {
    let secs = seconds.max(0.0) as u64;
    match secs {
        0..=59 => "just now".to_string(),
        60..=3599 => format!("{}m ago", secs / 60),
        3600..=86_399 => format!("{}h ago", secs / 3600),
        _ => format!("{}d ago", secs / 86_400),
    }
}
