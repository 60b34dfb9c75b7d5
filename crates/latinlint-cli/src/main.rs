use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use latinlint_core::{
    run_lint, Discovery, FileList, GitHubPullRequest, LintConfig, LintOptions, LintOutcome, Report, DEFAULT_CONFIG_FILE,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

/// Command-line entry point
#[derive(Parser, Debug)]
#[command(name = "latinlint", version, about = "Check documentation for Latin abbreviations")]
struct Cli {
    /// Lint only the files changed by this GitHub pull request number
    #[arg(long, conflicts_with = "changed_files")]
    pull_request: Option<String>,

    /// Lint only the paths listed in this file, one per line ("-" = stdin)
    #[arg(long)]
    changed_files: Option<String>,

    /// Directory walked when no change is given (overrides the config file)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Repository root that changed-file paths are relative to
    #[arg(long, default_value = ".")]
    base: PathBuf,

    /// Config file (TOML); defaults to ./latinlint.toml when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disallowed phrase; repeat to replace the configured list
    #[arg(long = "pattern", value_name = "PHRASE")]
    patterns: Vec<String>,

    /// Worker threads ("auto" = CPU cores)
    #[arg(long, default_value = "1", value_parser = parse_threads)]
    threads: Threads,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let outcome = match lint(&cli) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(2);
        }
    };

    match &outcome {
        LintOutcome::Passed => {}
        LintOutcome::Violations(report) => {
            if let Err(e) = print_report(report, cli.format) {
                eprintln!("error: {e:#}");
                return ExitCode::from(2);
            }
        }
        LintOutcome::Failed(e) => eprintln!("error: {e}"),
    }
    outcome.exit_code()
}

/// Set up configuration and discovery, then run. Errors here are CLI setup
/// problems; failures inside the run come back as `LintOutcome::Failed`.
fn lint(cli: &Cli) -> Result<LintOutcome> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(root) = &cli.root {
        config.root = root.clone();
    }
    if !cli.patterns.is_empty() {
        config.patterns = cli.patterns.clone();
    }
    let opts = LintOptions { threads: cli.threads.0 };

    let github;
    let discovery = if let Some(pr) = &cli.pull_request {
        info!(pull_request = %pr, "linting pull request files");
        github = match GitHubPullRequest::from_config(&config.github) {
            Ok(gh) => gh,
            Err(e) => return Ok(LintOutcome::Failed(e.into())),
        };
        Discovery::Changed { provider: &github, change_id: pr.clone(), base: cli.base.clone() }
    } else if let Some(list) = &cli.changed_files {
        info!(list = %list, "linting listed files");
        Discovery::Changed { provider: &FileList, change_id: list.clone(), base: cli.base.clone() }
    } else {
        info!(root = ?config.root, "linting directory tree");
        Discovery::FullTree { root: config.root.clone(), exclude_extensions: config.exclude_extensions.clone() }
    };

    let result = run_lint(&discovery, &config, &opts).map(|(report, stats)| {
        info!(?stats, "done");
        report
    });
    Ok(LintOutcome::from(result))
}

/// Explicit --config must exist; the default file is optional.
fn load_config(path: Option<&Path>) -> Result<LintConfig> {
    match path {
        Some(p) => LintConfig::from_file(p).with_context(|| format!("load config {}", p.display())),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                Ok(LintConfig::from_file(default)?)
            } else {
                Ok(LintConfig::default())
            }
        }
    }
}

fn print_report(report: &Report, format: Format) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        Format::Text => out.write_all(report.failure_message().as_bytes())?,
        Format::Json => writeln!(out, "{}", report.to_json().context("serialize report")?)?,
    }
    out.flush().context("flush stdout")?;
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // RUST_LOG controls verbosity; default keeps passing runs silent
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder().with_env_filter(env_filter).with_writer(std::io::stderr).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Thread count; `None` = one per CPU core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Threads(Option<usize>);

/// Parse the thread count ("auto" or a positive integer)
fn parse_threads(s: &str) -> Result<Threads, String> {
    if s.eq_ignore_ascii_case("auto") {
        return Ok(Threads(None));
    }
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(Threads(Some(n))),
        _ => Err(format!("expected \"auto\" or a positive integer, got {s:?}")),
    }
}
