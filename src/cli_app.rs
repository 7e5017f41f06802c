//! Top-level CLI definition and dispatch.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use serde_json::{Value, json};
use thiserror::Error;

use dreamlens_report::cli::dashboard::{self as terminal_dashboard, DashboardConfig};
use dreamlens_report::core::config::Config;
use dreamlens_report::core::errors::ReportError;
use dreamlens_report::dashboard::runtime::settle;
use dreamlens_report::dashboard::{DashboardController, Tab};
use dreamlens_report::host::{HeadlessPage, PageLayout};
use dreamlens_report::logger::MemoryLog;
use dreamlens_report::report::chart::format_count;
use dreamlens_report::report::classify::is_hex_color;
use dreamlens_report::report::payload::{Period, ReportInput};

/// Monthly dream report renderer and terminal dashboard.
#[derive(Debug, Parser)]
#[command(
    name = "dlr",
    author,
    version,
    about = "DreamLens monthly report dashboard",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Render a report payload headlessly and print what the page shows.
    Render(RenderArgs),
    /// Interactive terminal dashboard.
    Dashboard(DashboardArgs),
    /// Print the report route for a period.
    Path(PathArgs),
    /// View and validate configuration.
    Config(ConfigArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args)]
struct RenderArgs {
    /// Report payload (JSON).
    #[arg(value_name = "PAYLOAD")]
    payload: PathBuf,
    /// Tab to show after the initial render.
    #[arg(long, value_parser = parse_tab, default_value = "dream")]
    tab: Tab,
    /// Period assumed when the payload does not carry a readable one.
    #[arg(long, value_parser = parse_period, value_name = "YYYYMM")]
    period: Option<Period>,
}

#[derive(Debug, Clone, Args)]
struct DashboardArgs {
    /// Report payload (JSON) shown first.
    #[arg(value_name = "PAYLOAD")]
    payload: PathBuf,
    /// Directory of `YYYYMM.json` payloads for month navigation.
    #[arg(long, value_name = "DIR")]
    payload_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct PathArgs {
    /// Target period, `YYYYMM` or `YYYY-MM`.
    #[arg(value_parser = parse_period, value_name = "PERIOD")]
    period: Period,
}

#[derive(Debug, Clone, Args, Default)]
struct ConfigArgs {
    /// Config operation to run.
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum ConfigCommand {
    /// Print resolved config file path.
    Path,
    /// Print effective merged configuration.
    Show,
    /// Validate configuration and exit.
    Validate,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completion script for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// Internal bug or invariant violation.
    #[error("{0}")]
    Internal(String),
    /// Operation partially succeeded.
    #[error("{0}")]
    Partial(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Internal(_) | Self::Json(_) => 3,
            Self::Partial(_) => 4,
        }
    }
}

impl From<ReportError> for CliError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidConfig { .. }
            | ReportError::MissingConfig { .. }
            | ReportError::ConfigParse { .. }
            | ReportError::MalformedInput { .. }
            | ReportError::InvalidPeriod { .. } => Self::User(err.to_string()),
            ReportError::Serialization { .. } => Self::Internal(err.to_string()),
            _ => Self::Runtime(err.to_string()),
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::Render(args) => run_render(cli, args),
        Command::Dashboard(args) => run_dashboard(cli, args),
        Command::Path(args) => emit_path(cli, args),
        Command::Config(args) => run_config(cli, args),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

// ──────────────────── render ────────────────────

fn run_render(cli: &Cli, args: &RenderArgs) -> Result<(), CliError> {
    let config = Config::load(cli.config.as_deref())?;
    let raw = fs::read_to_string(&args.payload)
        .map_err(|e| CliError::User(format!("read {}: {e}", args.payload.display())))?;
    let fallback = args.period.unwrap_or_else(Period::current);
    let ingested = ReportInput::from_json_lenient(&raw, fallback);
    let issue = ingested.issue.as_ref().map(ToString::to_string);

    let layout = PageLayout::default();
    let mut controller = DashboardController::from_ingested(
        ingested,
        HeadlessPage::new(&layout),
        &config,
        MemoryLog::default(),
    );
    let cmd = controller.start();
    settle(&mut controller, cmd);
    if args.tab != Tab::default() {
        let cmd = controller.select_tab(args.tab);
        settle(&mut controller, cmd);
    }

    let period = controller.state().period;
    let has_data = controller.state().has_data;
    let page = controller.host();
    let canvas = match args.tab {
        Tab::Dream => &layout.dream_canvas,
        Tab::Emotion => &layout.emotion_canvas,
    };
    let chart = page.chart_spec(canvas).cloned().ok_or_else(|| {
        CliError::Internal(format!("no chart rendered on {canvas} after settling"))
    })?;
    let summary = page.text(&layout.summary).unwrap_or_default().to_string();
    let cloud = page.cloud_words(&layout.cloud_area).to_vec();
    let cloud_text = page.text(&layout.cloud_area).map(str::to_string);
    let events = controller.log().entries().len();

    match output_mode(cli) {
        OutputMode::Human => {
            println!(
                "{} {}",
                period.to_string().bold(),
                format!("[{}]", args.tab).dimmed()
            );
            println!("  {summary}");
            println!();
            for (idx, label) in chart.labels.iter().enumerate() {
                let value = chart.values.get(idx).copied().unwrap_or_default();
                let color = chart.colors.get(idx).map_or("", String::as_str);
                println!(
                    "  {} {label:<12} {:>6}",
                    swatch(color),
                    format_count(value)
                );
            }
            println!();
            if cloud.is_empty() {
                println!(
                    "  {}",
                    cloud_text.as_deref().unwrap_or_default().italic()
                );
            } else {
                let words: Vec<String> = cloud
                    .iter()
                    .map(|w| format!("{}", swatch_text(&w.text, &w.color)))
                    .collect();
                println!("  {}", words.join("  "));
            }
            if let Some(issue) = &issue {
                eprintln!("{} {issue}", "warning:".yellow().bold());
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "render",
                "period": period.to_string(),
                "path": period.report_path(),
                "has_data": has_data,
                "tab": args.tab.key(),
                "summary": summary,
                "chart": serde_json::to_value(&chart)?,
                "cloud": serde_json::to_value(&cloud)?,
                "cloud_text": cloud_text,
                "issue": issue,
                "events": events,
            });
            write_json_line(&payload)?;
        }
    }

    match issue {
        Some(issue) => Err(CliError::Partial(format!(
            "rendered without data: {issue}"
        ))),
        None => Ok(()),
    }
}

fn swatch(hex: &str) -> colored::ColoredString {
    swatch_text("■", hex)
}

fn swatch_text(text: &str, hex: &str) -> colored::ColoredString {
    match parse_hex(hex) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    if !is_hex_color(hex) {
        return None;
    }
    let digits = hex.strip_prefix('#')?;
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };
    let channel = |i: usize| u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

// ──────────────────── dashboard ────────────────────

fn run_dashboard(cli: &Cli, args: &DashboardArgs) -> Result<(), CliError> {
    if !io::stdout().is_terminal() {
        return Err(CliError::User(
            "dashboard requires an interactive terminal; use `dlr render` instead".to_string(),
        ));
    }
    if !args.payload.exists() {
        return Err(CliError::User(format!(
            "payload not found: {}",
            args.payload.display()
        )));
    }
    let config = Config::load(cli.config.as_deref())?;
    let dashboard = DashboardConfig {
        payload: args.payload.clone(),
        payload_dir: args.payload_dir.clone(),
        config,
    };
    terminal_dashboard::run(&dashboard).map_err(|e| CliError::Runtime(format!("dashboard: {e}")))
}

// ──────────────────── path ────────────────────

fn emit_path(cli: &Cli, args: &PathArgs) -> Result<(), CliError> {
    let path = args.period.report_path();
    match output_mode(cli) {
        OutputMode::Human => println!("{path}"),
        OutputMode::Json => {
            let payload = json!({
                "command": "path",
                "year": args.period.year,
                "month": args.period.month,
                "path": path,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

// ──────────────────── config ────────────────────

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match &args.command {
        None | Some(ConfigCommand::Path) => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            let exists = path.exists();

            match output_mode(cli) {
                OutputMode::Human => {
                    println!("{}", path.display());
                    if !exists {
                        println!("  (file does not exist; defaults will be used)");
                    }
                }
                OutputMode::Json => {
                    let payload = json!({
                        "command": "config path",
                        "path": path.to_string_lossy(),
                        "exists": exists,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Show) => {
            let config = Config::load(cli.config.as_deref())?;

            match output_mode(cli) {
                OutputMode::Human => {
                    let toml_str = toml::to_string_pretty(&config)
                        .map_err(|e| CliError::Runtime(format!("serialize config: {e}")))?;
                    println!("{toml_str}");
                }
                OutputMode::Json => {
                    let value = serde_json::to_value(&config)?;
                    let payload = json!({
                        "command": "config show",
                        "config": value,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Validate) => match Config::load(cli.config.as_deref()) {
            Ok(config) => {
                let hash = config.stable_hash()?;

                match output_mode(cli) {
                    OutputMode::Human => {
                        println!("Configuration is valid.");
                        println!("  Source: {}", config.paths.config_file.display());
                        println!("  Hash: {hash}");
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": true,
                            "path": config.paths.config_file.to_string_lossy(),
                            "hash": hash,
                        });
                        write_json_line(&payload)?;
                    }
                }
                Ok(())
            }
            Err(e) => {
                match output_mode(cli) {
                    OutputMode::Human => {
                        eprintln!("Configuration is INVALID: {e}");
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": false,
                            "code": e.code(),
                            "error": e.to_string(),
                        });
                        write_json_line(&payload)?;
                    }
                }
                Err(CliError::User(format!("invalid configuration: {e}")))
            }
        },
    }
}

// ──────────────────── output helpers ────────────────────

fn parse_tab(raw: &str) -> Result<Tab, String> {
    Tab::parse(raw).ok_or_else(|| format!("unknown tab '{raw}' (expected dream or emotion)"))
}

fn parse_period(raw: &str) -> Result<Period, String> {
    Period::parse(raw).map_err(|e| e.to_string())
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("DLR_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_before_and_after_subcommand() {
        let before = Cli::try_parse_from([
            "dlr",
            "--config",
            "/tmp/dlr.toml",
            "--json",
            "--no-color",
            "render",
            "report.json",
        ]);
        assert!(before.is_ok());

        let after = Cli::try_parse_from(["dlr", "render", "report.json", "--json", "--no-color"]);
        assert!(after.is_ok());
    }

    #[test]
    fn parses_subcommands() {
        let cases = [
            vec!["dlr", "render", "report.json", "--tab", "emotion"],
            vec!["dlr", "render", "report.json", "--tab", "type", "--period", "2024-05"],
            vec!["dlr", "dashboard", "report.json", "--payload-dir", "/data/reports"],
            vec!["dlr", "path", "202405"],
            vec!["dlr", "config"],
            vec!["dlr", "config", "path"],
            vec!["dlr", "config", "show"],
            vec!["dlr", "config", "validate"],
        ];

        for case in cases {
            let parsed = Cli::try_parse_from(case.clone());
            assert!(parsed.is_ok(), "failed to parse case: {case:?}");
        }
    }

    #[test]
    fn rejects_bad_tab_and_period() {
        assert!(Cli::try_parse_from(["dlr", "render", "r.json", "--tab", "keywords"]).is_err());
        assert!(Cli::try_parse_from(["dlr", "path", "202413"]).is_err());
        assert!(Cli::try_parse_from(["dlr", "path", "may"]).is_err());
        assert!(Cli::try_parse_from(["dlr", "render"]).is_err());
    }

    #[test]
    fn path_argument_is_normalized() {
        let cli = Cli::try_parse_from(["dlr", "path", "2024/5"]).expect("parse");
        match cli.command {
            Command::Path(args) => assert_eq!(args.period.report_path(), "/report/202405/"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn completions_support_bash_zsh_and_fish() {
        for shell in ["bash", "zsh", "fish"] {
            let parsed = Cli::try_parse_from(["dlr", "completions", shell]);
            assert!(parsed.is_ok(), "failed shell parse for {shell}");
        }
    }

    #[test]
    fn output_mode_resolution_honors_precedence() {
        assert_eq!(
            resolve_output_mode(true, Some("human"), true),
            OutputMode::Json
        );
        assert_eq!(
            resolve_output_mode(false, Some("json"), true),
            OutputMode::Json
        );
        assert_eq!(
            resolve_output_mode(false, Some("human"), false),
            OutputMode::Human
        );
        assert_eq!(
            resolve_output_mode(false, Some("auto"), true),
            OutputMode::Human
        );
        assert_eq!(resolve_output_mode(false, None, false), OutputMode::Json);
    }

    #[test]
    fn exit_codes_follow_contract() {
        assert_eq!(CliError::User(String::new()).exit_code(), 1);
        assert_eq!(CliError::Runtime(String::new()).exit_code(), 2);
        assert_eq!(CliError::Internal(String::new()).exit_code(), 3);
        assert_eq!(CliError::Partial(String::new()).exit_code(), 4);
    }

    #[test]
    fn report_errors_map_to_exit_classes() {
        let period = ReportError::InvalidPeriod {
            details: "month 13".to_string(),
        };
        assert_eq!(CliError::from(period).exit_code(), 1);
        let missing = ReportError::MissingElement {
            element: "wordCloud".to_string(),
        };
        assert_eq!(CliError::from(missing).exit_code(), 2);
    }

    #[test]
    fn hex_swatches_parse_short_and_long_forms() {
        assert_eq!(parse_hex("#28a745"), Some((0x28, 0xa7, 0x45)));
        assert_eq!(parse_hex("#ccc"), Some((0xcc, 0xcc, 0xcc)));
        assert_eq!(parse_hex("28a745"), None);
        assert_eq!(parse_hex("#12345"), None);
        assert_eq!(parse_hex("#12g456"), None);
    }
}
