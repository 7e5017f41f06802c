//! Interactive terminal dashboard over the headless page.
//!
//! The controller renders into a [`HeadlessPage`]; this module paints that
//! page with `crossterm` and feeds key presses back as dashboard messages.
//! Confirmed navigation loads the next month's payload from a directory of
//! `YYYYMM.json` files, degrading to an empty report when none exists.

#![allow(missing_docs)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::{Attribute, Color, SetAttribute, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};

use crate::core::config::Config;
use crate::dashboard::DashboardController;
use crate::dashboard::controller::ACTIVE_CLASS;
use crate::dashboard::model::{DashboardMsg, DashboardState, Tab};
use crate::dashboard::runtime::Scheduler;
use crate::host::{HeadlessPage, PageLayout};
use crate::logger::jsonl::{JsonlConfig, JsonlWriter};
use crate::report::chart::ChartSpec;
use crate::report::payload::{Ingested, Period, ReportInput};

/// Approximate pixel width of one terminal cell, for cloud sizing.
const CELL_PX: f64 = 8.0;

/// Idle poll interval when nothing is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

const BAR_WIDTH: usize = 30;

// ──────────────────── dashboard config ────────────────────

pub struct DashboardConfig {
    pub payload: PathBuf,
    /// Directory of `YYYYMM.json` payloads used for navigation.
    pub payload_dir: Option<PathBuf>,
    pub config: Config,
}

/// What a key press asks for.
#[derive(Debug, Clone, PartialEq)]
enum KeyAction {
    Msg(DashboardMsg),
    Quit,
}

type TerminalController = DashboardController<HeadlessPage, JsonlWriter>;

// ──────────────────── main loop ────────────────────

/// Run the dashboard until the user quits (q / Ctrl-C, or Esc with the dropdown closed).
pub fn run(config: &DashboardConfig) -> io::Result<()> {
    let log = JsonlWriter::open(JsonlConfig::for_path(&config.config.paths.activity_log));
    let ingested = ingest_file(&config.payload, Period::current())?;
    let mut stdout = io::stdout();

    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let result = run_inner(&mut stdout, config, ingested, log);

    let _ = execute!(stdout, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run_inner(
    stdout: &mut io::Stdout,
    config: &DashboardConfig,
    ingested: Ingested,
    log: JsonlWriter,
) -> io::Result<()> {
    let (cols, _) = terminal::size()?;
    let mut controller = build_controller(ingested, &config.config, log, cols);
    let mut scheduler = Scheduler::default();
    let mut status = String::new();

    let cmd = controller.start();
    scheduler.schedule(cmd, Instant::now());
    render_frame(stdout, &controller, &status)?;

    loop {
        let wait = scheduler.next_wait(Instant::now()).unwrap_or(IDLE_POLL);
        let mut navigations = Vec::new();

        if event::poll(wait)? {
            match event::read()? {
                Event::Key(key) => match key_action(&key, controller.state()) {
                    Some(KeyAction::Quit) => return Ok(()),
                    Some(KeyAction::Msg(msg)) => {
                        let cmd = controller.update(msg);
                        navigations.extend(scheduler.schedule(cmd, Instant::now()));
                    }
                    None => {}
                },
                Event::Resize(cols, _) => {
                    let width = f64::from(cols) * CELL_PX;
                    controller.host_mut().set_area_width(width);
                    let cmd = controller.update(DashboardMsg::Resize { width });
                    navigations.extend(scheduler.schedule(cmd, Instant::now()));
                }
                _ => {}
            }
        }

        for msg in scheduler.due(Instant::now()) {
            let cmd = controller.update(msg);
            navigations.extend(scheduler.schedule(cmd, Instant::now()));
        }

        if let Some(path) = navigations.pop() {
            let target = controller.state().pending_period;
            let (_, log) = controller.into_parts();
            scheduler.clear();
            let ingested = ingest_for_period(config.payload_dir.as_deref(), target);
            status = match &ingested.issue {
                Some(issue) => format!("{path}: {issue}"),
                None => path,
            };
            let (cols, _) = terminal::size()?;
            controller = build_controller(ingested, &config.config, log, cols);
            let cmd = controller.start();
            scheduler.schedule(cmd, Instant::now());
        }

        render_frame(stdout, &controller, &status)?;
    }
}

fn build_controller(
    ingested: Ingested,
    config: &Config,
    log: JsonlWriter,
    cols: u16,
) -> TerminalController {
    let mut page = HeadlessPage::new(&PageLayout::default());
    page.set_area_width(f64::from(cols) * CELL_PX);
    DashboardController::from_ingested(ingested, page, config, log)
}

// ──────────────────── payload loading ────────────────────

/// Leniently ingest a payload file. Only an unreadable file is an error.
pub fn ingest_file(path: &Path, fallback: Period) -> io::Result<Ingested> {
    let raw = fs::read_to_string(path)?;
    Ok(ReportInput::from_json_lenient(&raw, fallback))
}

/// `DIR/YYYYMM.json`.
#[must_use]
pub fn payload_path_for(dir: &Path, period: Period) -> PathBuf {
    dir.join(format!("{}.json", period.key()))
}

/// Payload for `period` from `dir`; a missing directory or file yields an
/// empty report for that period.
fn ingest_for_period(dir: Option<&Path>, period: Period) -> Ingested {
    let Some(dir) = dir else {
        return Ingested {
            input: ReportInput::no_data(period),
            issue: None,
        };
    };
    let path = payload_path_for(dir, period);
    match fs::read_to_string(&path) {
        Ok(raw) => ReportInput::from_json_lenient(&raw, period),
        Err(_) => Ingested {
            input: ReportInput::no_data(period),
            issue: None,
        },
    }
}

// ──────────────────── key mapping ────────────────────

fn key_action(key: &KeyEvent, state: &DashboardState) -> Option<KeyAction> {
    let dropdown_open = state.dropdown_open;
    let action = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Esc if dropdown_open => KeyAction::Msg(DashboardMsg::ClickOutside),
        KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('1') => KeyAction::Msg(DashboardMsg::SelectTab(Tab::Dream)),
        KeyCode::Char('2') => KeyAction::Msg(DashboardMsg::SelectTab(Tab::Emotion)),
        KeyCode::Tab => KeyAction::Msg(DashboardMsg::SelectTab(state.active_tab.other())),
        KeyCode::Char('d') => KeyAction::Msg(DashboardMsg::ToggleDropdown),
        KeyCode::Left => KeyAction::Msg(DashboardMsg::PreviousMonth),
        KeyCode::Right => KeyAction::Msg(DashboardMsg::NextMonth),
        KeyCode::Enter => KeyAction::Msg(DashboardMsg::ConfirmNavigation),
        _ => return None,
    };
    Some(action)
}

// ──────────────────── color mapping ────────────────────

/// `#rgb` / `#rrggbb` to a terminal color; anything else is grey.
fn hex_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Color::Grey,
    };
    let channel = |i: usize| u8::from_str_radix(expanded.get(i..i + 2).unwrap_or("cc"), 16);
    match (channel(0), channel(2), channel(4)) {
        (Ok(r), Ok(g), Ok(b)) => Color::Rgb { r, g, b },
        _ => Color::Grey,
    }
}

/// Proportional bar like `███████░░░`.
fn render_bar(value: f64, total: f64, width: usize) -> String {
    let filled = if total > 0.0 {
        ((value / total) * width as f64).round() as usize
    } else {
        0
    };
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

// ──────────────────── frame rendering ────────────────────

fn render_frame(
    stdout: &mut io::Stdout,
    controller: &TerminalController,
    status: &str,
) -> io::Result<()> {
    let page = controller.host();
    let layout = controller.layout();
    let state = controller.state();
    let mut row = 0u16;

    queue!(stdout, MoveTo(0, 0), Clear(ClearType::All))?;

    // ── Header ──
    queue!(
        stdout,
        MoveTo(0, row),
        SetForegroundColor(Color::Cyan),
        SetAttribute(Attribute::Bold),
    )?;
    write!(stdout, " Dream report  {}", state.period)?;
    queue!(stdout, SetAttribute(Attribute::Reset))?;
    row += 2;

    // ── Tabs ──
    queue!(stdout, MoveTo(2, row))?;
    for (id, title) in [
        (&layout.dream_tab, "1 dream types"),
        (&layout.emotion_tab, "2 emotions"),
    ] {
        if page.has_class(id, ACTIVE_CLASS) {
            queue!(stdout, SetAttribute(Attribute::Reverse))?;
        }
        write!(stdout, " {title} ")?;
        queue!(stdout, SetAttribute(Attribute::Reset))?;
        write!(stdout, "  ")?;
    }
    row += 2;

    // ── Chart ──
    let canvas = match state.active_tab {
        Tab::Dream => &layout.dream_canvas,
        Tab::Emotion => &layout.emotion_canvas,
    };
    if let Some(spec) = page.chart_spec(canvas) {
        row = render_chart(stdout, spec, row)?;
    } else {
        queue!(stdout, MoveTo(3, row), SetForegroundColor(Color::DarkGrey))?;
        write!(stdout, "(chart unavailable)")?;
        queue!(stdout, SetAttribute(Attribute::Reset))?;
        row += 1;
    }
    row += 1;

    // ── Summary ──
    queue!(stdout, MoveTo(3, row), SetAttribute(Attribute::Bold))?;
    write!(stdout, "{}", page.text(&layout.summary).unwrap_or_default())?;
    queue!(stdout, SetAttribute(Attribute::Reset))?;
    row += 2;

    // ── Keyword cloud ──
    queue!(stdout, MoveTo(3, row), SetAttribute(Attribute::Bold))?;
    write!(stdout, "Keywords")?;
    queue!(stdout, SetAttribute(Attribute::Reset))?;
    row += 1;
    let words = page.cloud_words(&layout.cloud_area);
    queue!(stdout, MoveTo(3, row))?;
    if words.is_empty() {
        queue!(stdout, SetForegroundColor(Color::DarkGrey))?;
        write!(stdout, "{}", page.text(&layout.cloud_area).unwrap_or_default())?;
    } else {
        let biggest = words.iter().map(|w| w.size).fold(0.0f64, f64::max);
        for word in words.iter().take(24) {
            queue!(stdout, SetForegroundColor(hex_color(&word.color)))?;
            if word.size >= biggest * 0.5 {
                queue!(stdout, SetAttribute(Attribute::Bold))?;
            }
            write!(stdout, "{} ", word.text)?;
            queue!(stdout, SetAttribute(Attribute::Reset))?;
        }
    }
    queue!(stdout, SetAttribute(Attribute::Reset))?;
    row += 2;

    // ── Period dropdown ──
    if page.is_visible(&layout.dropdown) {
        queue!(stdout, MoveTo(3, row), SetForegroundColor(Color::Yellow))?;
        write!(
            stdout,
            "◀ {} ▶   Enter to open, Esc to cancel",
            page.text(&layout.period_label).unwrap_or_default()
        )?;
        queue!(stdout, SetAttribute(Attribute::Reset))?;
        row += 2;
    }

    // ── Footer ──
    if !status.is_empty() {
        queue!(stdout, MoveTo(3, row), SetForegroundColor(Color::DarkGrey))?;
        write!(stdout, "{status}")?;
        queue!(stdout, SetAttribute(Attribute::Reset))?;
        row += 1;
    }
    queue!(stdout, MoveTo(1, row + 1), SetForegroundColor(Color::DarkGrey))?;
    write!(stdout, "1/2 tabs  d month  ←/→ move  Enter go  q quit")?;
    queue!(stdout, SetAttribute(Attribute::Reset))?;

    stdout.flush()
}

fn render_chart(stdout: &mut io::Stdout, spec: &ChartSpec, mut row: u16) -> io::Result<u16> {
    let total: f64 = spec.values.iter().sum();
    for (idx, label) in spec.labels.iter().enumerate() {
        let value = spec.values.get(idx).copied().unwrap_or(0.0);
        let color = spec.colors.get(idx).map_or(Color::Grey, |c| hex_color(c));
        queue!(stdout, MoveTo(3, row), SetForegroundColor(color))?;
        write!(stdout, "{}", render_bar(value, total, BAR_WIDTH))?;
        queue!(stdout, SetAttribute(Attribute::Reset))?;
        let text = spec.tooltip_text(idx).unwrap_or_else(|| label.clone());
        write!(stdout, "  {text}")?;
        row += 1;
    }
    Ok(row)
}
