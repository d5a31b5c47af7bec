//! Operator-facing output: one `emit` call per message, rendered as coloured
//! text or as one JSON object per line.

use chrono::Local;
use colored::*;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

pub mod nerd_font;
pub use nerd_font::NerdFont;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
    Debug,
}

impl Level {
    /// Warnings and errors go to stderr so stdout stays parseable.
    fn to_stderr(self) -> bool {
        matches!(self, Level::Warn | Level::Error)
    }

    fn paint(self, message: &str) -> ColoredString {
        match self {
            Level::Info => message.normal(),
            Level::Success => message.green().bold(),
            Level::Warn => message.yellow().bold(),
            Level::Error => message.red().bold(),
            Level::Debug => message.cyan(),
        }
    }
}

const FORMAT_TEXT: u8 = 0;
const FORMAT_JSON: u8 = 1;

static FORMAT: AtomicU8 = AtomicU8::new(FORMAT_TEXT);
static DEBUG: AtomicBool = AtomicBool::new(false);

pub const SEPARATOR_WIDTH: usize = 80;
const SEPARATOR_HEAVY: &str = "━";
const SEPARATOR_LIGHT: &str = "─";

/// Select the output format and whether text output is coloured.
pub fn init(format: OutputFormat, color: bool) {
    let raw = match format {
        OutputFormat::Text => FORMAT_TEXT,
        OutputFormat::Json => FORMAT_JSON,
    };
    FORMAT.store(raw, Ordering::Relaxed);
    colored::control::set_override(color && format == OutputFormat::Text);
}

fn output_format() -> OutputFormat {
    match FORMAT.load(Ordering::Relaxed) {
        FORMAT_JSON => OutputFormat::Json,
        _ => OutputFormat::Text,
    }
}

pub fn set_debug_mode(enabled: bool) {
    DEBUG.store(enabled, Ordering::Relaxed);
}

pub fn is_debug_enabled() -> bool {
    DEBUG.load(Ordering::Relaxed)
}

#[derive(Serialize)]
struct Event<'a> {
    ts: String,
    level: Level,
    code: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

/// Remove CSI escape sequences so JSON consumers never see terminal styling.
pub fn strip_ansi(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // Final byte of a CSI sequence is in @..=~
            for b in chars.by_ref() {
                if ('@'..='~').contains(&b) {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    out
}

fn render(
    level: Level,
    code: &str,
    message: &str,
    data: Option<serde_json::Value>,
) -> Option<String> {
    match output_format() {
        OutputFormat::Text => Some(level.paint(message).to_string()),
        OutputFormat::Json => serde_json::to_string(&Event {
            ts: Local::now().to_rfc3339(),
            level,
            code,
            message: strip_ansi(message),
            data,
        })
        .ok(),
    }
}

/// Report one message. `code` is a stable dotted identifier such as
/// `disk.scan.skipped`; debug messages are dropped unless debug mode is on.
pub fn emit(level: Level, code: &str, message: &str, data: Option<serde_json::Value>) {
    if level == Level::Debug && !is_debug_enabled() {
        return;
    }
    let Some(line) = render(level, code, message, data) else {
        return;
    };

    if level.to_stderr() {
        let _ = writeln!(io::stderr().lock(), "{}", line);
    } else {
        let _ = writeln!(io::stdout().lock(), "{}", line);
    }
}

/// Horizontal rule between text sections; nothing in JSON mode.
pub fn separator(light: bool) {
    if output_format() == OutputFormat::Json {
        return;
    }
    let glyph = if light { SEPARATOR_LIGHT } else { SEPARATOR_HEAVY };
    println!("{}", glyph.repeat(SEPARATOR_WIDTH).dimmed());
}

pub mod prelude {
    pub use super::{Level, NerdFont, OutputFormat, emit, separator};
}
