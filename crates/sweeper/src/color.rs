//! CLI color helpers.
//!
//! Respects `NO_COLOR`, `FORCE_COLOR`, and TTY detection via `owo-colors`'
//! `if_supports_color()`, plus the `--no-color` flag.

use std::sync::atomic::{AtomicBool, Ordering};

use owo_colors::OwoColorize;
use owo_colors::Stream::{self, Stderr, Stdout};

/// Global override: when true, forces color off (set by `--no-color` flag).
static NO_COLOR_FLAG: AtomicBool = AtomicBool::new(false);

/// Call once from main.rs when `--no-color` is passed.
pub fn set_no_color() {
    // SAFETY: Called once at startup before the runtime spawns any threads.
    unsafe { std::env::set_var("NO_COLOR", "1") };
    NO_COLOR_FLAG.store(true, Ordering::Relaxed);
}

// Ice (primary accent): #7CB4C8
const ICE: (u8, u8, u8) = (124, 180, 200);

// Aurora (success): #6B8F5E
const AURORA: (u8, u8, u8) = (107, 143, 94);

// Copper (skipped/warning): #C49A5C
const COPPER: (u8, u8, u8) = (196, 154, 92);

// Ember (failure): #B87060
const EMBER: (u8, u8, u8) = (184, 112, 96);

fn paint(text: &str, stream: Stream, (r, g, b): (u8, u8, u8)) -> String {
    if NO_COLOR_FLAG.load(Ordering::Relaxed) {
        return text.to_string();
    }
    text.if_supports_color(stream, |t| t.truecolor(r, g, b))
        .to_string()
}

/// Apply ice blue (region and sweeper names).
pub fn ice(text: &str) -> String {
    paint(text, Stdout, ICE)
}

pub fn aurora(text: &str) -> String {
    paint(text, Stdout, AURORA)
}

pub fn copper(text: &str) -> String {
    paint(text, Stdout, COPPER)
}

pub fn ember(text: &str) -> String {
    paint(text, Stdout, EMBER)
}

/// Apply bold bright text (headers).
pub fn bold(text: &str) -> String {
    if NO_COLOR_FLAG.load(Ordering::Relaxed) {
        return text.to_string();
    }
    text.if_supports_color(Stdout, |t| t.bold()).to_string()
}

/// Color-code a status value after padding it to `width`.
pub fn status_padded(status_str: &str, width: usize) -> String {
    let padded = format!("{:<width$}", status_str, width = width);
    match status_str {
        "succeeded" => aurora(&padded),
        "skipped" | "region skipped" => copper(&padded),
        "failed" | "cancelled" => ember(&padded),
        _ => padded,
    }
}

/// Apply error styling (ember red, for stderr messages).
pub fn error(text: &str) -> String {
    paint(text, Stderr, EMBER)
}

/// Apply warning styling (copper amber, for stderr messages).
pub fn warning(text: &str) -> String {
    paint(text, Stderr, COPPER)
}
