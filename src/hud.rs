//! Bottom status line: liveness dot, section label, arc count, motion mode, UTC clock

use crate::terminal::Terminal;
use chrono::{DateTime, Utc};
use crossterm::style::Color;

const LABEL: &str = "SYS://GLOBE";
const BRAND: &str = "SECUROLOGY.AI";

pub struct HudInfo {
    pub live_arcs: usize,
    pub reduced_motion: bool,
    pub paused: bool,
    /// Blink phase for the status dot
    pub blink: bool,
}

/// Left and right halves of the status line
pub fn hud_text(info: &HudInfo, now: DateTime<Utc>) -> (String, String) {
    let mode = if info.reduced_motion {
        "STATIC"
    } else if info.paused {
        "PAUSED"
    } else {
        "LIVE"
    };
    let dot = if info.blink { '●' } else { '○' };
    let left = format!("{dot} {LABEL}  {mode}  ARCS {:02}", info.live_arcs);
    let right = format!("{} UTC  {BRAND}", now.format("%H:%M:%S"));
    (left, right)
}

pub fn render_hud(term: &mut Terminal, info: &HudInfo) {
    let (width, height) = term.size();
    if height == 0 {
        return;
    }
    let y = height as i32 - 1;
    let (left, right) = hud_text(info, Utc::now());

    term.set_str(1, y, &left, Some(Color::DarkCyan), false);
    let right_x = width as i32 - right.chars().count() as i32 - 1;
    if right_x > left.chars().count() as i32 + 2 {
        term.set_str(right_x, y, &right, Some(Color::DarkGrey), false);
    }
}
