/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Share colour:
/// ≥ 50% → green
/// \> 0 → yellow
/// 0 → grey
pub fn color_for_pct(pct: f64) -> &'static str {
    if pct >= 50.0 {
        GREEN
    } else if pct > 0.0 {
        YELLOW
    } else {
        GREY
    }
}

/// Colour for a jobpage status label.
pub fn color_for_status(label: &str) -> &'static str {
    match label {
        "Active" => GREEN,
        "Inactive" => RED,
        _ => RESET,
    }
}
