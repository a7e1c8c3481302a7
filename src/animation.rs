//! The bunny.
//!
//! A frame is eight rows of ASCII art holding a sign with the current
//! element on it. The whole frame drifts right as the bar fills up.

/// Rows of art in one frame.
pub const ART_ROWS: usize = 8;

/// Rows reserved on the terminal: the art plus the progress line below it.
pub const REGION_ROWS: usize = ART_ROWS + 1;

/// Columns kept free on the right so the bunny never runs off the screen.
pub const DRIFT_MARGIN: usize = 40;

/// Leading spaces for the frame at iteration `n`.
///
/// Without a total there is nothing to be proportional to, so the bunny
/// stays put.
pub fn offset(n: u64, total: Option<u64>, ncols: usize) -> usize {
    let track = ncols.saturating_sub(DRIFT_MARGIN);
    match total {
        Some(total) if total > 0 => {
            let fraction = n as f64 / total as f64;
            ((fraction * track as f64) as usize).min(track)
        }
        _ => 0,
    }
}

/// Render one frame with `label` on the sign, shifted right by `offset`.
pub fn frame(label: &str, offset: usize) -> [String; ART_ROWS] {
    let pad = " ".repeat(offset);
    [
        format!("{pad}|￣￣￣￣￣￣￣￣|"),
        format!("{pad}|    TRAINING    |"),
        format!("{pad}|     epoch      |"),
        format!("{pad}|   {label:>6}       |"),
        format!("{pad}| ＿＿＿_＿＿＿＿|"),
        format!("{pad} (\\__/) ||"),
        format!("{pad} (•ㅅ•) || "),
        format!("{pad} / 　 づ"),
    ]
}
