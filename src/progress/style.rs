//! Progress line styling options.
//!
//! # Examples
//!
//! ```rust
//! use bunny::progress::BarStyle;
//!
//! let mut style = BarStyle::default();
//! style.set_desc("epochs");
//! style.set_progress_chars(BarStyle::CHARS_FADE_IN);
//! ```

use std::fmt::Write;

use console::{measure_text_width, Color};
use indicatif::style::TemplateError;
use indicatif::{FormattedDuration, ProgressState, ProgressStyle};

use crate::rate::{self, SharedAvg};

/// Define the options for the progress line drawn under the bunny.
#[derive(Debug, Clone)]
pub struct BarStyle {
    /// Prefix shown before the bar, followed by `": "`.
    pub(crate) desc: Option<String>,
    /// Unit name used in counts and rates.
    pub(crate) unit: String,
    /// Fixed width. `None` follows the terminal width.
    pub(crate) ncols: Option<u16>,
    /// Progression characters set.
    ///
    /// There must be at least 3 characters for the following states:
    /// "filled", "current", and "to do".
    pub(crate) progress_chars: String,
    /// Color of the bar itself.
    pub(crate) colour: Option<Color>,
    /// Keep the final line on screen once closed.
    pub(crate) leave: bool,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            desc: None,
            unit: "it".into(),
            ncols: None,
            progress_chars: BarStyle::CHARS_FINE.into(),
            colour: None,
            leave: true,
        }
    }
}

impl BarStyle {
    /// Template used when the total is known.
    ///
    /// `epochs:  50%|████▌    | 5/10 [00:00:05<00:00:05, 1.00it/s]`
    pub const TEMPLATE_TOTAL: &'static str =
        "{msg}{percent:>3}%|{wide_bar}| {human_pos}/{human_len} [{elapsed_precise}<{ema_eta}, {ema_rate}]";
    /// Template used when the total is unknown.
    ///
    /// `epochs: 7it [00:00:05, 1.40it/s]`
    pub const TEMPLATE_COUNT: &'static str =
        "{msg}{human_pos}{unit} [{elapsed_precise}, {ema_rate}]";

    /// Use fine blocks as progress characters: `"█▉▊▋▌▍▎▏  "`.
    pub const CHARS_FINE: &'static str = "█▉▊▋▌▍▎▏  ";
    /// Use fade-in blocks as progress characters: `"█▓▒░  "`.
    pub const CHARS_FADE_IN: &'static str = "█▓▒░  ";
    /// Use ASCII characters, for terminals without block glyphs: `"#9876543210 "`.
    pub const CHARS_ASCII: &'static str = "#9876543210 ";
    /// Use a line as progress characters: `"━╾╴─"`.
    pub const CHARS_LINE: &'static str = "━╾╴─";

    /// Get the description shown before the bar.
    pub fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }

    /// Set the description shown before the bar.
    pub fn set_desc<S: Into<String>>(&mut self, desc: S) {
        self.desc = Some(desc.into());
    }

    /// Get the unit name.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Set the unit name, `"it"` by default.
    pub fn set_unit<S: Into<String>>(&mut self, unit: S) {
        self.unit = unit.into();
    }

    /// Get the fixed drawing width, if any.
    pub fn ncols(&self) -> Option<u16> {
        self.ncols
    }

    /// Draw `ncols` columns wide instead of following the terminal.
    pub fn set_ncols(&mut self, ncols: u16) {
        self.ncols = Some(ncols);
    }

    /// Get the progression characters.
    pub fn progress_chars(&self) -> &str {
        &self.progress_chars
    }

    /// Set the progression characters.
    ///
    /// Sets with fewer than 3 characters, or whose characters do not all have
    /// the same width, are ignored.
    pub fn set_progress_chars(&mut self, chars: &str) {
        let mut widths = chars.chars().map(|c| measure_text_width(c.encode_utf8(&mut [0; 4])));
        let same_width = match widths.next() {
            Some(first) => widths.all(|w| w == first),
            None => false,
        };
        if chars.chars().count() >= 3 && same_width {
            self.progress_chars = chars.into();
        }
    }

    /// Set the colour of the bar.
    pub fn set_colour(&mut self, colour: Color) {
        self.colour = Some(colour);
    }

    /// Return `true` if the final line stays on screen once closed.
    pub fn leave(&self) -> bool {
        self.leave
    }

    /// Set to `false` to clear the bar and the bunny upon completion.
    pub fn set_leave(&mut self, leave: bool) {
        self.leave = leave;
    }

    /// The `{msg}` shown at the start of the line.
    pub(crate) fn prefix(&self) -> String {
        match &self.desc {
            Some(desc) => format!("{desc}: "),
            None => String::new(),
        }
    }

    fn template(&self, has_total: bool) -> String {
        if !has_total {
            return Self::TEMPLATE_COUNT.into();
        }
        match self.colour.and_then(colour_name) {
            Some(name) => Self::TEMPLATE_TOTAL.replace("{wide_bar}", &format!("{{wide_bar:.{name}}}")),
            None => Self::TEMPLATE_TOTAL.into(),
        }
    }

    /// Create a [`ProgressStyle`] whose rate and ETA follow `avg`.
    pub(crate) fn to_progress_style(
        &self,
        has_total: bool,
        avg: &SharedAvg,
    ) -> Result<ProgressStyle, TemplateError> {
        let unit = self.unit.clone();
        let rate_unit = self.unit.clone();
        let rate_avg = avg.clone();
        let eta_avg = avg.clone();

        let style = ProgressStyle::default_bar()
            .template(&self.template(has_total))?
            .progress_chars(&self.progress_chars)
            .with_key("unit", move |_: &ProgressState, w: &mut dyn Write| {
                let _ = w.write_str(&unit);
            })
            .with_key("ema_rate", move |state: &ProgressState, w: &mut dyn Write| {
                let _ = match rate::per_sec(rate_avg.get(), state.pos(), state.elapsed()) {
                    Some(per_sec) => write!(w, "{per_sec:.2}{rate_unit}/s"),
                    None => write!(w, "?{rate_unit}/s"),
                };
            })
            .with_key("ema_eta", move |state: &ProgressState, w: &mut dyn Write| {
                let per_sec = rate::per_sec(eta_avg.get(), state.pos(), state.elapsed());
                let _ = match (per_sec, state.len()) {
                    (Some(per_sec), Some(len)) => {
                        let left = len.saturating_sub(state.pos()) as f64 / per_sec;
                        let left = std::time::Duration::try_from_secs_f64(left).unwrap_or_default();
                        write!(w, "{}", FormattedDuration(left))
                    }
                    _ => w.write_str("?"),
                };
            });
        Ok(style)
    }
}

/// Name of `colour` in indicatif's dotted style syntax.
fn colour_name(colour: Color) -> Option<String> {
    let name = match colour {
        Color::Black => "black",
        Color::Red => "red",
        Color::Green => "green",
        Color::Yellow => "yellow",
        Color::Blue => "blue",
        Color::Magenta => "magenta",
        Color::Cyan => "cyan",
        Color::White => "white",
        Color::Color256(n) => return Some(n.to_string()),
        #[allow(unreachable_patterns)]
        _ => return None,
    };
    Some(name.into())
}
