//! Error handling for the bunny library.
//!
//! Almost everything in this crate degrades silently: a missing process lock,
//! an unknown total or a zero-length time sample all fall back to a simpler
//! behavior. The errors below are the few conditions that reach the caller.

use std::io;
use thiserror::Error;

/// Errors that can happen when using bunny.
#[derive(Error, Debug)]
pub enum Error {
    /// The legacy GUI mode was requested.
    ///
    /// Building a bar with `gui(true)` fails fast. Graphical frontends are
    /// expected to consume the iterator themselves and draw their own widgets.
    #[error("GUI mode is deprecated: drive a graphical frontend from the iterator instead of `gui(true)`")]
    GuiDeprecated,

    /// The progress line template could not be parsed.
    #[error("invalid progress template")]
    Template {
        #[from]
        source: indicatif::style::TemplateError,
    },

    /// I/O Error.
    ///
    /// Returned by an explicit [`close`](crate::Bunny::close) when the final
    /// repaint or flush of the terminal fails.
    #[error("I/O error")]
    Io {
        #[from]
        source: io::Error,
    },
}

/// Result type alias for operations that can fail with a bunny error.
pub type Result<T> = std::result::Result<T, Error>;
