//! The top-level error type the driver propagates.

use std::io;
use std::num::ParseIntError;

use thiserror::Error;

use crate::plot::RenderError;
use crate::session::SessionError;

/// Any failure encountered between reading the user's input and writing
/// the rendered image
#[derive(Debug, Error)]
pub enum MzPlotError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Render(#[from] RenderError),
    /// A numeric prompt or argument could not be parsed
    #[error("Could not parse a numeric value: {0}")]
    Parse(#[from] ParseIntError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
