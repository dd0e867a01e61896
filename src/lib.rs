//! `mzplot` reads a single scan from a Thermo RAW file and renders its
//! mass spectrum as a line chart image.
//!
//! The proprietary RAW container is decoded by the vendor's own
//! RawFileReader library through the [`thermorawfilereader`] crate, and
//! chart rendering is handled by [`plotters`]. This crate is the glue:
//! open a file session, fetch one scan, resolve its centroid or profile
//! signal into parallel m/z and intensity arrays, and draw them.
//!
//! ```no_run
//! use mzplot::{draw_png_file, MzPlotError, ThermoRawSession};
//!
//! # fn main() -> Result<(), MzPlotError> {
//! let mut session = ThermoRawSession::open("./Raw/1.raw")?;
//! let scan = session.get_scan(25)?;
//! let arrays = scan.spectrum_arrays();
//! draw_png_file(&arrays, "Output/spectrum_1_25.png")?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod plot;
pub mod session;
pub mod spectrum;

pub use crate::error::MzPlotError;
pub use crate::plot::{draw_png_file, draw_svg_file, PlotConfig, RenderError};
pub use crate::session::{SessionError, ThermoRawSession};
pub use crate::spectrum::{ArrayPair, RawScan, ScanPolarity, SignalContinuity};
