//! An open session over a Thermo RAW file, [`ThermoRawSession`].
//!
//! Depends upon the [`thermorawfilereader`] crate which manages the
//! self-hosted `.NET` runtime. You must still have a working
//! [`.NET 8`](https://dotnet.microsoft.com/en-us/download/dotnet/8.0) runtime
//! installed on the machine you wish to run this on until Thermo's library
//! supports .NET ahead-of-time compilation.
//!
//! # Licensing
//! By using this library, you agree to the
//! [RawFileReader License](https://github.com/thermofisherlsms/RawFileReader/blob/main/License.doc)

use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;

use mzpeaks::{peak_set::PeakSetVec, prelude::*, CentroidPeak, MZ};

use thermorawfilereader::schema::{Polarity, SpectrumData, SpectrumMode};
use thermorawfilereader::{IonizationMode, MassAnalyzer, RawFileReader};

use crate::spectrum::{ArrayPair, RawScan, ScanPolarity, SignalContinuity};

/// The ways opening a RAW file or looking up one of its scans can fail
#[derive(Debug, Error)]
pub enum SessionError {
    /// The path was rejected before the vendor library was ever invoked
    #[error("File does not exist at {}", .0.display())]
    FileNotFound(PathBuf),
    /// The vendor library could not open the file
    #[error("Failed to open {}: {source}", .path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The instrument is still writing to the file
    #[error("{} is still being acquired", .0.display())]
    AcquisitionInProgress(PathBuf),
    /// The requested scan number does not exist in the run
    #[error("The requested scan number {0} was not found, the run holds {1} scans")]
    ScanNotFound(usize, usize),
    /// The requested instrument configuration does not exist in the run
    #[error("The requested instrument configuration {0} was not found, the run reports {1}")]
    InstrumentNotFound(usize, usize),
}

/// One (ionization mode, mass analyzer) pairing reported by the instrument
#[derive(Debug, Clone, Copy)]
pub struct InstrumentConfiguration {
    pub ionization_mode: IonizationMode,
    pub mass_analyzer: MassAnalyzer,
}

/// A summary of the instrument the run was acquired on
#[derive(Debug, Default, Clone)]
pub struct InstrumentDescription {
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub software_version: Option<String>,
    pub configurations: Vec<InstrumentConfiguration>,
}

/**
An open handle to a Thermo RAW file granting scan lookup by 1-based
scan number and instrument selection.

The vendor handle is released when the session is dropped, on every
exit path. There is no half-open state to interrogate: construction
either yields a usable session or a [`SessionError`].
*/
pub struct ThermoRawSession {
    path: PathBuf,
    handle: RawFileReader,
    instrument: InstrumentDescription,
    selected_instrument: usize,
}

impl std::fmt::Debug for ThermoRawSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThermoRawSession")
            .field("path", &self.path)
            .field("instrument", &self.instrument)
            .field("selected_instrument", &self.selected_instrument)
            .finish_non_exhaustive()
    }
}

impl ThermoRawSession {
    /// Open the RAW file at `path`, verifying it exists first
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, SessionError> {
        let path: PathBuf = path.into();
        if !path.exists() {
            return Err(SessionError::FileNotFound(path));
        }
        let handle = RawFileReader::open(&path).map_err(|source| SessionError::OpenFailed {
            path: path.clone(),
            source,
        })?;

        let instrument = Self::describe_instrument(&handle);
        info!(
            "Opened {} with {} scans on {}",
            path.display(),
            handle.len(),
            instrument.model.as_deref().unwrap_or("an unknown instrument"),
        );
        if handle.is_empty() {
            warn!("{} contains no spectra", path.display());
        }

        Ok(Self {
            path,
            handle,
            instrument,
            selected_instrument: 1,
        })
    }

    fn describe_instrument(handle: &RawFileReader) -> InstrumentDescription {
        let descr = handle.instrument_model();
        let configurations = descr
            .configurations()
            .map(|vconf| InstrumentConfiguration {
                ionization_mode: vconf.ionization_mode,
                mass_analyzer: vconf.mass_analyzer,
            })
            .collect();
        InstrumentDescription {
            model: descr.model().map(|s| s.to_string()),
            serial_number: descr.serial_number().map(|s| s.to_string()),
            software_version: descr.software_version().map(|s| s.to_string()),
            configurations,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The number of scans in the run
    pub fn len(&self) -> usize {
        self.handle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handle.is_empty()
    }

    pub fn instrument(&self) -> &InstrumentDescription {
        &self.instrument
    }

    /// The 1-based instrument configuration scans are read from
    pub fn selected_instrument(&self) -> usize {
        self.selected_instrument
    }

    /**
    Whether the instrument is still acquiring into this file.

    The in-process reader indexes the complete run while opening the
    file and cannot attach to a live acquisition, so an open session
    always reports `false`. A file still being written surfaces as
    [`SessionError::OpenFailed`] instead.
    */
    pub fn in_acquisition(&self) -> bool {
        false
    }

    /**
    Select the 1-based instrument configuration to read scans from.

    Configuration 1 is the first mass spectrometer in the file, which
    is what the vendor library reads from by default.
    */
    pub fn select_instrument(&mut self, configuration: usize) -> Result<(), SessionError> {
        let available = self.instrument.configurations.len();
        if configuration == 0 || configuration > available.max(1) {
            return Err(SessionError::InstrumentNotFound(configuration, available));
        }
        if let Some(conf) = self.instrument.configurations.get(configuration - 1) {
            debug!(
                "Selected instrument configuration {configuration}: {:?} {:?}",
                conf.ionization_mode, conf.mass_analyzer
            );
        }
        self.selected_instrument = configuration;
        Ok(())
    }

    fn centroid_peaks(data: &SpectrumData) -> PeakSetVec<CentroidPeak, MZ> {
        let mut peaks = PeakSetVec::empty();
        if let (Some(mz), Some(intensity)) = (data.mz(), data.intensity()) {
            for (mz_i, intensity_i) in mz.iter().zip(intensity) {
                peaks.push(CentroidPeak::new(mz_i, intensity_i, 0));
            }
        }
        peaks
    }

    fn profile_arrays(data: &SpectrumData) -> ArrayPair {
        if let (Some(mz), Some(intensity)) = (data.mz(), data.intensity()) {
            ArrayPair::new(mz.iter().collect(), intensity.iter().collect())
        } else {
            ArrayPair::default()
        }
    }

    /// Fetch the scan with 1-based number `scan_number` from the run
    pub fn get_scan(&mut self, scan_number: usize) -> Result<RawScan, SessionError> {
        let n = self.len();
        if scan_number == 0 || scan_number > n {
            return Err(SessionError::ScanNotFound(scan_number, n));
        }
        let raw = self
            .handle
            .get(scan_number - 1)
            .ok_or(SessionError::ScanNotFound(scan_number, n))?;
        let view = raw.view();

        let polarity = match view.polarity() {
            Polarity::Positive => ScanPolarity::Positive,
            Polarity::Negative => ScanPolarity::Negative,
            _ => ScanPolarity::Unknown,
        };
        let continuity = match view.mode() {
            SpectrumMode::Centroid => SignalContinuity::Centroid,
            SpectrumMode::Profile => SignalContinuity::Profile,
            _ => SignalContinuity::Unknown,
        };

        let mut scan = RawScan::new(scan_number, view.ms_level(), view.time(), polarity, continuity);
        scan.filter_string = view.filter_string().map(|s| s.to_string());

        if let Some(data) = view.data() {
            if scan.signal_continuity == SignalContinuity::Centroid {
                scan.peaks = Some(Self::centroid_peaks(&data));
            } else {
                scan.arrays = Some(Self::profile_arrays(&data));
            }
        }

        debug!(
            "Scan {scan_number}: MS{} at {:.4} min, {:?} {:?}",
            scan.ms_level, scan.start_time, scan.polarity, scan.signal_continuity
        );
        Ok(scan)
    }
}

impl Drop for ThermoRawSession {
    fn drop(&mut self) {
        debug!("Closing {}", self.path.display());
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_open_missing_file() {
        let err = ThermoRawSession::open("./test/data/absent.raw").unwrap_err();
        assert!(matches!(err, SessionError::FileNotFound(_)));
        assert!(err.to_string().contains("does not exist"));
    }

    // Exercising the vendor library needs a checked-in RAW file and a
    // .NET runtime, so the round trip is opt-in.
    #[test]
    #[ignore = "requires ./test/data/small.RAW and a .NET 8 runtime"]
    fn test_read_scan() -> Result<(), SessionError> {
        let mut session = ThermoRawSession::open("./test/data/small.RAW")?;
        assert_eq!(session.len(), 48);
        assert!(!session.in_acquisition());

        let scan = session.get_scan(1)?;
        assert_eq!(scan.scan_number, 1);
        assert_eq!(scan.ms_level, 1);
        assert_eq!(scan.signal_continuity, SignalContinuity::Profile);

        let arrays = scan.spectrum_arrays();
        assert!(!arrays.is_empty());
        assert_eq!(arrays.mz().len(), arrays.intensity().len());
        Ok(())
    }

    #[test]
    #[ignore = "requires ./test/data/small.RAW and a .NET 8 runtime"]
    fn test_scan_out_of_range() {
        let mut session = ThermoRawSession::open("./test/data/small.RAW").unwrap();
        assert!(matches!(
            session.get_scan(0),
            Err(SessionError::ScanNotFound(0, _))
        ));
        assert!(matches!(
            session.get_scan(10_000),
            Err(SessionError::ScanNotFound(10_000, _))
        ));
    }
}
