//! The in-memory representation of a single scan and the extraction of
//! its plottable mass/intensity sequences.

use log::debug;

use mzpeaks::{peak_set::PeakSetVec, prelude::*, CentroidPeak, MZ};

/**
Describes the initial representation of the signal of a scan, either
a discrete peak-picked list (`Centroid`) or a densely sampled trace
(`Profile`). The `Unknown` state is the default.
*/
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum SignalContinuity {
    Unknown = 0,
    Centroid = 3,
    Profile = 5,
}

impl Default for SignalContinuity {
    fn default() -> SignalContinuity {
        SignalContinuity::Unknown
    }
}

/// The polarity of the acquisition, `Positive` (1) or `Negative` (-1),
/// or `Unknown` (0) when the vendor library does not report one.
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq)]
pub enum ScanPolarity {
    Unknown = 0,
    Positive = 1,
    Negative = -1,
}

impl Default for ScanPolarity {
    fn default() -> ScanPolarity {
        ScanPolarity::Unknown
    }
}

/**
A pair of parallel arrays, m/z and intensity, in the order the
underlying source stored them.

Invariant: the two arrays are always of equal length, with `mz[i]`
corresponding to `intensity[i]`.
*/
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ArrayPair {
    mz: Vec<f64>,
    intensity: Vec<f32>,
}

impl ArrayPair {
    pub fn new(mz: Vec<f64>, intensity: Vec<f32>) -> Self {
        debug_assert_eq!(mz.len(), intensity.len());
        Self { mz, intensity }
    }

    pub fn len(&self) -> usize {
        self.mz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mz.is_empty()
    }

    pub fn mz(&self) -> &[f64] {
        &self.mz
    }

    pub fn intensity(&self) -> &[f32] {
        &self.intensity
    }

    /// Iterate over `(mz, intensity)` points in stored order
    pub fn iter(&self) -> impl Iterator<Item = (f64, f32)> + '_ {
        self.mz
            .iter()
            .copied()
            .zip(self.intensity.iter().copied())
    }

    /// The smallest and largest m/z observed, or `None` for an empty pair
    pub fn mz_range(&self) -> Option<(f64, f64)> {
        self.mz.iter().copied().fold(None, |state, x| match state {
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
            None => Some((x, x)),
        })
    }

    /// The most intense `(mz, intensity)` point, or `None` for an empty pair
    pub fn base_peak(&self) -> Option<(f64, f32)> {
        self.iter()
            .reduce(|best, point| if point.1 > best.1 { point } else { best })
    }

    /// The total ion current, the sum over the intensity array
    pub fn tic(&self) -> f32 {
        self.intensity.iter().sum()
    }
}

/**
A single acquisition event fetched from a RAW file by its 1-based scan
number.

A scan carries its signal in exactly one representation: a centroid
peak list when the file stored the scan peak-picked, or profile arrays
otherwise. [`RawScan::spectrum_arrays`] resolves whichever is present
into a plottable [`ArrayPair`].
*/
#[derive(Debug, Default, Clone)]
pub struct RawScan {
    pub scan_number: usize,
    pub ms_level: u8,
    /// The scan start time, in minutes
    pub start_time: f64,
    pub polarity: ScanPolarity,
    pub signal_continuity: SignalContinuity,
    pub filter_string: Option<String>,
    /// The centroid peak list, when the scan was stored peak-picked
    pub peaks: Option<PeakSetVec<CentroidPeak, MZ>>,
    /// The profile ("preferred") arrays, when the scan was stored continuous
    pub arrays: Option<ArrayPair>,
}

impl RawScan {
    pub fn new(
        scan_number: usize,
        ms_level: u8,
        start_time: f64,
        polarity: ScanPolarity,
        signal_continuity: SignalContinuity,
    ) -> Self {
        Self {
            scan_number,
            ms_level,
            start_time,
            polarity,
            signal_continuity,
            ..Default::default()
        }
    }

    /**
    Extract the mass and intensity sequences of this scan as parallel
    arrays, in stored order.

    Centroid data is used whenever it is present and non-empty,
    otherwise the profile arrays are returned as-is. No sorting,
    deduplication, or filtering is applied.
    */
    pub fn spectrum_arrays(&self) -> ArrayPair {
        if let Some(peaks) = self.peaks.as_ref().filter(|peaks| peaks.len() > 0) {
            let mut mz = Vec::with_capacity(peaks.len());
            let mut intensity = Vec::with_capacity(peaks.len());
            for peak in peaks.iter() {
                mz.push(peak.mz);
                intensity.push(peak.intensity);
            }
            ArrayPair::new(mz, intensity)
        } else if let Some(arrays) = self.arrays.as_ref() {
            debug!(
                "Scan {} has no centroid data, falling back to the profile arrays",
                self.scan_number
            );
            arrays.clone()
        } else {
            debug!("Scan {} carries no signal", self.scan_number);
            ArrayPair::default()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn centroid_peaks(points: &[(f64, f32)]) -> PeakSetVec<CentroidPeak, MZ> {
        let mut peaks = PeakSetVec::empty();
        for (i, (mz, intensity)) in points.iter().enumerate() {
            peaks.push(CentroidPeak::new(*mz, *intensity, i as u32));
        }
        peaks
    }

    #[test]
    fn test_extract_centroid() {
        let points = [(245.13, 1500.0f32), (422.77, 320.5), (810.4, 12007.25)];
        let mut scan = RawScan::new(1, 1, 0.05, ScanPolarity::Positive, SignalContinuity::Centroid);
        scan.peaks = Some(centroid_peaks(&points));

        let arrays = scan.spectrum_arrays();
        assert_eq!(arrays.len(), points.len());
        assert_eq!(arrays.mz(), &[245.13, 422.77, 810.4]);
        assert_eq!(arrays.intensity(), &[1500.0, 320.5, 12007.25]);
    }

    #[test]
    fn test_extract_profile_fallback() {
        let mz = vec![100.0, 100.01, 100.02, 100.03];
        let intensity = vec![0.0f32, 250.0, 900.0, 120.0];
        let mut scan = RawScan::new(5, 1, 1.25, ScanPolarity::Positive, SignalContinuity::Profile);
        scan.arrays = Some(ArrayPair::new(mz.clone(), intensity.clone()));

        let arrays = scan.spectrum_arrays();
        assert_eq!(arrays.mz(), mz.as_slice());
        assert_eq!(arrays.intensity(), intensity.as_slice());
    }

    #[test]
    fn test_extract_empty_centroid_falls_back() {
        let mut scan = RawScan::new(2, 2, 3.8, ScanPolarity::Negative, SignalContinuity::Centroid);
        scan.peaks = Some(PeakSetVec::empty());
        scan.arrays = Some(ArrayPair::new(vec![150.0, 151.0], vec![10.0, 20.0]));

        let arrays = scan.spectrum_arrays();
        assert_eq!(arrays.mz(), &[150.0, 151.0]);
        assert_eq!(arrays.intensity(), &[10.0, 20.0]);
    }

    #[test]
    fn test_extract_no_signal() {
        let scan = RawScan::new(3, 1, 0.0, ScanPolarity::Unknown, SignalContinuity::Unknown);
        let arrays = scan.spectrum_arrays();
        assert!(arrays.is_empty());
        assert_eq!(arrays.mz().len(), arrays.intensity().len());
    }

    #[test]
    fn test_lengths_always_align() {
        let points = [(120.0, 3.0f32), (121.0, 5.5)];
        let mut scan = RawScan::new(7, 1, 0.5, ScanPolarity::Positive, SignalContinuity::Centroid);
        scan.peaks = Some(centroid_peaks(&points));
        let arrays = scan.spectrum_arrays();
        assert_eq!(arrays.mz().len(), arrays.intensity().len());
    }

    #[test]
    fn test_array_pair_observers() {
        let arrays = ArrayPair::new(vec![100.0, 200.0, 300.0], vec![10.0, 50.0, 5.0]);
        assert_eq!(arrays.len(), 3);
        assert_eq!(arrays.mz_range(), Some((100.0, 300.0)));
        assert_eq!(arrays.base_peak(), Some((200.0, 50.0)));
        assert!((arrays.tic() - 65.0).abs() < 1e-6);

        let empty = ArrayPair::default();
        assert_eq!(empty.mz_range(), None);
        assert_eq!(empty.base_peak(), None);
        assert_eq!(empty.tic(), 0.0);
    }
}
