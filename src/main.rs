use std::fs;
use std::io::{self, BufRead, Write};
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use clap::Parser;
use log::info;

use mzplot::plot;
use mzplot::{MzPlotError, SessionError, ThermoRawSession};

#[derive(Debug, Parser)]
#[command(
    name = "mzplot",
    version,
    about = "Render a single scan from a Thermo RAW file as a line chart image"
)]
struct PlotArgs {
    /// Path to a RAW file, overriding the `Raw/<index>.raw` convention
    #[arg(value_name = "RAW_FILE")]
    raw_file: Option<PathBuf>,

    /// Index used to locate `Raw/<index>.raw` and to name the output
    /// image, prompted for when absent
    #[arg(short, long)]
    index: Option<u32>,

    /// 1-based number of the scan to render, prompted for when absent
    #[arg(short, long)]
    scan: Option<usize>,

    /// 1-based instrument configuration to read scans from
    #[arg(long, default_value_t = 1)]
    instrument: usize,

    /// Directory the rendered image is written into, created when missing
    #[arg(short, long, default_value = "Output")]
    outdir: PathBuf,

    /// Write an SVG image instead of a PNG
    #[arg(long)]
    svg: bool,
}

fn prompt_value<T, R>(input: &mut R, message: &str) -> Result<T, MzPlotError>
where
    T: FromStr<Err = ParseIntError>,
    R: BufRead,
{
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().parse::<T>()?)
}

fn default_input_path(index: u32) -> PathBuf {
    PathBuf::from(format!("Raw/{index}.raw"))
}

fn output_image_path(outdir: &Path, index: u32, scan_number: usize, svg: bool) -> PathBuf {
    let extension = if svg { "svg" } else { "png" };
    outdir.join(format!("spectrum_{index}_{scan_number}.{extension}"))
}

fn run(args: PlotArgs) -> Result<PathBuf, MzPlotError> {
    let mut stdin = io::stdin().lock();

    let index = match args.index {
        Some(index) => index,
        None => prompt_value(&mut stdin, "Enter the raw file index (1, 2, 3, ...): ")?,
    };
    let path = args
        .raw_file
        .clone()
        .unwrap_or_else(|| default_input_path(index));

    let mut session = ThermoRawSession::open(&path)?;
    if session.in_acquisition() {
        return Err(SessionError::AcquisitionInProgress(path).into());
    }
    session.select_instrument(args.instrument)?;

    let scan_number = match args.scan {
        Some(scan) => scan,
        None => prompt_value(&mut stdin, "Enter the spectrum (may be called scan number): ")?,
    };
    let scan = session.get_scan(scan_number)?;
    let arrays = scan.spectrum_arrays();
    info!(
        "Scan {scan_number} yielded {} points, TIC {:.1}",
        arrays.len(),
        arrays.tic()
    );

    fs::create_dir_all(&args.outdir)?;
    let target = output_image_path(&args.outdir, index, scan_number, args.svg);
    if args.svg {
        plot::draw_svg_file(&arrays, &target)?;
    } else {
        plot::draw_png_file(&arrays, &target)?;
    }
    Ok(target)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = PlotArgs::parse();
    match run(args) {
        Ok(target) => {
            println!("Spectrum image saved to {}", target.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    fn args_for(raw_file: &Path, outdir: &Path) -> PlotArgs {
        PlotArgs {
            raw_file: Some(raw_file.to_path_buf()),
            index: Some(3),
            scan: Some(17),
            instrument: 1,
            outdir: outdir.to_path_buf(),
            svg: false,
        }
    }

    #[test]
    fn test_default_input_path() {
        assert_eq!(default_input_path(2), PathBuf::from("Raw/2.raw"));
    }

    #[test]
    fn test_output_image_path() {
        assert_eq!(
            output_image_path(Path::new("Output"), 3, 17, false),
            PathBuf::from("Output/spectrum_3_17.png")
        );
        assert_eq!(
            output_image_path(Path::new("Output"), 1, 25, true),
            PathBuf::from("Output/spectrum_1_25.svg")
        );
    }

    #[test]
    fn test_prompt_parses_numeric_input() {
        let mut input = Cursor::new(b"42\n".to_vec());
        let value: u32 = prompt_value(&mut input, "scan: ").unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_prompt_rejects_non_numeric_input() {
        let mut input = Cursor::new(b"not-a-number\n".to_vec());
        let err = prompt_value::<usize, _>(&mut input, "scan: ").unwrap_err();
        assert!(matches!(err, MzPlotError::Parse(_)));
    }

    #[test]
    fn test_missing_file_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let raw_file = dir.path().join("9.raw");
        let outdir = dir.path().join("Output");

        let err = run(args_for(&raw_file, &outdir)).unwrap_err();
        assert!(matches!(
            err,
            MzPlotError::Session(SessionError::FileNotFound(_))
        ));
        assert!(err.to_string().contains("does not exist"));
        // Nothing is written when the input was rejected
        assert!(!outdir.exists());
    }
}
