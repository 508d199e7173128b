//! Implementation of the `exif-discard` command

use std::path::PathBuf;

use clap::Parser;
use discard::{Discard, ExcisionMode, OffsetPolicy, Options, SegmentBounds};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "exif-discard",
    version,
    about = "Remove the Exif IFD from a JPEG file without re-encoding it"
)]
pub struct Args {
    /// Path to an image file with Exif IFD
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Path to the output image
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Count every IFD offset from the start of the TIFF header
    #[arg(long)]
    pub relative_offsets: bool,

    /// Fail if the header does not fit into the declared APP1 length
    #[arg(long)]
    pub enforce_segment_length: bool,

    /// Also remove all IFDs linked from the first one
    #[arg(long)]
    pub chain: bool,

    /// Write the unmodified input if no Exif data could be removed
    #[arg(long)]
    pub keep_on_failure: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn options(&self) -> Options {
        Options {
            offset_policy: if self.relative_offsets {
                OffsetPolicy::TiffRelative
            } else {
                OffsetPolicy::Compat
            },
            segment_bounds: if self.enforce_segment_length {
                SegmentBounds::Enforce
            } else {
                SegmentBounds::Trust
            },
            mode: if self.chain {
                ExcisionMode::Chain
            } else {
                ExcisionMode::FirstIfd
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Stripped { removed: usize },
    KeptOriginal,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Reading '{path}' failed: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Writing '{path}' failed: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Discard(#[from] discard::Error),
}

/// Reads the input file, strips its Exif IFD and writes the output file
pub fn run(args: &Args) -> Result<Outcome, Error> {
    let data = std::fs::read(&args.input).map_err(|source| Error::Read {
        path: args.input.clone(),
        source,
    })?;

    if !discard_jpeg::is_filetype(&data) {
        tracing::warn!("'{}' does not start with a JPEG SOI marker", args.input.display());
    }

    let input_len = data.len();
    let (result, outcome) = match Discard::new(args.options()).apply_owned(data) {
        Ok(result) => {
            let removed = input_len.saturating_sub(result.len());
            (result, Outcome::Stripped { removed })
        }
        Err(err) if args.keep_on_failure => {
            tracing::warn!("Keeping '{}' unmodified: {err}", args.input.display());
            (err.into_inner(), Outcome::KeptOriginal)
        }
        Err(err) => return Err(err.into_parts().0.into()),
    };

    std::fs::write(&args.output, result).map_err(|source| Error::Write {
        path: args.output.clone(),
        source,
    })?;

    Ok(outcome)
}
