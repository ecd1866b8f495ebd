//! Probeline ffprobe - media metadata probe backed by the ffprobe CLI
//!
//! # Example
//!
//! ```ignore
//! use probeline_core::Probe;
//! use probeline_ffprobe::FfprobeProbe;
//!
//! let probe = FfprobeProbe::new("ffprobe");
//! let metadata = probe.probe("/media/clip.mp4")?;
//! println!("{}", metadata["format"]["duration"]);
//! ```

pub mod probe;
pub mod report;

pub use probe::FfprobeProbe;
pub use report::{FormatInfo, ProbeReport, StreamInfo};
