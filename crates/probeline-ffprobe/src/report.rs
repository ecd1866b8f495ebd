//! Typed view over ffprobe's JSON output
//!
//! Only the fields used for validation and console summaries are typed. The
//! record stores the raw JSON, so nothing ffprobe reports is lost.

use std::collections::BTreeMap;

use serde::Deserialize;

/// `-show_format -show_streams` output
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeReport {
    pub format: FormatInfo,
    #[serde(default)]
    pub streams: Vec<StreamInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FormatInfo {
    pub filename: String,
    pub nb_streams: Option<u32>,
    pub format_name: Option<String>,
    /// Seconds as a decimal string, or "N/A"
    pub duration: Option<String>,
    pub size: Option<String>,
    pub bit_rate: Option<String>,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StreamInfo {
    pub index: u32,
    pub codec_type: Option<String>,
    pub codec_name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub duration: Option<String>,
}

/// ffprobe writes numbers as strings and uses "N/A" for unknown values.
fn parse_seconds(s: Option<&str>) -> Option<f64> {
    s.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
}

impl ProbeReport {
    /// Container duration, falling back to the longest stream.
    pub fn duration_secs(&self) -> Option<f64> {
        parse_seconds(self.format.duration.as_deref()).or_else(|| {
            self.streams
                .iter()
                .filter_map(|s| parse_seconds(s.duration.as_deref()))
                .reduce(f64::max)
        })
    }

    pub fn count_streams(&self, codec_type: &str) -> usize {
        self.streams
            .iter()
            .filter(|s| s.codec_type.as_deref() == Some(codec_type))
            .count()
    }

    /// One-line description, e.g. `mov,mp4 12.5s 1v/2a`
    pub fn summary(&self) -> String {
        let format = self.format.format_name.as_deref().unwrap_or("unknown");
        let duration = self
            .duration_secs()
            .map_or_else(|| "?s".to_string(), |d| format!("{d:.1}s"));
        format!(
            "{format} {duration} {}v/{}a",
            self.count_streams("video"),
            self.count_streams("audio")
        )
    }
}
