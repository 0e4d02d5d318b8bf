use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use thiserror::Error;

/// Resolution height and frame rate of the first video stream, both rendered
/// as the strings that end up in the file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoMetadata {
    pub resolution_height: Option<String>,
    pub frame_rate: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("could not launch ffprobe: {0}")]
    Launch(#[from] std::io::Error),
    #[error("ffprobe exited with {0}")]
    Failed(std::process::ExitStatus),
    #[error("ffprobe output was not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    height: Option<u64>,
    r_frame_rate: Option<String>,
}

/// Reads the metadata used for naming. Probe failures of any kind yield
/// empty metadata; the rename proceeds without those segments.
pub fn read_video_metadata(path: &Path) -> VideoMetadata {
    probe_first_video_stream(path).unwrap_or_default()
}

/// Runs ffprobe scoped to this one file; the child is spawned and reaped
/// inside the call.
fn probe_first_video_stream(path: &Path) -> Result<VideoMetadata, ProbeError> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=height,r_frame_rate",
            "-of",
            "json",
        ])
        .arg(path)
        .output()?;

    if !output.status.success() {
        return Err(ProbeError::Failed(output.status));
    }

    parse_probe_json(&String::from_utf8_lossy(&output.stdout))
}

fn parse_probe_json(json: &str) -> Result<VideoMetadata, ProbeError> {
    let parsed = serde_json::from_str::<ProbeOutput>(json)?;
    let Some(stream) = parsed.streams.into_iter().next() else {
        return Ok(VideoMetadata::default());
    };

    Ok(VideoMetadata {
        resolution_height: stream.height.map(|h| h.to_string()),
        frame_rate: stream.r_frame_rate.as_deref().and_then(format_frame_rate),
    })
}

/// ffprobe reports rates as rationals ("30000/1001"); render them with three
/// fractional digits ("29.970"). Plain decimal strings pass through trimmed.
fn format_frame_rate(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some((num, den)) = raw.split_once('/') {
        let num = num.trim().parse::<f64>().ok()?;
        let den = den.trim().parse::<f64>().ok()?;
        if num <= 0.0 || den <= 0.0 {
            return None;
        }
        return Some(format!("{:.3}", num / den));
    }

    let value = raw.parse::<f64>().ok()?;
    if value <= 0.0 {
        return None;
    }
    Some(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::{format_frame_rate, parse_probe_json, VideoMetadata};

    #[test]
    fn parses_height_and_rational_rate() {
        let json = r#"{"streams":[{"height":1080,"r_frame_rate":"30000/1001"}]}"#;
        let meta = parse_probe_json(json).expect("must parse");
        assert_eq!(meta.resolution_height.as_deref(), Some("1080"));
        assert_eq!(meta.frame_rate.as_deref(), Some("29.970"));
    }

    #[test]
    fn missing_stream_yields_default() {
        let meta = parse_probe_json(r#"{"streams":[]}"#).expect("must parse");
        assert_eq!(meta, VideoMetadata::default());

        let meta = parse_probe_json(r#"{}"#).expect("must parse");
        assert_eq!(meta, VideoMetadata::default());
    }

    #[test]
    fn missing_fields_stay_absent() {
        let meta = parse_probe_json(r#"{"streams":[{}]}"#).expect("must parse");
        assert_eq!(meta, VideoMetadata::default());
    }

    #[test]
    fn garbage_json_is_an_error() {
        assert!(parse_probe_json("not json").is_err());
    }

    #[test]
    fn frame_rate_formats() {
        assert_eq!(format_frame_rate("30000/1001").as_deref(), Some("29.970"));
        assert_eq!(format_frame_rate("30/1").as_deref(), Some("30.000"));
        assert_eq!(format_frame_rate("25").as_deref(), Some("25"));
        assert_eq!(format_frame_rate("29.97").as_deref(), Some("29.97"));
        assert_eq!(format_frame_rate("0/0"), None);
        assert_eq!(format_frame_rate(""), None);
        assert_eq!(format_frame_rate("n/a"), None);
    }
}
