//! Script inspection for the command line.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use segcat_core::time::format_timestamp;
use segcat_core::{SafeMode, SegmentDescriptor};
use segcat_script::{parse_script, probe, SIGNATURE};

/// What a concat script resolves to, without opening any segment.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptReport {
    pub script: String,
    pub segments: Vec<SegmentDescriptor>,
    pub seekable: bool,
    /// Microseconds; present only when seekable.
    pub total_duration: Option<i64>,
}

impl ScriptReport {
    /// Human-readable listing.
    pub fn render(&self) -> String {
        let mut out = format!("Script: {}\n", self.script);
        out.push_str(&format!("Segments: {}\n", self.segments.len()));
        out.push_str(&format!(
            "Seekable: {}\n",
            if self.seekable { "yes" } else { "no" }
        ));
        if let Some(total) = self.total_duration {
            out.push_str(&format!("Duration: {}\n", format_timestamp(total)));
        }

        for (i, segment) in self.segments.iter().enumerate() {
            out.push_str(&format!(
                "  [{}] {}  start {}  duration {}\n",
                i,
                segment.url,
                show(segment.start_time),
                show(segment.duration)
            ));
        }
        out
    }
}

fn show(value: Option<i64>) -> String {
    value.map_or_else(|| "unknown".to_string(), format_timestamp)
}

/// Parse the script at `path` into a report.
pub fn inspect_script(path: &Path, safe: SafeMode) -> Result<ScriptReport> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {:?}", path))?;
    let base = path.to_string_lossy();

    let table = parse_script(&base, &text, safe)
        .with_context(|| format!("Failed to parse script: {:?}", path))?;

    Ok(ScriptReport {
        script: base.into_owned(),
        segments: table.segments().to_vec(),
        seekable: table.is_seekable(),
        total_duration: table.total_duration(),
    })
}

/// Probe score of the file at `path`, from its leading bytes.
pub fn probe_file(path: &Path) -> Result<u8> {
    let mut head = Vec::with_capacity(SIGNATURE.len());
    std::fs::File::open(path)
        .with_context(|| format!("Failed to open file: {:?}", path))?
        .take(SIGNATURE.len() as u64)
        .read_to_end(&mut head)
        .with_context(|| format!("Failed to read file: {:?}", path))?;
    Ok(probe(&head))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn report_for_partial_durations() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("list.txt");
        fs::write(&path, "file a.mp4\nduration 10\nfile b.mp4\n").unwrap();

        let report = inspect_script(&path, SafeMode::Auto).unwrap();
        assert!(!report.seekable);
        assert_eq!(report.total_duration, None);
        assert_eq!(report.segments.len(), 2);
        assert!(report.segments[0].url.ends_with("/a.mp4"));

        let text = report.render();
        assert!(text.contains("Seekable: no"));
        assert!(text.contains("start 0:00:10.000000  duration unknown"));
    }

    #[test]
    fn report_serializes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("list.ffconcat");
        fs::write(&path, "ffconcat version 1.0\nfile a.ts\nduration 1.5\n").unwrap();

        let report = inspect_script(&path, SafeMode::Auto).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["seekable"], true);
        assert_eq!(json["total_duration"], 1_500_000);
        assert_eq!(json["segments"][0]["duration"], 1_500_000);
    }

    #[test]
    fn probe_scores() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good");
        let bad = dir.path().join("bad");
        let short = dir.path().join("short");
        fs::write(&good, "ffconcat version 1.0\nfile a.ts\n").unwrap();
        fs::write(&bad, "file a.ts\n").unwrap();
        fs::write(&short, "ffconcat").unwrap();

        assert_eq!(probe_file(&good).unwrap(), 100);
        assert_eq!(probe_file(&bad).unwrap(), 0);
        assert_eq!(probe_file(&short).unwrap(), 0);
        assert!(probe_file(&dir.path().join("missing")).is_err());
    }
}
