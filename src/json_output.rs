//! JSON output format for aggregated profiles

use serde::{Deserialize, Serialize};

use crate::profile::Profile;

/// A single call record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonCall {
    /// Sequence number from the capture
    pub no: u32,
    /// Call name (e.g., "glDrawArrays")
    pub name: String,
    /// Program id the call ran under
    pub program: u32,
    /// Pixels rasterized (absent for non-draw calls)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixels: Option<i64>,
    /// GPU start in nanoseconds, relative to the session origin
    pub gpu_start: i64,
    /// GPU duration in nanoseconds (0 if GPU timing not captured)
    pub gpu_duration: i64,
    /// CPU start in nanoseconds, relative to the session origin
    pub cpu_start: i64,
    /// CPU duration in nanoseconds (0 if CPU timing not captured)
    pub cpu_duration: i64,
}

/// Accumulated totals for one shader program
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonProgram {
    /// Program id
    pub program: u32,
    /// Number of draw calls attributed to the program
    pub calls: u64,
    /// Total GPU time in nanoseconds
    pub gpu_total: i64,
    /// Total CPU time in nanoseconds
    pub cpu_total: i64,
    /// Total pixels rasterized
    pub pixel_total: i64,
}

/// Timing span of one rendered frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonFrame {
    /// Zero-based frame number
    pub no: usize,
    pub gpu_start: i64,
    pub gpu_duration: i64,
    pub cpu_start: i64,
    pub cpu_duration: i64,
    /// Number of calls in the frame
    pub calls: usize,
    /// First and last call-log index, absent when the frame has no calls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_range: Option<(usize, usize)>,
}

/// Session-level rollup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub calls: u64,
    pub frames: u64,
    pub programs: u64,
    /// GPU time over the whole call log, nanoseconds
    pub gpu_total: i64,
    /// CPU time over the whole call log, nanoseconds
    pub cpu_total: i64,
    /// Malformed lines skipped while aggregating (absent when none were)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped_lines: Option<u64>,
}

/// Complete JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonProfile {
    /// Version of the tool that produced this
    pub version: String,
    /// Output format version
    pub format: String,
    pub summary: JsonSummary,
    pub programs: Vec<JsonProgram>,
    pub frames: Vec<JsonFrame>,
    pub calls: Vec<JsonCall>,
}

impl JsonProfile {
    /// Build the JSON model from an aggregated profile.
    pub fn from_profile(profile: &Profile, skipped_lines: u64) -> Self {
        let calls: Vec<JsonCall> = profile
            .calls
            .iter()
            .map(|call| JsonCall {
                no: call.no,
                name: call.name.clone(),
                program: call.program,
                pixels: call.is_draw().then_some(call.pixels),
                gpu_start: call.gpu_start,
                gpu_duration: call.gpu_duration,
                cpu_start: call.cpu_start,
                cpu_duration: call.cpu_duration,
            })
            .collect();

        let programs: Vec<JsonProgram> = profile
            .touched_programs()
            .map(|(id, program)| JsonProgram {
                program: id as u32,
                calls: program.calls.len() as u64,
                gpu_total: program.gpu_total,
                cpu_total: program.cpu_total,
                pixel_total: program.pixel_total,
            })
            .collect();

        let frames: Vec<JsonFrame> = profile
            .frames
            .iter()
            .map(|frame| JsonFrame {
                no: frame.no,
                gpu_start: frame.gpu_start,
                gpu_duration: frame.gpu_duration,
                cpu_start: frame.cpu_start,
                cpu_duration: frame.cpu_duration,
                calls: frame.calls.len(),
                call_range: (!frame.calls.is_empty())
                    .then_some((frame.calls.begin, frame.calls.end)),
            })
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "frameprof-json-v1".to_string(),
            summary: JsonSummary {
                calls: profile.calls.len() as u64,
                frames: profile.frames.len() as u64,
                programs: programs.len() as u64,
                gpu_total: profile.gpu_total(),
                cpu_total: profile.cpu_total(),
                skipped_lines: (skipped_lines > 0).then_some(skipped_lines),
            },
            programs,
            frames,
            calls,
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
