//! Replay-side aggregation of an event stream into a [`Profile`]
//!
//! Parsing is incremental: the stream is fed one line at a time against a
//! target profile, so a capture can be aggregated while it is still being
//! produced.

use std::io::BufRead;

use anyhow::{Context, Result};

use crate::event::{self, Event, EventParseError};
use crate::profile::{CallRecord, CallSpan, FrameAggregate, Profile, ProgramAggregate};

/// Counters describing one [`Aggregator::parse_reader`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseSummary {
    /// Lines read, including ignored ones.
    pub lines: u64,
    /// Call records applied to the profile.
    pub calls: u64,
    /// Frame boundaries applied to the profile.
    pub frames: u64,
    /// Malformed lines rejected and skipped.
    pub skipped: u64,
}

/// Incremental event stream parser.
///
/// Carries the running maxima that resolve frame boundaries, so every profile
/// being built needs its own aggregator instance. Feeding lines from two
/// captures through one instance interleaves their timelines.
#[derive(Debug, Default)]
pub struct Aggregator {
    /// Largest GPU end time seen since the session started.
    last_gpu_time: i64,
    /// Largest CPU end time seen since the session started.
    last_cpu_time: i64,
    skipped_lines: u64,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Malformed lines rejected over this aggregator's lifetime.
    pub fn skipped_lines(&self) -> u64 {
        self.skipped_lines
    }

    /// Parse one event line into `profile`.
    ///
    /// Comments, short lines, and unknown tags are ignored without touching
    /// any state. A malformed call line leaves the profile untouched, is
    /// counted, and comes back as an error the caller may log; aggregation
    /// can continue with the next line.
    pub fn parse_line(
        &mut self,
        line: &str,
        profile: &mut Profile,
    ) -> Result<(), EventParseError> {
        let parsed = match event::parse_line(line) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => return Ok(()),
            Err(err) => {
                self.skipped_lines += 1;
                return Err(err);
            }
        };

        // An empty profile marks the start of a new session; stale maxima
        // from a previous capture must not leak into its first frame.
        if profile.is_empty() {
            self.last_gpu_time = 0;
            self.last_cpu_time = 0;
        }

        match parsed {
            Event::Call(call) => self.apply_call(call, profile),
            Event::FrameEnd => self.apply_frame_end(profile),
        }
        Ok(())
    }

    /// Drain `reader` line by line into `profile`.
    ///
    /// Malformed lines, including lines that are not valid UTF-8, are skipped
    /// and counted, with a warning each; only I/O failures abort the pass.
    pub fn parse_reader<R: BufRead>(
        &mut self,
        mut reader: R,
        profile: &mut Profile,
    ) -> Result<ParseSummary> {
        let mut summary = ParseSummary::default();
        let mut buf = Vec::new();
        let mut line_no = 0u64;

        loop {
            buf.clear();
            let read = reader.read_until(b'\n', &mut buf).with_context(|| {
                format!("failed to read event stream line {}", line_no + 1)
            })?;
            if read == 0 {
                break;
            }
            line_no += 1;
            summary.lines += 1;

            // Lines are read as bytes so one corrupt line cannot abort the
            // pass; a non-UTF-8 line is malformed like any other.
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(err) => {
                    self.skipped_lines += 1;
                    summary.skipped += 1;
                    tracing::warn!("skipping non-UTF-8 event line {}: {}", line_no, err);
                    continue;
                }
            };

            let calls_before = profile.calls.len();
            let frames_before = profile.frames.len();
            match self.parse_line(line, profile) {
                Ok(()) => {
                    summary.calls += (profile.calls.len() - calls_before) as u64;
                    summary.frames += (profile.frames.len() - frames_before) as u64;
                }
                Err(err) => {
                    summary.skipped += 1;
                    tracing::warn!("skipping malformed event line {}: {}", line_no, err);
                }
            }
        }

        Ok(summary)
    }

    fn apply_call(&mut self, call: CallRecord, profile: &mut Profile) {
        if self.last_gpu_time < call.gpu_end() {
            self.last_gpu_time = call.gpu_end();
        }
        if self.last_cpu_time < call.cpu_end() {
            self.last_cpu_time = call.cpu_end();
        }

        let is_draw = call.is_draw();
        let program_id = call.program as usize;
        let gpu_duration = call.gpu_duration;
        let cpu_duration = call.cpu_duration;
        let pixels = call.pixels;

        profile.calls.push(call);
        let index = profile.calls.len() - 1;

        if is_draw {
            if profile.programs.len() <= program_id {
                profile
                    .programs
                    .resize_with(program_id + 1, ProgramAggregate::default);
            }
            let program = &mut profile.programs[program_id];
            program.gpu_total = program.gpu_total.wrapping_add(gpu_duration);
            program.cpu_total = program.cpu_total.wrapping_add(cpu_duration);
            program.pixel_total = program.pixel_total.wrapping_add(pixels);
            program.calls.push(index);
        }
    }

    fn apply_frame_end(&mut self, profile: &mut Profile) {
        let no = profile.frames.len();

        // Frames partition the timeline back to back: each one starts where
        // the previous ended, not at its own first call, so inter-frame gaps
        // are charged to the frame that contains them.
        let (gpu_start, cpu_start, begin) = match profile.frames.last() {
            None => (0, 0, 0),
            Some(prev) => (prev.gpu_end(), prev.cpu_end(), prev.calls.end.wrapping_add(1)),
        };

        profile.frames.push(FrameAggregate {
            no,
            gpu_start,
            gpu_duration: self.last_gpu_time.wrapping_sub(gpu_start),
            cpu_start,
            cpu_duration: self.last_cpu_time.wrapping_sub(cpu_start),
            calls: CallSpan {
                begin,
                // One below `begin` when the frame closed without new calls.
                end: profile.calls.len().wrapping_sub(1),
            },
        });
    }
}
