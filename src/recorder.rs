//! Capture-side event recording
//!
//! The recorder runs on the thread replaying graphics calls. It turns one
//! call's raw measurements (or a frame boundary) into one line of the event
//! stream, applying baseline subtraction, CPU tick scaling, and the
//! minimum-CPU-duration drop filter before anything is written.

use std::io::{self, Write};

use crate::event;
use crate::profile::CallRecord;

/// Which measurements a capture session records, fixed for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Record CPU timing per call.
    pub cpu_times: bool,
    /// Record GPU timing per call.
    pub gpu_times: bool,
    /// Record pixels drawn per call.
    pub pixels_drawn: bool,
    /// Calls whose scaled CPU duration falls below this many nanoseconds are
    /// dropped from the stream entirely. Only applies while `cpu_times` is on.
    pub min_cpu_time: i64,
    /// Tick rate of the CPU clock supplying raw timestamps, in ticks per
    /// second. CPU fields are rescaled to nanoseconds by `1e9 / cpu_frequency`.
    pub cpu_frequency: u64,
}

impl Default for CaptureConfig {
    /// GPU timing only, with a 1us CPU noise floor and a nanosecond CPU clock.
    fn default() -> Self {
        Self {
            cpu_times: false,
            gpu_times: true,
            pixels_drawn: false,
            min_cpu_time: 1000,
            cpu_frequency: 1_000_000_000,
        }
    }
}

/// Reference timestamps subtracted from every subsequent start timestamp, so
/// reported times are relative to the session origin rather than boot time.
///
/// Zero means "not established". A clock that legitimately reads zero at the
/// session origin needs no baseline anyway, since subtracting zero is a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Baseline {
    gpu: i64,
    cpu: i64,
}

impl Baseline {
    /// A baseline with both clocks unset.
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn new(gpu: i64, cpu: i64) -> Self {
        Self { gpu, cpu }
    }

    pub fn set_gpu(&mut self, timestamp: i64) {
        self.gpu = timestamp;
    }

    pub fn set_cpu(&mut self, timestamp: i64) {
        self.cpu = timestamp;
    }

    pub fn gpu(&self) -> i64 {
        self.gpu
    }

    pub fn cpu(&self) -> i64 {
        self.cpu
    }

    /// True once either reference timestamp has been established.
    pub fn is_set(&self) -> bool {
        self.cpu != 0 || self.gpu != 0
    }
}

/// Raw measurements for one traced call, as captured by the replayer.
///
/// Start and duration values are raw clock readings: GPU fields in
/// nanoseconds, CPU fields in ticks of the clock named by
/// [`CaptureConfig::cpu_frequency`].
#[derive(Debug, Clone, Copy)]
pub struct RawCall<'a> {
    /// Sequence number, strictly increasing across the session.
    pub no: u32,
    /// Call identifier. Must contain no whitespace.
    pub name: &'a str,
    /// Program bound when the call executed. `None` means none was bound and
    /// is written as id 0, the API's own "no program" id.
    pub program: Option<u32>,
    /// Pixels rasterized. `None` marks a non-draw call and is written as -1
    /// so aggregation excludes it from program statistics.
    pub pixels: Option<u64>,
    pub gpu_start: i64,
    pub gpu_duration: i64,
    pub cpu_start: i64,
    pub cpu_duration: i64,
}

/// Normalizes raw call measurements and writes them as event lines.
///
/// The baseline is a constructor argument so capture can never start before
/// the reference timestamps exist. Construction also writes the stream
/// header, exactly once, ahead of any event.
#[derive(Debug)]
pub struct Recorder<W: Write> {
    config: CaptureConfig,
    baseline: Baseline,
    sink: W,
    dropped_calls: u64,
}

impl<W: Write> Recorder<W> {
    /// Create a recorder and write the header line to `sink`.
    pub fn new(config: CaptureConfig, baseline: Baseline, mut sink: W) -> io::Result<Self> {
        writeln!(sink, "{}", event::HEADER_LINE)?;
        Ok(Self {
            config,
            baseline,
            sink,
            dropped_calls: 0,
        })
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// True once either baseline timestamp is nonzero.
    pub fn has_baseline(&self) -> bool {
        self.baseline.is_set()
    }

    /// Calls dropped so far by the minimum-CPU-duration filter. Totals
    /// derived from the stream undercount by exactly this many calls.
    pub fn dropped_calls(&self) -> u64 {
        self.dropped_calls
    }

    /// Normalize one call's measurements and write its event line.
    ///
    /// Returns without writing when the scaled CPU duration falls below the
    /// configured floor; the drop is counted but otherwise silent, so the
    /// stream simply never carries the call.
    pub fn record_call(&mut self, call: &RawCall) -> io::Result<()> {
        let mut gpu_start = call.gpu_start;
        let mut gpu_duration = call.gpu_duration;
        if self.config.gpu_times && gpu_start != 0 {
            gpu_start -= self.baseline.gpu();
        } else {
            gpu_start = 0;
            gpu_duration = 0;
        }

        let mut cpu_start = call.cpu_start;
        let mut cpu_duration = call.cpu_duration;
        if self.config.cpu_times && cpu_start != 0 {
            // Scale from clock ticks to nanoseconds, truncating like the
            // integer clocks downstream expect.
            let scale = 1.0e9 / self.config.cpu_frequency as f64;
            cpu_start = ((cpu_start - self.baseline.cpu()) as f64 * scale) as i64;
            cpu_duration = (cpu_duration as f64 * scale) as i64;

            if cpu_duration < self.config.min_cpu_time {
                self.dropped_calls += 1;
                tracing::trace!(
                    "dropped call {} ({}): cpu duration {}ns below floor {}ns",
                    call.no,
                    call.name,
                    cpu_duration,
                    self.config.min_cpu_time
                );
                return Ok(());
            }
        } else {
            cpu_start = 0;
            cpu_duration = 0;
        }

        let pixels = if self.config.pixels_drawn {
            call.pixels.map_or(-1, |pixels| pixels as i64)
        } else {
            0
        };

        let record = CallRecord {
            no: call.no,
            name: call.name.to_string(),
            program: call.program.unwrap_or(0),
            pixels,
            gpu_start,
            gpu_duration,
            cpu_start,
            cpu_duration,
        };
        writeln!(self.sink, "{}", event::format_call(&record))
    }

    /// Write one frame boundary marker.
    pub fn record_frame_end(&mut self) -> io::Result<()> {
        writeln!(self.sink, "{}", event::FRAME_END_TAG)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    /// Consume the recorder and hand back the sink.
    pub fn into_sink(self) -> W {
        self.sink
    }
}
