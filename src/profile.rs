//! Aggregated statistics model rebuilt from an event stream
//!
//! Three views over one capture session: the ordered call log, per-program
//! accumulators for draw calls, and per-frame spans that partition both the
//! call log and the session's elapsed time.

/// One traced call's normalized timing and workload data.
///
/// All times are nanoseconds relative to the capture baseline. Fields the
/// capture did not measure are zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallRecord {
    /// Sequence number, strictly increasing across the session.
    pub no: u32,
    /// Call identifier, e.g. `glDrawArrays`. Never contains whitespace.
    pub name: String,
    /// Shader program bound when the call executed; 0 when none was.
    pub program: u32,
    /// Pixels the call rasterized. Negative marks a non-draw call, which is
    /// excluded from program statistics.
    pub pixels: i64,
    pub gpu_start: i64,
    pub gpu_duration: i64,
    pub cpu_start: i64,
    pub cpu_duration: i64,
}

impl CallRecord {
    /// Whether this call contributes to program statistics.
    pub fn is_draw(&self) -> bool {
        self.pixels >= 0
    }

    /// End of the call on the GPU clock. In-format lines may carry any
    /// `i64`, so the sum wraps rather than panicking in debug builds.
    pub fn gpu_end(&self) -> i64 {
        self.gpu_start.wrapping_add(self.gpu_duration)
    }

    pub fn cpu_end(&self) -> i64 {
        self.cpu_start.wrapping_add(self.cpu_duration)
    }
}

/// Accumulated totals for the draw calls issued under one program id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramAggregate {
    pub cpu_total: i64,
    pub gpu_total: i64,
    pub pixel_total: i64,
    /// Call-log indices of the contributing calls, in stream order.
    pub calls: Vec<usize>,
}

/// Inclusive range of call-log indices belonging to one frame.
///
/// A frame that closed before any call was logged encodes as
/// `end == begin.wrapping_sub(1)`; the wrap keeps the
/// `begin = previous end + 1` chain consistent across empty frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSpan {
    pub begin: usize,
    pub end: usize,
}

impl CallSpan {
    pub fn len(&self) -> usize {
        self.end.wrapping_sub(self.begin).wrapping_add(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The spanned indices as a half-open range usable for slicing.
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.begin..self.begin + self.len()
    }
}

/// The contiguous slice of the session belonging to one rendered frame.
///
/// Frame timing partitions elapsed time back to back: each frame starts where
/// the previous one ended and absorbs any gap between its calls, so frame
/// durations sum to the full session span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameAggregate {
    /// Zero-based frame number.
    pub no: usize,
    pub gpu_start: i64,
    pub gpu_duration: i64,
    pub cpu_start: i64,
    pub cpu_duration: i64,
    /// Calls belonging to this frame.
    pub calls: CallSpan,
}

impl FrameAggregate {
    pub fn gpu_end(&self) -> i64 {
        self.gpu_start.wrapping_add(self.gpu_duration)
    }

    pub fn cpu_end(&self) -> i64 {
        self.cpu_start.wrapping_add(self.cpu_duration)
    }
}

/// Aggregate root: the call log plus per-program and per-frame rollups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    /// Every call that survived capture, in stream order.
    pub calls: Vec<CallRecord>,
    /// Per-program accumulators indexed by program id. Grown on demand, so
    /// ids never referenced by a draw call stay as zeroed placeholders.
    pub programs: Vec<ProgramAggregate>,
    /// Per-frame accumulators, in frame order.
    pub frames: Vec<FrameAggregate>,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    /// True until the first event lands. The aggregator treats an empty
    /// profile as the start of a new parse session.
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty() && self.calls.is_empty() && self.frames.is_empty()
    }

    /// Programs that accumulated at least one draw call, with their ids.
    /// Skips the placeholders created when the program vector grew past a gap.
    pub fn touched_programs(&self) -> impl Iterator<Item = (usize, &ProgramAggregate)> {
        self.programs
            .iter()
            .enumerate()
            .filter(|(_, program)| !program.calls.is_empty())
    }

    /// Total GPU time over the whole call log, wrapping on overflow.
    pub fn gpu_total(&self) -> i64 {
        self.calls
            .iter()
            .fold(0, |total, call| total.wrapping_add(call.gpu_duration))
    }

    /// Total CPU time over the whole call log, wrapping on overflow.
    pub fn cpu_total(&self) -> i64 {
        self.calls
            .iter()
            .fold(0, |total, call| total.wrapping_add(call.cpu_duration))
    }

    /// The calls belonging to one frame, in stream order.
    pub fn frame_calls(&self, frame: &FrameAggregate) -> &[CallRecord] {
        self.calls.get(frame.calls.indices()).unwrap_or(&[])
    }
}
