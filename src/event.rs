//! Line-oriented event stream shared by the recorder and the aggregator
//!
//! One event per line, fields separated by whitespace. The stream carries two
//! event kinds: per-call timing records (`call`) and frame boundary markers
//! (`frame_end`). Lines starting with `#` are comments; the header the
//! recorder emits at capture time is one.

use thiserror::Error;

use crate::profile::CallRecord;

/// Header line written once at the start of every capture, before any events.
pub const HEADER_LINE: &str = "# call no gpu_start gpu_dura cpu_start cpu_dura pixels program name";

/// Tag of a per-call timing record.
pub const CALL_TAG: &str = "call";

/// Tag of a frame boundary marker.
pub const FRAME_END_TAG: &str = "frame_end";

/// Lines shorter than this carry no event and are skipped without parsing.
pub const MIN_EVENT_LINE_LEN: usize = 4;

/// One decoded event line.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A per-call timing record.
    Call(CallRecord),
    /// A frame boundary marker.
    FrameEnd,
}

/// Error for a line that carries the `call` tag but malformed fields.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EventParseError {
    #[error("call event ended before the `{0}` field")]
    MissingField(&'static str),

    #[error("call event field `{field}` is not a valid integer: {value:?}")]
    InvalidField { field: &'static str, value: String },
}

/// Decode one line of the event stream.
///
/// Returns `Ok(None)` for lines the format ignores: comments, lines shorter
/// than [`MIN_EVENT_LINE_LEN`], and unknown tags. Returns an error only when
/// a line claims to be a call record but its fields do not parse; the caller
/// decides whether to skip the line or abort.
pub fn parse_line(line: &str) -> Result<Option<Event>, EventParseError> {
    let line = line.trim_end();
    if line.len() < MIN_EVENT_LINE_LEN || line.starts_with('#') {
        return Ok(None);
    }

    let mut fields = line.split_whitespace();
    match fields.next() {
        Some(CALL_TAG) => parse_call_fields(&mut fields).map(|call| Some(Event::Call(call))),
        Some(FRAME_END_TAG) => Ok(Some(Event::FrameEnd)),
        _ => Ok(None),
    }
}

fn parse_call_fields<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
) -> Result<CallRecord, EventParseError> {
    let no = numeric_field(fields, "no")?;
    let gpu_start = numeric_field(fields, "gpu_start")?;
    let gpu_duration = numeric_field(fields, "gpu_dura")?;
    let cpu_start = numeric_field(fields, "cpu_start")?;
    let cpu_duration = numeric_field(fields, "cpu_dura")?;
    let pixels = numeric_field(fields, "pixels")?;
    let program = numeric_field(fields, "program")?;
    let name = fields
        .next()
        .ok_or(EventParseError::MissingField("name"))?
        .to_string();

    Ok(CallRecord {
        no,
        name,
        program,
        pixels,
        gpu_start,
        gpu_duration,
        cpu_start,
        cpu_duration,
    })
}

fn numeric_field<'a, T: std::str::FromStr>(
    fields: &mut impl Iterator<Item = &'a str>,
    name: &'static str,
) -> Result<T, EventParseError> {
    let raw = fields.next().ok_or(EventParseError::MissingField(name))?;
    raw.parse().map_err(|_| EventParseError::InvalidField {
        field: name,
        value: raw.to_string(),
    })
}

/// Encode one call record as an event line, without a trailing newline.
pub fn format_call(call: &CallRecord) -> String {
    format!(
        "{} {} {} {} {} {} {} {} {}",
        CALL_TAG,
        call.no,
        call.gpu_start,
        call.gpu_duration,
        call.cpu_start,
        call.cpu_duration,
        call.pixels,
        call.program,
        call.name
    )
}
