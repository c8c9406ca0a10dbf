//! Frameprof - call, program, and frame profiler core for trace replays
//!
//! This library provides both halves of the replay profiling pipeline: a
//! recorder that normalizes raw per-call measurements into a line-oriented
//! event stream while a trace replays, and an aggregator that rebuilds the
//! stream into per-call, per-program, and per-frame statistics.

pub mod aggregator;
pub mod cli;
pub mod csv_output;
pub mod event;
pub mod filter;
pub mod json_output;
pub mod profile;
pub mod recorder;
pub mod report;
