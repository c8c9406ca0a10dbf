//! Text report rendering for an aggregated profile

use crate::filter::CallFilter;
use crate::profile::{CallRecord, Profile, ProgramAggregate};

/// Options controlling the text report.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Include the per-call listing.
    pub calls: bool,
    /// Rows shown in the per-call listing; 0 means no limit.
    pub top: usize,
    /// Restricts the per-call listing by call name.
    pub filter: CallFilter,
    /// Restricts the per-call listing to one program id.
    pub program: Option<u32>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            calls: false,
            top: 20,
            filter: CallFilter::all(),
            program: None,
        }
    }
}

fn seconds(nanos: i64) -> f64 {
    nanos as f64 / 1_000_000_000.0
}

/// Program totals come from an untrusted stream, so table sums wrap rather
/// than panicking in debug builds.
fn wrapping_sum(
    rows: &[(usize, &ProgramAggregate)],
    pick: fn(&ProgramAggregate) -> i64,
) -> i64 {
    rows.iter()
        .fold(0, |total, &(_, program)| total.wrapping_add(pick(program)))
}

/// Print the full text report to stdout.
pub fn print_report(profile: &Profile, skipped_lines: u64, options: &ReportOptions) {
    if profile.is_empty() {
        println!("No events aggregated.");
        if skipped_lines > 0 {
            println!("{} malformed lines skipped", skipped_lines);
        }
        return;
    }

    print_session_summary(profile, skipped_lines);
    print_program_table(profile);
    print_frame_table(profile);
    if options.calls {
        print_call_table(profile, options);
    }
}

fn print_session_summary(profile: &Profile, skipped_lines: u64) {
    let frames = profile.frames.len();
    let gpu_total = profile.gpu_total();
    let cpu_total = profile.cpu_total();

    println!(
        "Rendered {} frames, {} calls, {} programs",
        frames,
        profile.calls.len(),
        profile.touched_programs().count()
    );

    if frames > 0 && gpu_total > 0 {
        let secs = seconds(gpu_total);
        println!(
            "{:.6} secs of GPU time, average of {:.1} fps",
            secs,
            frames as f64 / secs
        );
    }
    if cpu_total > 0 {
        println!(
            "{:.6} secs of CPU time (calls below the capture floor are not included)",
            seconds(cpu_total)
        );
    }
    if skipped_lines > 0 {
        println!("{} malformed lines skipped", skipped_lines);
    }
    println!();
}

fn print_program_table(profile: &Profile) {
    let mut rows: Vec<(usize, &ProgramAggregate)> = profile.touched_programs().collect();
    if rows.is_empty() {
        println!("No draw calls attributed to any program.");
        println!();
        return;
    }

    let gpu_sum = wrapping_sum(&rows, |program| program.gpu_total);
    let cpu_sum = wrapping_sum(&rows, |program| program.cpu_total);
    // Captures without GPU timing fall back to CPU time for the share column.
    let share = |program: &ProgramAggregate| {
        if gpu_sum > 0 {
            program.gpu_total
        } else {
            program.cpu_total
        }
    };
    let share_sum = if gpu_sum > 0 { gpu_sum } else { cpu_sum };

    rows.sort_by(|a, b| share(b.1).cmp(&share(a.1)));

    println!("% time     gpu (s)     cpu (s)     calls       pixels program");
    println!("------ ----------- ----------- --------- ------------ -------");
    for &(id, program) in &rows {
        let percent = if share_sum > 0 {
            share(program) as f64 / share_sum as f64 * 100.0
        } else {
            0.0
        };
        println!(
            "{:6.2} {:>11.6} {:>11.6} {:>9} {:>12} {:>7}",
            percent,
            seconds(program.gpu_total),
            seconds(program.cpu_total),
            program.calls.len(),
            program.pixel_total,
            id
        );
    }

    println!("------ ----------- ----------- --------- ------------ -------");
    let total_calls: usize = rows.iter().map(|(_, program)| program.calls.len()).sum();
    let total_pixels = wrapping_sum(&rows, |program| program.pixel_total);
    println!(
        "100.00 {:>11.6} {:>11.6} {:>9} {:>12} total",
        seconds(gpu_sum),
        seconds(cpu_sum),
        total_calls,
        total_pixels
    );
    println!();
}

fn print_frame_table(profile: &Profile) {
    if profile.frames.is_empty() {
        return;
    }

    println!(" frame     calls   start (s)     gpu (s)     cpu (s)");
    println!("------ --------- ----------- ----------- -----------");
    for frame in &profile.frames {
        println!(
            "{:6} {:>9} {:>11.6} {:>11.6} {:>11.6}",
            frame.no,
            frame.calls.len(),
            seconds(frame.gpu_start),
            seconds(frame.gpu_duration),
            seconds(frame.cpu_duration)
        );
    }
    println!();
}

/// Calls shown by the per-call listing, most expensive first.
fn selected_calls<'a>(profile: &'a Profile, options: &ReportOptions) -> Vec<&'a CallRecord> {
    let mut selected: Vec<&CallRecord> = profile
        .calls
        .iter()
        .filter(|call| options.filter.matches(&call.name))
        .filter(|call| options.program.map_or(true, |id| call.program == id))
        .collect();

    selected.sort_by(|a, b| {
        (b.gpu_duration, b.cpu_duration, a.no).cmp(&(a.gpu_duration, a.cpu_duration, b.no))
    });
    if options.top > 0 {
        selected.truncate(options.top);
    }
    selected
}

fn print_call_table(profile: &Profile, options: &ReportOptions) {
    let selected = selected_calls(profile, options);
    if selected.is_empty() {
        println!("No calls match the filter.");
        return;
    }

    println!("  call    gpu (ns)    cpu (ns)       pixels program name");
    println!("------ ----------- ----------- ------------ ------- ----------------");
    for call in selected {
        println!(
            "{:>6} {:>11} {:>11} {:>12} {:>7} {}",
            call.no, call.gpu_duration, call.cpu_duration, call.pixels, call.program, call.name
        );
    }
}
