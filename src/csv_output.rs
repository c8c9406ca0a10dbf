//! CSV output format for spreadsheet analysis and machine parsing

use crate::profile::Profile;

/// Escape a CSV field (handle commas, quotes, newlines)
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// One row per call of the log, in stream order.
pub fn calls_to_csv(profile: &Profile) -> String {
    let mut output =
        String::from("no,name,program,pixels,gpu_start,gpu_duration,cpu_start,cpu_duration\n");

    for call in &profile.calls {
        output.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            call.no,
            escape_field(&call.name),
            call.program,
            call.pixels,
            call.gpu_start,
            call.gpu_duration,
            call.cpu_start,
            call.cpu_duration
        ));
    }

    output
}

/// One row per program that accumulated draw calls, by ascending id.
pub fn programs_to_csv(profile: &Profile) -> String {
    let mut output = String::from("program,calls,gpu_total,cpu_total,pixel_total\n");

    for (id, program) in profile.touched_programs() {
        output.push_str(&format!(
            "{},{},{},{},{}\n",
            id,
            program.calls.len(),
            program.gpu_total,
            program.cpu_total,
            program.pixel_total
        ));
    }

    output
}
