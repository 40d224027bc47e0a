//! Human-readable status report.

use std::fmt::Write;

use crate::unit::{Assessment, UnitReport};

pub const NO_ERRORS: &str = "No errors found, implementation appears correct.";

fn section(out: &mut String, title: &str, report: Option<&UnitReport>) {
    let body = match report.and_then(UnitReport::first_error) {
        Some(err) => err.to_string(),
        None => NO_ERRORS.to_string(),
    };
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "-".repeat(title.len()));
    for line in body.lines() {
        let _ = writeln!(out, "    {line}");
    }
    out.push('\n');
}

/// Render the report: a header naming the bot, then one section per unit in a fixed order,
/// each holding either [`NO_ERRORS`] or the unit's first error.
pub fn render_status_report(bot_name: &str, assessment: &Assessment) -> String {
    let header = format!("Status report for {bot_name}");
    let mut out = String::new();
    let _ = writeln!(out, "{header}");
    let _ = writeln!(out, "{}", "=".repeat(header.len()));
    out.push('\n');

    section(&mut out, "Condition 1", assessment.condition(1));
    section(&mut out, "Action 1", assessment.action(1));
    section(&mut out, "Condition 2", assessment.condition(2));
    section(&mut out, "Condition 3", assessment.condition(3));
    section(&mut out, "Action 2", assessment.action(2));
    section(&mut out, "Action 3", assessment.action(3));
    section(&mut out, "Action 4", assessment.action(4));
    section(&mut out, "Integration test", Some(&assessment.integration));
    out
}
