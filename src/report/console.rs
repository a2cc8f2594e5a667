//! Console presentation of suite results
//!
//! Pure formatting: every function returns the text, callers decide where it goes.

use crate::runner::state::{SuiteReport, TestResult};
use colored::Colorize;

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Header printed before the first case
pub fn banner(base_url: &str, session_id: &str, case_count: usize) -> String {
    format!(
        "{} Starting benefits API conformance tests\nBase URL: {}\nSession: {}\nCases: {}\nTimestamp: {}\n{}\n",
        "🚀".bold(),
        base_url.cyan(),
        session_id,
        case_count,
        chrono::Local::now().to_rfc3339(),
        rule()
    )
}

/// One line per finished case, plus details when present
pub fn result_line(result: &TestResult) -> String {
    let status = if result.success {
        "✅ PASS".green().bold()
    } else {
        "❌ FAIL".red().bold()
    };

    let mut line = format!("{}: {} - {}", status, result.test, result.message);
    if let Some(details) = &result.details {
        line.push_str(&format!("\n   Details: {}", details.dimmed()));
    }
    line.push('\n');
    line
}

/// Final summary: counts, rate, failing cases with messages, passing cases
pub fn summary(report: &SuiteReport) -> String {
    let s = &report.summary;
    let mut out = String::new();

    out.push_str(&format!("{}\n📊 TEST SUMMARY\n{}\n", rule(), rule()));
    out.push_str(&format!("Total Tests: {}\n", s.total));
    out.push_str(&format!("Passed: {}\n", s.passed.to_string().green()));
    out.push_str(&format!("Failed: {}\n", s.failed.to_string().red()));
    out.push_str(&format!("Success Rate: {:.1}%\n", s.success_rate));
    if let Some(duration) = s.duration_ms {
        out.push_str(&format!("Duration: {}ms\n", duration));
    }
    out.push('\n');

    if s.failed > 0 {
        out.push_str(&format!("{}\n", "❌ FAILED TESTS:".red().bold()));
        for result in report.failures() {
            out.push_str(&format!("  - {}: {}\n", result.test, result.message));
        }
        out.push('\n');
    }

    out.push_str(&format!("{}\n", "✅ PASSED TESTS:".green().bold()));
    for result in report.passes() {
        out.push_str(&format!("  - {}\n", result.test));
    }

    out
}
