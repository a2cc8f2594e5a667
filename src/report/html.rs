use super::types::TestResults;
use anyhow::Result;
use std::path::Path;

/// Generate HTML report
pub fn generate(results: &TestResults, output: Option<&Path>) -> Result<()> {
    let html = generate_html(results);

    if let Some(path) = output {
        std::fs::write(path, html)?;
        println!("HTML report saved to: {}", path.display());
    } else {
        println!("{}", html);
    }

    Ok(())
}

fn generate_html(results: &TestResults) -> String {
    let summary = &results.summary;
    let pass_rate = format!("{:.1}", summary.success_rate);

    let mut cases_html = String::new();
    for (i, result) in results.results.iter().enumerate() {
        let (status_icon, status_class) = if result.success {
            ("✓", "passed")
        } else {
            ("✗", "failed")
        };

        let details_html = result
            .details
            .as_deref()
            .map(|d| format!(r#"<div class="details">{}</div>"#, html_escape(d)))
            .unwrap_or_default();

        cases_html.push_str(&format!(
            r#"
            <div class="case {status_class}">
                <div class="case-icon">{status_icon}</div>
                <div class="case-content">
                    <div class="case-name">{index}. {name}</div>
                    <div class="case-message">{message}</div>
                    <div class="case-meta">
                        <span class="duration">{duration}</span>
                        <span class="timestamp">{timestamp}</span>
                    </div>
                    {details_html}
                </div>
            </div>
        "#,
            index = i + 1,
            name = html_escape(&result.test),
            message = html_escape(&result.message),
            duration = format_duration(result.duration_ms),
            timestamp = html_escape(&result.timestamp),
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Conformance Report - {session}</title>
    <style>
        :root {{
            --bg: #0f172a;
            --panel: #1e293b;
            --border: #334155;
            --text: #f1f5f9;
            --muted: #94a3b8;
            --green: #10b981;
            --red: #ef4444;
        }}
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        body {{
            font-family: system-ui, -apple-system, sans-serif;
            background: var(--bg);
            color: var(--text);
            line-height: 1.5;
            padding: 2.5rem 1rem;
        }}
        .container {{ max-width: 960px; margin: 0 auto; }}
        h1 {{ font-size: 2rem; font-weight: 800; margin-bottom: 0.25rem; }}
        .target {{ color: var(--muted); margin-bottom: 2rem; font-family: monospace; }}
        .summary {{
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
            gap: 1rem;
            margin-bottom: 2rem;
        }}
        .stat {{
            background: var(--panel);
            border: 1px solid var(--border);
            border-radius: 0.75rem;
            padding: 1.25rem;
        }}
        .stat-value {{ font-size: 2rem; font-weight: 800; }}
        .stat-label {{ color: var(--muted); font-size: 0.8rem; text-transform: uppercase; }}
        .stat.passed .stat-value {{ color: var(--green); }}
        .stat.failed .stat-value {{ color: var(--red); }}
        .case {{
            display: flex;
            gap: 1rem;
            background: var(--panel);
            border: 1px solid var(--border);
            border-radius: 0.75rem;
            padding: 1rem;
            margin-bottom: 0.75rem;
        }}
        .case-icon {{ font-size: 1.25rem; width: 2rem; text-align: center; }}
        .case.passed .case-icon {{ color: var(--green); }}
        .case.failed .case-icon {{ color: var(--red); }}
        .case-name {{ font-weight: 700; }}
        .case-meta {{ display: flex; gap: 1rem; color: var(--muted); font-size: 0.75rem; }}
        .details {{
            margin-top: 0.5rem;
            padding: 0.5rem 0.75rem;
            border-radius: 0.5rem;
            background: rgba(0, 0, 0, 0.25);
            font-family: monospace;
            font-size: 0.8rem;
            white-space: pre-wrap;
            word-break: break-all;
        }}
        .case.failed .details {{ color: #fca5a5; }}
        .meta {{ margin-top: 2rem; color: var(--muted); font-size: 0.8rem; text-align: center; }}
    </style>
</head>
<body>
    <div class="container">
        <h1>Benefits API Conformance</h1>
        <div class="target">{base_url}</div>

        <div class="summary">
            <div class="stat">
                <div class="stat-value">{total}</div>
                <div class="stat-label">Total Tests</div>
            </div>
            <div class="stat passed">
                <div class="stat-value">{passed}</div>
                <div class="stat-label">Passed</div>
            </div>
            <div class="stat failed">
                <div class="stat-value">{failed}</div>
                <div class="stat-label">Failed</div>
            </div>
            <div class="stat">
                <div class="stat-value">{pass_rate}%</div>
                <div class="stat-label">Success Rate</div>
            </div>
        </div>

        {cases_html}

        <div class="meta">Session {session} · {duration} · Generated {generated}</div>
    </div>
</body>
</html>"#,
        session = html_escape(&results.session_id),
        base_url = html_escape(&results.base_url),
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        pass_rate = pass_rate,
        cases_html = cases_html,
        duration = format_duration(summary.duration_ms.unwrap_or(0)),
        generated = html_escape(&results.generated_at),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let minutes = ms / 60000;
        let seconds = (ms % 60000) as f64 / 1000.0;
        format!("{}m {:.0}s", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::state::{SuiteSummary, TestResult};

    #[test]
    fn test_html_escapes_response_bodies() {
        let results = vec![TestResult {
            test: "Admin CSV Export".to_string(),
            success: false,
            message: "HTTP 500".to_string(),
            details: Some("<h1>Internal Server Error</h1>".to_string()),
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
            duration_ms: 42,
        }];
        let results = TestResults {
            session_id: "s-1".to_string(),
            base_url: "http://localhost:3000".to_string(),
            summary: SuiteSummary::from_results(&results, Some(2500)),
            results,
            generated_at: "2026-01-01 00:00:01".to_string(),
        };

        let html = generate_html(&results);
        assert!(html.contains("&lt;h1&gt;Internal Server Error&lt;/h1&gt;"));
        assert!(html.contains(r#"<div class="case failed">"#));
        assert!(html.contains("0.0%"));
        assert!(html.contains("2.5s"));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(999), "999ms");
        assert_eq!(format_duration(1500), "1.5s");
        assert_eq!(format_duration(61_000), "1m 1s");
    }
}
