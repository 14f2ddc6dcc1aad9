//! Report command
//!
//! Reads newline-delimited lifecycle records and forwards them through a
//! `Reporter`, so test runners in any language can report by piping JSON:
//!
//! ```text
//! {"event": "start", "payload": {...}, "tests": [{"test_id": "..."}]}
//! {"event": "call", "payload": {...}}
//! {"event": "end"}
//! ```

use colored::*;
use eyre::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use testinel::Reporter;
use testinel::config::Config;
use testinel::envelope::{END_EVENT, START_EVENT};

/// One input line
#[derive(Debug, Deserialize)]
struct LifecycleRecord {
    event: String,
    #[serde(default)]
    payload: Option<serde_json::Value>,
    #[serde(default)]
    tests: Option<Vec<serde_json::Value>>,
}

/// What was forwarded
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub events: usize,
    pub ended: bool,
    /// Records after `end`, which the sink can no longer take
    pub skipped: usize,
}

pub fn run(
    dsn: Option<&str>,
    input: Option<PathBuf>,
    indent: Option<usize>,
    insecure: bool,
    quiet: bool,
    config: &Config,
) -> Result<()> {
    let dsn = super::destination(dsn, config)?;

    let mut options = config.reporter.sink.clone();
    if indent.is_some() {
        options.file_indent = indent;
    }
    options.insecure_skip_verify |= insecure;

    let mut reporter = Reporter::with_options(&dsn, &options)?;

    let summary = match input {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
            forward(BufReader::new(file), &mut reporter)?
        }
        None => forward(io::stdin().lock(), &mut reporter)?,
    };

    if summary.skipped > 0 {
        eprintln!(
            "{} Skipped {} record(s) after the end record",
            "⚠".yellow(),
            summary.skipped
        );
    }

    if !quiet {
        println!(
            "{} Reported {} event(s) for run {} via {} sink",
            "✓".green(),
            summary.events,
            reporter.run_id().dimmed(),
            reporter.sink_name().cyan()
        );
    }

    Ok(())
}

/// Forward every record from `reader`, closing the run at EOF if needed
pub fn forward<R: BufRead>(reader: R, reporter: &mut Reporter) -> Result<ReportSummary> {
    let mut summary = ReportSummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Failed to read line {}", line_no))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let record: LifecycleRecord =
            serde_json::from_str(trimmed).with_context(|| format!("Invalid lifecycle record on line {}", line_no))?;

        if summary.ended {
            log::warn!("Skipping '{}' record on line {}: run already ended", record.event, line_no);
            summary.skipped += 1;
            continue;
        }

        let payload = record.payload.unwrap_or_else(|| serde_json::json!({}));

        match record.event.as_str() {
            START_EVENT => {
                if let Some(tests) = record.tests {
                    reporter.set_tests(tests);
                }
                reporter.report_start(payload)?;
            }
            END_EVENT => {
                reporter.report_end()?;
                summary.ended = true;
            }
            kind => reporter.report_event(kind, payload)?,
        }
        summary.events += 1;
    }

    if !summary.ended {
        log::warn!("Input ended without an end record, closing run {}", reporter.run_id());
        reporter.report_end()?;
        summary.events += 1;
        summary.ended = true;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use testinel::MemorySink;

    fn memory_reporter() -> (Reporter, MemorySink) {
        let sink = MemorySink::new();
        (Reporter::with_sink("memory", Box::new(sink.clone())), sink)
    }

    #[test]
    fn test_forward_full_run() {
        let (mut reporter, sink) = memory_reporter();
        let input = r#"{"event": "start", "payload": {"run": 1}, "tests": [{"test_id": "a::b::c"}]}

{"event": "call", "payload": {"ok": true}}
{"event": "end"}
"#;

        let summary = forward(input.as_bytes(), &mut reporter).unwrap();
        assert_eq!(
            summary,
            ReportSummary {
                events: 3,
                ended: true,
                skipped: 0
            }
        );

        let events = sink.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].tests, Some(vec![json!({"test_id": "a::b::c"})]));
        assert_eq!(events[1].event, "call");
        assert_eq!(events[2].event, "end");
        assert_eq!(sink.end_calls(), 1);
    }

    #[test]
    fn test_forward_closes_run_at_eof() {
        let (mut reporter, sink) = memory_reporter();

        let summary = forward(r#"{"event": "start"}"#.as_bytes(), &mut reporter).unwrap();
        assert_eq!(summary.events, 2);

        let events = sink.events();
        assert_eq!(events[0].payload, Some(json!({})));
        assert_eq!(events[1].event, "end");
        assert_eq!(sink.end_calls(), 1);
    }

    #[test]
    fn test_forward_rejects_malformed_line() {
        let (mut reporter, _sink) = memory_reporter();
        let input = "{\"event\": \"start\"}\nnot json\n";

        let err = forward(input.as_bytes(), &mut reporter).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_forward_skips_records_after_end() {
        let (mut reporter, sink) = memory_reporter();
        let input = "{\"event\": \"start\"}\n{\"event\": \"end\"}\n{\"event\": \"call\"}\n{\"event\": \"end\"}\n";

        let summary = forward(input.as_bytes(), &mut reporter).unwrap();
        assert_eq!(summary.events, 2);
        assert_eq!(summary.skipped, 2);

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].event, "end");
        assert_eq!(sink.end_calls(), 1);
    }
}
