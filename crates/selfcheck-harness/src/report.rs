//! HTML report rendering.
//!
//! A report is one HTML document with two sortable tables, `#all` and
//! `#failed`, followed by overflow blocks for messages that span several
//! lines. Rendering consumes its input: the completed log and the overflow
//! queue are both moved in and nothing is left behind.

use std::collections::VecDeque;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::log_record::LogRecord;

/// Column headers of the all-results table.
pub const ALL_COLUMNS: [&str; 6] = [
    "Date",
    "Method name",
    "Input",
    "Expected log",
    "Received log",
    "Pass/fail",
];

/// Text shown after the first line of a multi-line message.
pub const OVERFLOW_LINK_TEXT: &str = "...(follow link for entire message)";

/// What a render pass drains.
#[derive(Debug, Default)]
pub struct ReportInput {
    /// Completed records in chronological order.
    pub records: VecDeque<LogRecord>,
    /// Overflow blocks already queued; new blocks are appended after them.
    pub overflow: Vec<String>,
}

/// Pass/fail counts for a rendered report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub run_name: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub overflow_blocks: usize,
}

impl ReportSummary {
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A rendered report.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub html: String,
    pub summary: ReportSummary,
}

#[derive(Debug, Clone)]
pub struct ReportRenderer {
    run_name: String,
    asset_prefix: String,
}

impl ReportRenderer {
    #[must_use]
    pub fn new(run_name: impl Into<String>, asset_prefix: impl Into<String>) -> Self {
        Self {
            run_name: run_name.into(),
            asset_prefix: asset_prefix.into(),
        }
    }

    /// Drain `input` into an HTML document.
    #[must_use]
    pub fn render(&self, input: ReportInput) -> RenderedReport {
        let ReportInput {
            records,
            mut overflow,
        } = input;

        let mut html = String::new();
        self.write_head(&mut html);
        html.push_str("<body>\n");
        let _ = writeln!(html, "<h1>Test results for {}</h1>", escape(&self.run_name));

        html.push_str("<h2>All tests</h2>\n");
        write_table_open(&mut html, "all", &ALL_COLUMNS);
        let mut failed = Vec::new();
        let mut passed = 0;
        for record in &records {
            let _ = writeln!(html, "    {}", table_row(record, true, &mut overflow));
            if record.passed() {
                passed += 1;
            } else {
                failed.push(record);
            }
        }
        html.push_str("</tbody>\n</table>\n");

        html.push_str("<h2>Failed tests</h2>\n");
        write_table_open(&mut html, "failed", &ALL_COLUMNS[..5]);
        for record in &failed {
            let _ = writeln!(html, "    {}", table_row(record, false, &mut overflow));
        }
        html.push_str("</tbody>\n</table>\n");

        let overflow_blocks = overflow.len();
        if !overflow.is_empty() {
            html.push_str("<h2>Additional (overflow) results</h2>\n");
            for block in overflow.drain(..) {
                html.push_str(&block);
            }
        }

        html.push_str("</body>\n</html>\n");

        RenderedReport {
            html,
            summary: ReportSummary {
                run_name: self.run_name.clone(),
                total: records.len(),
                passed,
                failed: failed.len(),
                overflow_blocks,
            },
        }
    }

    fn write_head(&self, html: &mut String) {
        let prefix = escape(self.asset_prefix.trim_end_matches('/'));
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(html, "<title>Test results for {}</title>", escape(&self.run_name));
        let _ = writeln!(
            html,
            "<link rel=\"stylesheet\" href=\"{prefix}/style.css\" type=\"text/css\" />"
        );
        let _ = writeln!(
            html,
            "<script type=\"text/javascript\" src=\"{prefix}/jquery-latest.js\"></script>"
        );
        let _ = writeln!(
            html,
            "<script type=\"text/javascript\" src=\"{prefix}/jquery.tablesorter.min.js\"></script>"
        );
        html.push_str(
            "<script type=\"text/javascript\">\n\
             $(document).ready(function() { $(\"#all\").tablesorter(); $(\"#failed\").tablesorter(); });\n\
             </script>\n",
        );
        html.push_str("</head>\n");
    }
}

fn write_table_open(html: &mut String, id: &str, columns: &[&str]) {
    let _ = writeln!(html, "<table id=\"{id}\" class=\"tablesorter\">");
    html.push_str("<thead>\n<tr>\n");
    for column in columns {
        let _ = writeln!(html, "    <th>{column}</th>");
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");
}

fn table_row(record: &LogRecord, with_verdict: bool, overflow: &mut Vec<String>) -> String {
    let expectation = record.expectation();
    let mut row = String::from("<tr>");
    let _ = write!(row, "<td>{}</td>", escape(&record.formatted_timestamp()));
    let _ = write!(row, "<td>{}</td>", escape(expectation.method()));
    let _ = write!(row, "<td>{}</td>", escape(&expectation.argument_list()));
    let _ = write!(
        row,
        "<td>{}</td>",
        message_cell(expectation.expected_message(), overflow)
    );
    let _ = write!(
        row,
        "<td>{}</td>",
        message_cell(record.actual_message(), overflow)
    );
    if with_verdict {
        row.push_str(if record.passed() {
            "<td>Pass</td>"
        } else {
            "<td>Fail</td>"
        });
    }
    row.push_str("</tr>");
    row
}

/// Inline a single-line message, or queue the full text as an overflow block
/// and return its first line plus a link to the block.
fn message_cell(message: &str, overflow: &mut Vec<String>) -> String {
    let Some((first_line, _)) = message.split_once('\n') else {
        return escape(message);
    };
    let index = overflow.len();
    overflow.push(format!(
        "<div class=\"overflow\" id=\"overflow{index}\">\n<h3>Entry {index}</h3>\n<pre>{}</pre>\n</div>\n",
        escape(message)
    ));
    format!(
        "{} <a href=\"#overflow{index}\">{OVERFLOW_LINK_TEXT}</a>",
        escape(first_line.trim_end_matches('\r'))
    )
}

/// Escape text for HTML element and attribute content.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
