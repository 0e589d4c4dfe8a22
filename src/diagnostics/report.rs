//! Diagnostic and crash reports
//!
//! Two report shapes exist:
//! - `DiagnosticReport` - free-text sections the add-on contributes to the
//!   host's environment report, built on demand and on every crash
//! - `CrashReport` - one fatal fault, built only at the dispatcher boundary
//!   and handed to the host through the `FatalSink` seam

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One named free-text section of a diagnostic report
#[derive(Debug, Clone, Serialize)]
pub struct ReportSection {
    pub title: String,
    pub body: String,
}

/// Ordered collection of named diagnostic sections
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiagnosticReport {
    sections: Vec<ReportSection>,
}

impl DiagnosticReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named section
    pub fn add_section(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.sections.push(ReportSection {
            title: title.into(),
            body: body.into(),
        });
    }

    /// The sections in append order
    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    /// Check if the report has no sections
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "-- {} --", section.title)?;
            writeln!(f, "{}", section.body)?;
        }
        Ok(())
    }
}

/// A fatal fault raised inside a hook body
///
/// Carries the hook's event name, the normalized cause, the time of the
/// fault, and the full diagnostic report taken at that moment.
#[derive(Debug)]
pub struct CrashReport {
    event: String,
    cause: anyhow::Error,
    timestamp: DateTime<Utc>,
    report: DiagnosticReport,
}

impl CrashReport {
    /// Build a crash report for a faulting hook
    pub fn new(event: impl Into<String>, cause: anyhow::Error, report: DiagnosticReport) -> Self {
        Self {
            event: event.into(),
            cause,
            timestamp: Utc::now(),
            report,
        }
    }

    /// Name of the hook that faulted
    pub fn event(&self) -> &str {
        &self.event
    }

    /// The normalized fault cause
    pub fn cause(&self) -> &anyhow::Error {
        &self.cause
    }

    /// When the fault was recorded
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Diagnostic sections captured with the fault
    pub fn report(&self) -> &DiagnosticReport {
        &self.report
    }
}

impl fmt::Display for CrashReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Exception in capture hook '{}' at {}: {}",
            self.event,
            self.timestamp.to_rfc3339(),
            self.cause
        )?;
        write!(f, "{}", self.report)
    }
}

/// The host's fatal-error path
///
/// The dispatcher calls this exactly once per fatal fault, after stopping the
/// session. Hosts install their own implementation; the default logs.
pub trait FatalSink {
    /// Deliver a crash report to the host
    fn crashed(&self, report: CrashReport);
}

/// Default `FatalSink` that logs the report at error level
#[derive(Debug, Default)]
pub struct LogFatalSink;

impl FatalSink for LogFatalSink {
    fn crashed(&self, report: CrashReport) {
        tracing::error!("[FatalSink] {}", report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_sections_ordered() {
        let mut report = DiagnosticReport::new();
        report.add_section("First", "one");
        report.add_section("Second", "two");

        assert_eq!(report.sections().len(), 2);
        assert_eq!(report.sections()[0].title, "First");

        let rendered = report.to_string();
        assert!(rendered.find("First").unwrap() < rendered.find("Second").unwrap());
    }

    #[test]
    fn test_crash_report_display() {
        let mut diag = DiagnosticReport::new();
        diag.add_section("World Capture Add-on", "state: Active");

        let crash = CrashReport::new("tick", anyhow::anyhow!("boom"), diag);
        let rendered = crash.to_string();

        assert!(rendered.contains("capture hook 'tick'"));
        assert!(rendered.contains("boom"));
        assert!(rendered.contains("state: Active"));
    }
}
