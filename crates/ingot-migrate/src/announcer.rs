//! Reporting sinks for migration progress.

use std::io::Write;

use tracing::{error, info};

/// Receives progress, SQL, and failure reports from the processor.
///
/// Every statement is reported through [`sql`](Self::sql) before the
/// preview check, so a sink observing a preview run still sees the full
/// script. Failure messages always arrive through
/// [`error`](Self::error) before the corresponding error is returned to
/// the caller.
pub trait Announcer {
    /// Reports a human-readable progress message.
    fn say(&mut self, message: &str);

    /// Reports a SQL statement about to run or being previewed.
    fn sql(&mut self, sql: &str);

    /// Reports a failure message.
    fn error(&mut self, message: &str);
}

/// Announcer that forwards everything to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAnnouncer;

impl LogAnnouncer {
    /// Creates a new tracing-backed announcer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Announcer for LogAnnouncer {
    fn say(&mut self, message: &str) {
        info!("{message}");
    }

    fn sql(&mut self, sql: &str) {
        info!(sql = %sql, "statement");
    }

    fn error(&mut self, message: &str) {
        error!("{message}");
    }
}

/// Announcer that writes a runnable SQL script.
///
/// Statements are terminated with `;`; progress and failure reports
/// become `--` comments so the output stays loadable by query tools.
#[derive(Debug)]
pub struct ScriptAnnouncer<W: Write> {
    out: W,
}

impl<W: Write> ScriptAnnouncer<W> {
    /// Creates a script announcer over any writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the announcer and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Announcer for ScriptAnnouncer<W> {
    fn say(&mut self, message: &str) {
        let _ = writeln!(self.out, "-- {message}");
    }

    fn sql(&mut self, sql: &str) {
        let _ = writeln!(self.out, "{sql};");
    }

    fn error(&mut self, message: &str) {
        let _ = writeln!(self.out, "-- error: {message}");
    }
}

/// Announcer that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAnnouncer;

impl Announcer for NullAnnouncer {
    fn say(&mut self, _message: &str) {}

    fn sql(&mut self, _sql: &str) {}

    fn error(&mut self, _message: &str) {}
}
