//! Leveled user-facing output.

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warn,
    /// Informational aside: skipped optional steps, tips.
    Note,
    Error,
}

/// Sink for messages meant for the person running the tool.
///
/// Diagnostics for developers go through `tracing` instead.
pub trait Reporter {
    fn report(&mut self, level: Level, message: &str);

    /// Heading that introduces a step.
    fn section(&mut self, title: &str);

    /// Verbatim text, such as the public key.
    fn block(&mut self, text: &str);

    fn info(&mut self, message: &str) {
        self.report(Level::Info, message);
    }

    fn success(&mut self, message: &str) {
        self.report(Level::Success, message);
    }

    fn warn(&mut self, message: &str) {
        self.report(Level::Warn, message);
    }

    fn note(&mut self, message: &str) {
        self.report(Level::Note, message);
    }

    fn error(&mut self, message: &str) {
        self.report(Level::Error, message);
    }
}
