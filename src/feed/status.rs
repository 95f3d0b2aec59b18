use crate::feed::error::Diagnostic;
use std::fmt::Display;
use std::io::Write;

/// Human-readable progress lines, kept apart from the feed itself.
///
/// A silent channel discards the lines but still collects diagnostics. A
/// stream that fails to accept a line is dropped and the channel goes silent;
/// the feed never depends on it.
pub struct StatusChannel<'a> {
    out: Option<&'a mut dyn Write>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> StatusChannel<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self {
            out: Some(out),
            diagnostics: Vec::new(),
        }
    }

    pub fn silent() -> Self {
        Self {
            out: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn progress<T: Display>(&mut self, line: T) {
        let Some(out) = self.out.as_mut() else {
            return;
        };
        if let Err(error) = writeln!(out, "{line}") {
            tracing::warn!(%error, "status stream closed, continuing without progress lines");
            self.out = None;
        }
    }

    /// Records a diagnostic and reports it as a warning line.
    pub fn warn(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(%diagnostic, "degraded entry");
        self.progress(format_args!("      WARNING: {diagnostic}"));
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
