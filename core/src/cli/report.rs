use crate::api::RedactionSummary;
use std::fmt;

/// Text report formatter for a redaction run
pub struct TextReport<'a> {
    summary: &'a RedactionSummary,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(summary: &'a RedactionSummary) -> Self {
        Self { summary }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Redaction Summary")?;
        writeln!(f, "=================")?;
        writeln!(f)?;
        writeln!(f, "Output: {}", self.summary.output.display())?;
        writeln!(f)?;

        for file in &self.summary.files {
            writeln!(
                f,
                "{}: {} region(s) redacted",
                file.path.display(),
                file.boxes_redacted
            )?;
        }
        for failure in &self.summary.failures {
            writeln!(f, "{}: FAILED ({})", failure.path.display(), failure.error)?;
        }

        let total: usize = self.summary.files.iter().map(|r| r.boxes_redacted).sum();
        writeln!(f)?;
        write!(
            f,
            "{} file(s) redacted, {} region(s), {} failure(s)",
            self.summary.files.len(),
            total,
            self.summary.failures.len()
        )
    }
}
