//! Workflow output variables emitted as `::set-output` lines.
use std::{
    fmt::Display,
    io::{self, Stdout, Write},
};

use crate::Result;

pub const PR_VERSION: &str = "PR_version";
pub const PR_RELEASE_IMAGE: &str = "PR_release_image";
pub const PR_RELEASE_INFO: &str = "PR_release_info";
pub const PR_RELEASE_BODY: &str = "PR_release_body";
pub const PR_INCLUDES_RELEASE_ONLY: &str = "PR_includes_release_only";
pub const DEV_RELEASE_BRANCH: &str = "dev_release_branch";
pub const RELEASE_UPDATED: &str = "release_updated";
pub const SENDER_NOT_AUTHORIZED: &str = "sender_not_authorized";
pub const PR_OUTCOME: &str = "pr_outcome";

/// Format a single workflow output line (without trailing newline).
pub fn format_output(name: &str, value: impl Display) -> String {
    format!("::set-output name={name}::{value}")
}

/// Writes workflow output lines to an underlying writer.
pub struct WorkflowOutput<W: Write> {
    writer: W,
}

impl WorkflowOutput<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> WorkflowOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Emit `name=value`.
    pub fn set(&mut self, name: &str, value: impl Display) -> Result<()> {
        writeln!(self.writer, "{}", format_output(name, value))?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_set_output_line() {
        assert_eq!(
            format_output(RELEASE_UPDATED, true),
            "::set-output name=release_updated::true"
        );
    }

    #[test]
    fn writes_one_line_per_output() {
        let mut output = WorkflowOutput::new(Vec::new());
        output.set(PR_VERSION, "1.2.0").unwrap();
        output.set(DEV_RELEASE_BRANCH, true).unwrap();

        let written = String::from_utf8(output.into_inner()).unwrap();
        assert_eq!(
            written,
            "::set-output name=PR_version::1.2.0\n::set-output name=dev_release_branch::true\n"
        );
    }
}
