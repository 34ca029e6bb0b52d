use std::io::{self, Write};

use colored::Colorize;
use tracing::info;

use super::validator::{EndpointReport, ValidationOutcome};

/// Prints endpoint reports. Passing endpoints print nothing.
pub struct Reporter<W: Write> {
    out: W,
    color: bool,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout(), true)
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn report(&mut self, report: &EndpointReport) -> io::Result<()> {
        match &report.outcome {
            ValidationOutcome::Pass => {
                info!("✓ {} feed passed validation: {}", report.kind, report.url);
            }
            ValidationOutcome::Violations(violations) => {
                let header = format!("Validation error encountered for {}", report.url);
                if self.color {
                    writeln!(self.out, "{}", header.red().bold())?;
                } else {
                    writeln!(self.out, "{header}")?;
                }
                for violation in violations {
                    writeln!(self.out, "{violation}")?;
                }
            }
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
