use std::fmt;
use std::io::Write;
use std::str::FromStr;

use clap::ValueEnum;

use crate::error::Result;
use crate::models::ExplainedMatch;

pub const SEPARATOR: &str = "----";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Unknown report format: {s}")),
        }
    }
}

/// Writes explained matches in input order.
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    pub fn write_report<W: Write>(&self, out: &mut W, matches: &[ExplainedMatch]) -> Result<()> {
        match self.format {
            ReportFormat::Text => {
                for explained in matches {
                    write_block(out, explained)?;
                }
            }
            ReportFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, matches)?;
                writeln!(out)?;
            }
        }
        out.flush()?;
        Ok(())
    }

    pub fn render(&self, matches: &[ExplainedMatch]) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_report(&mut buffer, matches)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn write_block<W: Write>(out: &mut W, explained: &ExplainedMatch) -> std::io::Result<()> {
    let result = &explained.result;
    writeln!(out, "Competitor SKU: {}", result.competitor_sku)?;
    writeln!(out, "Our SKU: {}", result.matched_sku)?;
    writeln!(out, "Our Description: {}", result.matched_description)?;
    writeln!(out, "Similarity: {:.4}", result.similarity_score)?;
    writeln!(out, "Explanation: {}", explained.explanation)?;
    writeln!(out, "{SEPARATOR}")
}
