use crate::domain::models::{ModuleStats, RunSummary};
use std::io::Write;

const OUTPUT_SEP_LEN: usize = 100;

/// Formats the coverage report and owns the run-wide summary. The sink is
/// injected so tests can capture the exact bytes the tool would print.
pub struct Reporter<W: Write> {
    out: W,
    summary: RunSummary,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            summary: RunSummary::default(),
        }
    }

    fn separator(&mut self) -> anyhow::Result<()> {
        writeln!(self.out, "{}", "-".repeat(OUTPUT_SEP_LEN))?;
        Ok(())
    }

    pub fn print_header(&mut self) -> anyhow::Result<()> {
        self.separator()?;
        writeln!(
            self.out,
            "\t{:<17}\t{:<10}\t{:<10}\t{:<10}\t{:<10}\t",
            "Module", "Code lines", "Test lines", "Asserts", "Ratio (%)"
        )?;
        self.separator()?;
        Ok(())
    }

    pub fn print_line(&mut self, text: &str) -> anyhow::Result<()> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    /// Prints one report row and folds the module into the summary. Each
    /// module must be recorded exactly once.
    pub fn record_and_print(&mut self, name: &str, stats: &ModuleStats) -> anyhow::Result<()> {
        let ratio = stats.ratio();
        self.summary.record(name, ratio);
        writeln!(
            self.out,
            "\t{:<17}\t{:>10}\t{:>10}\t{:>10}\t{:.6}%",
            name, stats.code_lines, stats.test_lines, stats.asserts, ratio
        )?;
        Ok(())
    }

    pub fn print_summary(&mut self) -> anyhow::Result<()> {
        self.separator()?;
        writeln!(self.out, "Overall Stats:")?;
        match self.summary.average() {
            Some(avg) => writeln!(self.out, "\tAverage ratio: {avg:.6}%")?,
            None => writeln!(self.out, "\tAverage ratio: n/a (no modules with assertions)")?,
        }
        if let Some(best) = &self.summary.best_module {
            writeln!(
                self.out,
                "\tBest ratio: {:.6}% ({} module)",
                self.summary.best_ratio, best
            )?;
        }
        writeln!(
            self.out,
            "\tThe following {} modules have no tests at all: {}",
            self.summary.testless.len(),
            self.summary.testless.join(", ")
        )?;
        Ok(())
    }
}
