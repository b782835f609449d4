use crate::io::output::OutputWriter;
use crate::report::{AnalysisReport, MetricsRecord, UnitSummary};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use std::io::Write;

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn print_header(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "CODEGAUGE ANALYSIS".bold().cyan())?;
        writeln!(
            self.writer,
            "{} units analyzed, {} failed, {} functions",
            report.analyzed_unit_count(),
            report.failed_units.len(),
            report.records.len()
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_units(&mut self, summaries: &[UnitSummary]) -> anyhow::Result<()> {
        if summaries.is_empty() {
            return Ok(());
        }
        let mut table = new_table(vec![
            "File", "Language", "Lines", "Comments", "Functions", "Avg CC", "Max CC", "Grade", "MI",
        ]);
        for summary in summaries {
            table.add_row(vec![
                Cell::new(summary.path.display()),
                Cell::new(summary.language),
                Cell::new(summary.total_lines),
                Cell::new(format!("{:.1}%", summary.comment_ratio * 100.0)),
                Cell::new(summary.function_count),
                Cell::new(format!("{:.2}", summary.average_complexity)),
                Cell::new(summary.max_complexity),
                Cell::new(summary.efficiency_grade),
                Cell::new(format_mi(summary.maintainability_index)),
            ]);
        }
        writeln!(self.writer, "{table}")?;
        Ok(())
    }

    fn print_functions(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        for summary in &report.summaries {
            let mut records = report.records_in(&summary.path).peekable();
            if records.peek().is_none() {
                continue;
            }
            writeln!(self.writer, "{}", summary.path.display().to_string().bold())?;
            let mut table = new_table(vec![
                "Function", "Line", "CC", "Loops", "Depth", "Estimate", "MI", "Flags",
            ]);
            for record in records {
                table.add_row(vec![
                    Cell::new(&record.id.name),
                    Cell::new(record.id.line),
                    Cell::new(record.cyclomatic),
                    Cell::new(record.loop_count),
                    Cell::new(record.max_loop_depth),
                    Cell::new(record.complexity_label),
                    Cell::new(format_mi(record.maintainability_index)),
                    Cell::new(flags(record)),
                ]);
            }
            writeln!(self.writer, "{table}")?;
        }
        Ok(())
    }

    fn print_critical(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let mut critical = report.critical_records().peekable();
        if critical.peek().is_none() {
            return Ok(());
        }
        writeln!(self.writer, "{}", "Critical functions".bold().red())?;
        for record in critical {
            let reasons: Vec<String> = record
                .critical_reasons
                .iter()
                .map(ToString::to_string)
                .collect();
            writeln!(
                self.writer,
                "  {} (CC {}, {} lines): {}",
                record.id,
                record.cyclomatic,
                record.length,
                reasons.join(", ")
            )?;
        }
        Ok(())
    }

    fn print_dead_code(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        if !report.unused_functions.is_empty() {
            writeln!(self.writer, "{}", "Unused functions".bold().yellow())?;
            for id in &report.unused_functions {
                writeln!(self.writer, "  {id}")?;
            }
        }
        if !report.unused_variables.is_empty() {
            writeln!(self.writer, "{}", "Unused variables".bold().yellow())?;
            for var in &report.unused_variables {
                let scope = var.function.as_deref().unwrap_or("<module>");
                writeln!(
                    self.writer,
                    "  {}:{}: {} in {scope}",
                    var.unit.display(),
                    var.line,
                    var.name
                )?;
            }
        }
        Ok(())
    }

    fn print_suggestions(&mut self, summaries: &[UnitSummary]) -> anyhow::Result<()> {
        for summary in summaries.iter().filter(|s| !s.suggestions.is_empty()) {
            writeln!(
                self.writer,
                "{} {}",
                "Suggestions for".bold(),
                summary.path.display()
            )?;
            for suggestion in &summary.suggestions {
                writeln!(self.writer, "  - {suggestion}")?;
            }
        }
        Ok(())
    }

    fn print_problems(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        for failed in &report.failed_units {
            writeln!(self.writer, "{} {failed}", "error:".red().bold())?;
        }
        for warning in &report.warnings {
            writeln!(self.writer, "{} {warning}", "warning:".yellow().bold())?;
        }
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        self.print_header(report)?;
        self.print_units(&report.summaries)?;
        self.print_functions(report)?;
        self.print_critical(report)?;
        self.print_dead_code(report)?;
        self.print_suggestions(&report.summaries)?;
        self.print_problems(report)?;
        Ok(())
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn format_mi(mi: Option<f64>) -> String {
    mi.map(|v| format!("{v:.1}")).unwrap_or_else(|| "-".to_string())
}

fn flags(record: &MetricsRecord) -> String {
    let mut flags = Vec::new();
    if record.critical {
        flags.push("critical");
    }
    if record.low_maintainability {
        flags.push("low-mi");
    }
    if record.is_recursive {
        flags.push("recursive");
    }
    if record.unused {
        flags.push("unused");
    }
    flags.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Language, SourceInput};
    use crate::{analyze, AnalysisConfig};

    #[test]
    fn test_terminal_output_mentions_findings() {
        let inputs = [
            SourceInput::new(
                "prog.c",
                "int unusedFunction(void) { return 1; }\nint main(void) { return 0; }\n",
                Language::C,
            ),
            SourceInput::new("broken.py", "def f(:\n", Language::Python),
        ];
        let report = analyze(&inputs, &AnalysisConfig::default()).unwrap();

        let mut buffer = Vec::new();
        TerminalWriter::new(&mut buffer).write_report(&report).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("unusedFunction"));
        assert!(text.contains("Unused functions"));
        assert!(text.contains("broken.py"));
        assert!(text.contains("O(1)"));
    }

    #[test]
    fn test_terminal_output_lists_critical_functions() {
        let body = "    x = 1\n".repeat(25);
        let inputs = [SourceInput::new(
            "long.py",
            format!("def sprawling():\n{body}    return x\n\nsprawling()\n"),
            Language::Python,
        )];
        let report = analyze(&inputs, &AnalysisConfig::default()).unwrap();

        let mut buffer = Vec::new();
        TerminalWriter::new(&mut buffer).write_report(&report).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("Critical functions"));
        assert!(text.contains("long function"));
        assert!(text.contains("long.py"));
    }

    #[test]
    fn test_flags() {
        let inputs = [SourceInput::new(
            "f.py",
            "def fact(n):\n    return 1 if n < 2 else n * fact(n - 1)\n",
            Language::Python,
        )];
        let report = analyze(&inputs, &AnalysisConfig::default()).unwrap();
        assert_eq!(flags(&report.records[0]), "recursive");
    }
}
