// Output formatting for CLI

use std::io::Write;

use crate::cli::{CliResult, OutputFormat};

/// Format and output data
pub struct OutputFormatter {
    format: OutputFormat,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Output a report
    pub fn output_report(&self, report: &serde_json::Value, writer: &mut impl Write) -> CliResult<()> {
        match self.format {
            OutputFormat::Pretty => {
                writeln!(writer, "{}", serde_json::to_string_pretty(report)?)?;
            }
            OutputFormat::Json => {
                writeln!(writer, "{}", serde_json::to_string(report)?)?;
            }
            OutputFormat::KeyValue => {
                self.output_key_value(report, "", writer)?;
            }
            OutputFormat::Table => {
                self.output_table(report, writer)?;
            }
        }
        Ok(())
    }

    /// Output as flattened key-value pairs
    fn output_key_value(&self, value: &serde_json::Value, prefix: &str, writer: &mut impl Write) -> CliResult<()> {
        match value {
            serde_json::Value::Object(obj) => {
                let mut items: Vec<_> = obj.iter().collect();
                items.sort_by(|a, b| a.0.cmp(b.0));
                for (key, value) in items {
                    self.output_key_value(value, &join_key(prefix, key), writer)?;
                }
            }
            serde_json::Value::Array(arr) if arr.iter().any(|v| v.is_object()) => {
                for (i, value) in arr.iter().enumerate() {
                    self.output_key_value(value, &join_key(prefix, &i.to_string()), writer)?;
                }
            }
            other => {
                writeln!(writer, "{}: {}", prefix, self.format_value(other))?;
            }
        }
        Ok(())
    }

    /// Output top-level fields as a table
    fn output_table(&self, report: &serde_json::Value, writer: &mut impl Write) -> CliResult<()> {
        if let Some(obj) = report.as_object() {
            let max_key_len = obj.keys().map(|k| k.len()).max().unwrap_or(0);

            writeln!(writer, "{}", "=".repeat(max_key_len + 30))?;

            for (key, value) in obj {
                writeln!(writer, "{:<width$} {}", format!("{}:", key), self.format_value(value), width = max_key_len + 2)?;
            }

            writeln!(writer, "{}", "=".repeat(max_key_len + 30))?;
        }
        Ok(())
    }

    /// Format a JSON value for display
    fn format_value(&self, value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => "(null)".to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Array(arr) => {
                if arr.is_empty() {
                    "[]".to_string()
                } else if arr.iter().all(|v| !v.is_object() && !v.is_array()) {
                    arr.iter().map(|v| self.format_value(v)).collect::<Vec<_>>().join(", ")
                } else {
                    format!("[{} items]", arr.len())
                }
            }
            serde_json::Value::Object(obj) => {
                if obj.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{{} items}}", obj.len())
                }
            }
        }
    }

    /// Print success message
    pub fn print_success(&self, message: &str) {
        if !self.quiet {
            println!("✓ {}", message);
        }
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if !self.quiet {
            println!("  {}", message);
        }
    }
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}
