use std::fmt::{self, Write as _};

use report_types::ReportFormat;

use crate::tree::{non_finite_label, Report, ReportNode, Section, Value};
use crate::Error;

/// Renders a finished report to text. Nesting and insertion order survive.
pub trait ReportWriter {
    fn write(&self, report: &Report) -> Result<String, Error>;
}

pub fn writer_for(format: ReportFormat) -> Box<dyn ReportWriter> {
    match format {
        ReportFormat::Yaml => Box::new(YamlWriter),
        ReportFormat::Json => Box::new(JsonWriter),
    }
}

/// The flat YAML dialect downstream HPCG tooling reads: keys verbatim, two
/// spaces per nesting level, sections and empty values printed as a bare `key:`.
#[derive(Copy, Clone, Debug, Default)]
pub struct YamlWriter;

impl ReportWriter for YamlWriter {
    fn write(&self, report: &Report) -> Result<String, Error> {
        let mut out = String::new();
        writeln!(out, "{} version: {}", report.name, report.version).map_err(Error::Format)?;
        write_section(&mut out, &report.root, "").map_err(Error::Format)?;
        Ok(out)
    }
}

fn write_section(out: &mut String, section: &Section, indent: &str) -> fmt::Result {
    for (key, node) in section.iter() {
        match node {
            ReportNode::Scalar(Value::Text(text)) if text.is_empty() => {
                writeln!(out, "{}{}:", indent, key)?;
            }
            ReportNode::Scalar(value) => {
                writeln!(out, "{}{}: {}", indent, key, format_value(value))?;
            }
            ReportNode::Section(child) => {
                writeln!(out, "{}{}:", indent, key)?;
                write_section(out, child, &format!("{}  ", indent))?;
            }
        }
    }
    Ok(())
}

pub fn format_value(value: &Value) -> String {
    match value {
        Value::Count(v) => v.to_string(),
        Value::Float(v) => match non_finite_label(*v) {
            Some(label) => label.to_string(),
            None => v.to_string(),
        },
        Value::Text(v) => v.clone(),
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct JsonWriter;

impl ReportWriter for JsonWriter {
    fn write(&self, report: &Report) -> Result<String, Error> {
        serde_json::to_string_pretty(report).map_err(Error::Serialize)
    }
}
