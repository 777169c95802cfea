//! Diagnostic logging for diff and merge runs.
//!
//! Every diff or merge result carries an append-only [`DiagnosticLog`].
//! Entries are also forwarded to `tracing` so that applications with a
//! subscriber installed see them as they happen.

use std::fmt::Display;
use std::io::Write;

use tracing::{debug, error, warn};

use crate::merge::Conflict;
use crate::model::Chunk;
use crate::xml::to_entities;

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational note.
    Info,
    /// Something unusual that did not affect the result.
    Warning,
    /// The result may not be what the caller wants.
    Error,
}

impl Severity {
    /// Returns the XML tag name for this severity.
    pub fn tag_name(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A single log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Severity of the entry.
    pub severity: Severity,
    /// Position in the ancestor/previous sequence the entry refers to.
    pub index: Option<usize>,
    /// Description of what happened.
    pub text: String,
}

/// Append-only log of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticLog {
    entries: Vec<LogEntry>,
}

impl DiagnosticLog {
    /// Creates a new empty log.
    pub fn new() -> Self {
        DiagnosticLog {
            entries: Vec::new(),
        }
    }

    /// Adds an informational entry.
    pub fn info(&mut self, index: Option<usize>, text: impl Into<String>) {
        self.add(Severity::Info, index, text.into());
    }

    /// Adds a warning.
    pub fn warning(&mut self, index: Option<usize>, text: impl Into<String>) {
        self.add(Severity::Warning, index, text.into());
    }

    /// Adds an error.
    pub fn error(&mut self, index: Option<usize>, text: impl Into<String>) {
        self.add(Severity::Error, index, text.into());
    }

    fn add(&mut self, severity: Severity, index: Option<usize>, text: String) {
        match severity {
            Severity::Info => debug!(index, "{}", text),
            Severity::Warning => warn!(index, "{}", text),
            Severity::Error => error!(index, "{}", text),
        }

        self.entries.push(LogEntry {
            severity,
            index,
            text,
        });
    }

    /// Returns the entries in the order they were added.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was logged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counts entries of the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|e| e.severity == severity)
            .count()
    }

    /// Returns true if any error was logged.
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|e| e.severity == Severity::Error)
    }

    /// Returns the highest severity logged, if any.
    pub fn max_severity(&self) -> Option<Severity> {
        self.entries.iter().map(|e| e.severity).max()
    }

    /// Writes the log and the given conflicts as an XML report.
    pub fn write_xml<W, E>(&self, writer: &mut W, conflicts: &[Conflict<E>]) -> std::io::Result<()>
    where
        W: Write,
        E: Display,
    {
        writeln!(writer, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        writeln!(writer, "<mergelog>")?;

        if !conflicts.is_empty() {
            writeln!(writer, "  <conflicts>")?;
            for conflict in conflicts {
                write_conflict(writer, conflict, "    ")?;
            }
            writeln!(writer, "  </conflicts>")?;
        }

        if !self.entries.is_empty() {
            writeln!(writer, "  <entries>")?;
            for entry in &self.entries {
                let tag = entry.severity.tag_name();
                match entry.index {
                    Some(index) => write!(writer, "    <{} index=\"{}\">", tag, index)?,
                    None => write!(writer, "    <{}>", tag)?,
                }
                writeln!(writer, "{}</{}>", to_entities(&entry.text), tag)?;
            }
            writeln!(writer, "  </entries>")?;
        }

        writeln!(writer, "</mergelog>")?;
        Ok(())
    }
}

/// Writes a single conflict entry.
fn write_conflict<W, E>(writer: &mut W, conflict: &Conflict<E>, indent: &str) -> std::io::Result<()>
where
    W: Write,
    E: Display,
{
    writeln!(writer, "{}<conflict index=\"{}\">", indent, conflict.index())?;

    let current = conflict.delta_current();
    let next = conflict.delta_next();
    write_chunk(writer, "ancestor", current.previous(), indent)?;
    write_chunk(writer, "current", current.next(), indent)?;
    write_chunk(writer, "next", next.next(), indent)?;

    writeln!(writer, "{}</conflict>", indent)?;
    Ok(())
}

fn write_chunk<W, E>(
    writer: &mut W,
    tree: &str,
    chunk: &Chunk<E>,
    indent: &str,
) -> std::io::Result<()>
where
    W: Write,
    E: Display,
{
    write!(writer, "{}  <chunk tree=\"{}\"", indent, tree)?;
    if let Some(index) = chunk.index() {
        write!(writer, " index=\"{}\"", index)?;
    }

    if chunk.is_empty() {
        return writeln!(writer, " />");
    }

    writeln!(writer, ">")?;
    for element in chunk.elements() {
        writeln!(
            writer,
            "{}    <e>{}</e>",
            indent,
            to_entities(&element.to_string())
        )?;
    }
    writeln!(writer, "{}  </chunk>", indent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Delta;

    #[test]
    fn test_severity_tag_names() {
        assert_eq!(Severity::Info.tag_name(), "info");
        assert_eq!(Severity::Warning.tag_name(), "warning");
        assert_eq!(Severity::Error.tag_name(), "error");
    }

    #[test]
    fn test_log_empty() {
        let log = DiagnosticLog::new();
        assert!(log.is_empty());
        assert!(!log.has_errors());
        assert_eq!(log.max_severity(), None);
    }

    #[test]
    fn test_counts_by_severity() {
        let mut log = DiagnosticLog::new();
        log.info(None, "started");
        log.warning(Some(2), "odd");
        log.error(None, "broken");
        log.info(Some(4), "done");

        assert_eq!(log.len(), 4);
        assert_eq!(log.count(Severity::Info), 2);
        assert_eq!(log.count(Severity::Warning), 1);
        assert!(log.has_errors());
        assert_eq!(log.max_severity(), Some(Severity::Error));
        assert_eq!(log.entries()[1].index, Some(2));
    }

    #[test]
    fn test_write_xml() {
        let mut log = DiagnosticLog::new();
        log.warning(Some(1), "a < b");

        let conflict = Conflict::new(
            1,
            Delta::change(Chunk::new(1, vec!["b"]), Chunk::new(1, vec!["X"])),
            Delta::change(Chunk::new(1, vec!["b"]), Chunk::new(1, vec!["Y"])),
        );

        let mut output = Vec::new();
        log.write_xml(&mut output, &[conflict]).unwrap();
        let xml = String::from_utf8(output).unwrap();

        assert!(xml.contains("<conflict index=\"1\">"));
        assert!(xml.contains("<chunk tree=\"current\" index=\"1\">"));
        assert!(xml.contains("<e>Y</e>"));
        assert!(xml.contains("<warning index=\"1\">a &lt; b</warning>"));
    }
}
