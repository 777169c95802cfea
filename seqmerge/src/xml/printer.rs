//! XML printer for patch documents.

use std::io::Write;

use super::PatchDocument;
use crate::model::{Chunk, Delta};

/// Options for patch printing.
#[derive(Debug, Clone, Default)]
pub struct PatchPrinterOptions {
    /// Whether to pretty-print with one tag per line and indentation.
    pub pretty_print: bool,
}

/// Writes patch documents as XML.
pub struct PatchPrinter<W: Write> {
    writer: W,
    options: PatchPrinterOptions,
}

impl<W: Write> PatchPrinter<W> {
    /// Creates a new printer.
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, PatchPrinterOptions::default())
    }

    /// Creates a new printer with the given options.
    pub fn with_options(writer: W, options: PatchPrinterOptions) -> Self {
        PatchPrinter { writer, options }
    }

    /// Prints a complete document.
    pub fn print(&mut self, document: &PatchDocument) -> std::io::Result<()> {
        write!(self.writer, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        if self.options.pretty_print {
            writeln!(self.writer)?;
        }

        match document.digest() {
            Some(digest) => {
                let open = format!("<patch digest=\"{}\">", to_entities(digest));
                self.print_line(0, &open)?
            }
            None => self.print_line(0, "<patch>")?,
        }

        for delta in document.patch() {
            self.print_delta(delta)?;
        }

        self.print_line(0, "</patch>")?;
        if !self.options.pretty_print {
            writeln!(self.writer)?;
        }
        self.writer.flush()
    }

    fn print_delta(&mut self, delta: &Delta<String>) -> std::io::Result<()> {
        let tag = delta.delta_type().tag_name();
        self.print_line(1, &format!("<{}>", tag))?;
        self.print_chunk("previous", delta.previous())?;
        self.print_chunk("next", delta.next())?;
        self.print_line(1, &format!("</{}>", tag))
    }

    fn print_chunk(&mut self, tag: &str, chunk: &Chunk<String>) -> std::io::Result<()> {
        let open = match chunk.index() {
            Some(index) => format!("<{} index=\"{}\"", tag, index),
            None => format!("<{}", tag),
        };

        if chunk.is_empty() {
            return self.print_line(2, &format!("{} />", open));
        }

        self.print_line(2, &format!("{}>", open))?;
        for element in chunk.elements() {
            self.print_line(3, &format!("<e>{}</e>", to_entities(element)))?;
        }
        self.print_line(2, &format!("</{}>", tag))
    }

    fn print_line(&mut self, level: usize, s: &str) -> std::io::Result<()> {
        if self.options.pretty_print {
            writeln!(self.writer, "{}{}", Self::indent_str(level), s)
        } else {
            write!(self.writer, "{}", s)
        }
    }

    fn indent_str(level: usize) -> String {
        "  ".repeat(level)
    }
}

/// Converts special characters to XML entities.
///
/// Line breaks and tabs become character references so that element text
/// survives pretty-printing and line-ending normalization.
pub(crate) fn to_entities(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\'' => result.push_str("&apos;"),
            '"' => result.push_str("&quot;"),
            '\n' => result.push_str("&#10;"),
            '\r' => result.push_str("&#13;"),
            '\t' => result.push_str("&#9;"),
            _ => result.push(c),
        }
    }
    result
}

/// Prints a document to a string.
pub fn print_to_string(document: &PatchDocument) -> std::io::Result<String> {
    let mut output = Vec::new();
    PatchPrinter::new(&mut output).print(document)?;
    Ok(String::from_utf8_lossy(&output).into_owned())
}

/// Prints a document to a string with pretty printing.
pub fn print_to_string_pretty(document: &PatchDocument) -> std::io::Result<String> {
    let mut output = Vec::new();
    let options = PatchPrinterOptions { pretty_print: true };
    PatchPrinter::with_options(&mut output, options).print(document)?;
    Ok(String::from_utf8_lossy(&output).into_owned())
}
