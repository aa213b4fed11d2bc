//! Tree serialization: S-expression text and Graphviz DOT graphs.
//! Both writers latch the first I/O failure and suppress further
//! writes instead of panicking mid-traversal.

mod dot;

pub use dot::{dot_string, dot_write};

use crate::ast::{Node, NodeKind, SyntaxTree};
use crate::error::Error;
use crate::errors;
use crate::support::AsStr;
use std::io::Write;
use std::path::PathBuf;

/// Serializes the tree as S-expression text into `path`,
/// returning the number of bytes written.
pub fn ast_write(path: &PathBuf, tree: &SyntaxTree) -> Result<usize, Error> {
    let file = std::fs::File::create(path)
        .map_err(|io_error| errors::os_file_create(io_error.to_string(), path))?;
    let mut writer = TreeWriter::new(std::io::BufWriter::new(file));
    write_sexpr(&mut writer, tree, tree.root);
    writer.write_str("\n");
    writer.finish().map_err(|io_error| errors::os_file_write(io_error.to_string(), path))
}

/// In-memory S-expression form, used by `--ast` console output and tests.
pub fn ast_string(tree: &SyntaxTree) -> String {
    let mut writer = TreeWriter::new(Vec::with_capacity(512));
    write_sexpr(&mut writer, tree, tree.root);
    writer.write_str("\n");
    let buffer = writer.into_sink();
    String::from_utf8_lossy(&buffer).into_owned()
}

fn write_sexpr<W: Write>(writer: &mut TreeWriter<W>, tree: &SyntaxTree, node: &Node) {
    writer.write_str("(");
    writer.write_str(node.kind().as_str());
    for value in node.values().iter().copied() {
        writer.write_str(" ");
        let formatted = format_value(node.kind(), tree.name(value));
        writer.write_str(&formatted);
    }
    for child in node.children().iter().copied() {
        writer.write_str(" ");
        write_sexpr(writer, tree, child);
    }
    writer.write_str(")");
}

/// Terminal lexeme formatting shared by both writers:
/// integer and char literals keep a base marker, quoted
/// values regain their quotes.
pub(super) fn format_value(kind: NodeKind, lexeme: &str) -> String {
    match kind {
        NodeKind::IntVal => {
            if lexeme.starts_with("0x") {
                format!("#{lexeme}")
            } else if lexeme.ends_with('H') || lexeme.ends_with('B') {
                format!("?{lexeme}")
            } else {
                lexeme.to_string()
            }
        }
        NodeKind::ChrVal => {
            if lexeme.starts_with("0u") {
                format!("#{lexeme}")
            } else if lexeme.ends_with('C') {
                format!("?{lexeme}")
            } else {
                lexeme.to_string()
            }
        }
        NodeKind::QuotedVal | NodeKind::Filename | NodeKind::Options => {
            if lexeme.contains('"') {
                format!("'{lexeme}'")
            } else {
                format!("\"{lexeme}\"")
            }
        }
        _ => lexeme.to_string(),
    }
}

/// Byte sink with a latched error status. After the first
/// failed write every later call is a no-op.
pub(super) struct TreeWriter<W: Write> {
    sink: W,
    written: usize,
    status: Option<std::io::Error>,
}

impl<W: Write> TreeWriter<W> {
    pub(super) fn new(sink: W) -> TreeWriter<W> {
        TreeWriter { sink, written: 0, status: None }
    }

    pub(super) fn write_str(&mut self, text: &str) {
        if self.status.is_some() {
            return;
        }
        match self.sink.write_all(text.as_bytes()) {
            Ok(()) => self.written += text.len(),
            Err(io_error) => self.status = Some(io_error),
        }
    }

    pub(super) fn into_sink(self) -> W {
        self.sink
    }

    pub(super) fn finish(mut self) -> Result<usize, std::io::Error> {
        if let Some(io_error) = self.status {
            return Err(io_error);
        }
        self.sink.flush()?;
        Ok(self.written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_formatting() {
        assert_eq!(format_value(NodeKind::IntVal, "42"), "42");
        assert_eq!(format_value(NodeKind::IntVal, "0FFH"), "?0FFH");
        assert_eq!(format_value(NodeKind::IntVal, "377B"), "?377B");
        assert_eq!(format_value(NodeKind::IntVal, "0x2A"), "#0x2A");
        assert_eq!(format_value(NodeKind::ChrVal, "15C"), "?15C");
        assert_eq!(format_value(NodeKind::ChrVal, "0u41"), "#0u41");
        assert_eq!(format_value(NodeKind::QuotedVal, "hello"), "\"hello\"");
        assert_eq!(format_value(NodeKind::QuotedVal, "say \"hi\""), "'say \"hi\"'");
        assert_eq!(format_value(NodeKind::RealVal, "3.14"), "3.14");
        assert_eq!(format_value(NodeKind::Ident, "Foo"), "Foo");
    }

    #[test]
    fn latched_sink_error() {
        struct FailAfter(usize);
        impl Write for FailAfter {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                if self.0 == 0 {
                    return Err(std::io::Error::other("sink full"));
                }
                self.0 -= 1;
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let mut writer = TreeWriter::new(FailAfter(2));
        writer.write_str("(");
        writer.write_str("ROOT");
        writer.write_str(")");
        writer.write_str("\n");
        assert!(writer.finish().is_err());
    }
}
