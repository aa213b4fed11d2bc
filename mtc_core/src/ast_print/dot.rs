use super::{format_value, TreeWriter};
use crate::ast::{Node, NodeKind, SyntaxTree};
use crate::error::Error;
use crate::errors;
use crate::support::AsStr;
use std::io::Write;
use std::path::PathBuf;

/// Serializes the tree as a Graphviz DOT document into `path`,
/// returning the number of bytes written.
pub fn dot_write(path: &PathBuf, tree: &SyntaxTree) -> Result<usize, Error> {
    let file = std::fs::File::create(path)
        .map_err(|io_error| errors::os_file_create(io_error.to_string(), path))?;
    let mut writer = TreeWriter::new(std::io::BufWriter::new(file));
    write_graph(&mut writer, tree);
    writer.finish().map_err(|io_error| errors::os_file_write(io_error.to_string(), path))
}

/// In-memory DOT form, used by `--dot` console output and tests.
pub fn dot_string(tree: &SyntaxTree) -> String {
    let mut writer = TreeWriter::new(Vec::with_capacity(1024));
    write_graph(&mut writer, tree);
    let buffer = writer.into_sink();
    String::from_utf8_lossy(&buffer).into_owned()
}

fn write_graph<W: Write>(writer: &mut TreeWriter<W>, tree: &SyntaxTree) {
    let label = graph_label(tree);
    writer.write_str("digraph AST {\n");
    writer.write_str("  graph [fontname=\"helvetica\", fontsize=10, label=\"");
    writer.write_str(&escape(&label));
    writer.write_str("\"];\n");
    writer.write_str("  node [fontname=\"helvetica\", fontsize=10, shape=box];\n");
    writer.write_str("  edge [fontname=\"helvetica\", fontsize=10];\n");

    let mut next_id = 0;
    let root_id = alloc_id(&mut next_id);
    write_node(writer, tree, tree.root, root_id, &mut next_id);
    writer.write_str("}\n");
}

/// The FILENAME value sits in the first root slot and names the graph.
fn graph_label(tree: &SyntaxTree) -> String {
    let filename = tree
        .root
        .child(0)
        .filter(|node| node.kind() == NodeKind::Filename)
        .and_then(|node| node.value(0));
    match filename {
        Some(id) => format!("AST of {}", tree.name(id)),
        None => "AST".to_string(),
    }
}

fn alloc_id(next_id: &mut u32) -> u32 {
    let id = *next_id;
    *next_id += 1;
    id
}

/// Depth-first emission: node declaration, edge list to the
/// children, then the child subtrees. Terminal values become
/// filled leaf nodes hanging off their owner.
fn write_node<W: Write>(
    writer: &mut TreeWriter<W>,
    tree: &SyntaxTree,
    node: &Node,
    id: u32,
    next_id: &mut u32,
) {
    writer.write_str(&format!("  node_{id} [label=\"{}\"];\n", node.kind().as_str()));

    if node.value_count() > 0 {
        let first_leaf = *next_id;
        *next_id += node.value_count() as u32;
        writer.write_str(&format!("  node_{id} -> {{"));
        for leaf in first_leaf..*next_id {
            writer.write_str(&format!(" node_{leaf}"));
        }
        writer.write_str(" };\n");
        for (index, value) in node.values().iter().copied().enumerate() {
            let leaf = first_leaf + index as u32;
            let label = escape(&format_value(node.kind(), tree.name(value)));
            writer.write_str(&format!("  node_{leaf} [label=\"{label}\", style=filled];\n"));
        }
        return;
    }

    if node.child_count() == 0 {
        return;
    }
    let first_child = *next_id;
    *next_id += node.child_count() as u32;
    writer.write_str(&format!("  node_{id} -> {{"));
    for child_id in first_child..*next_id {
        writer.write_str(&format!(" node_{child_id}"));
    }
    writer.write_str(" };\n");
    for (index, child) in node.children().iter().copied().enumerate() {
        write_node(writer, tree, child, first_child + index as u32, next_id);
    }
}

/// Escapes a lexeme for use inside a double-quoted DOT label.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_quotes_and_backslashes() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("\"Foo.def\""), "\\\"Foo.def\\\"");
        assert_eq!(escape("a\\b"), "a\\\\b");
    }
}
