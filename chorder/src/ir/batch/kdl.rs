use crate::error::Error;
use crate::ir::batch::{BatchIr, StatementIr};
use crate::ir::tree::escape;
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};

pub fn parse_kdl(src: &str) -> Result<BatchIr, Error> {
    let doc: KdlDocument = src.parse()?;
    let mut statements = Vec::new();

    for node in doc.nodes() {
        if node.name().value() != "statement" {
            return Err(Error::Parse(format!(
                "unknown root node '{}', expected 'statement'",
                node.name().value()
            )));
        }
        statements.push(parse_statement(node)?);
    }

    Ok(BatchIr { statements })
}

/// Prints statements in the given order, one `statement` node each.
pub fn print_kdl<S: AsRef<str>>(queries: &[S]) -> String {
    let mut out = String::new();
    for query in queries {
        out.push_str(&format!("statement \"{}\"\n", escape(query.as_ref())));
    }
    out
}

/// Prints each statement with the statements it must run after.
pub fn print_dependencies_kdl<S: AsRef<str>>(
    queries: &[S],
    parents: &[Vec<usize>],
) -> String {
    let mut out = String::new();
    for (index, query) in queries.iter().enumerate() {
        let after = parents.get(index).map(Vec::as_slice).unwrap_or(&[]);
        out.push_str(&format!("statement \"{}\"", escape(query.as_ref())));

        if after.is_empty() {
            out.push('\n');
            continue;
        }

        out.push_str(" {\n");
        for parent in after {
            if let Some(parent_query) = queries.get(*parent) {
                out.push_str(&format!(
                    "  after \"{}\"\n",
                    escape(parent_query.as_ref())
                ));
            }
        }
        out.push_str("}\n");
    }
    out
}

fn parse_statement(node: &KdlNode) -> Result<StatementIr, Error> {
    let query = expect_single_string_value(node, "statement")?;
    ensure_no_properties(node, "statement")?;

    let mut dump = Vec::new();
    if let Some(children) = node.children() {
        for child in children.nodes() {
            if child.name().value() != "line" {
                return Err(Error::Parse(format!(
                    "unknown node '{}' in statement, expected 'line'",
                    child.name().value()
                )));
            }
            ensure_no_properties(child, "line")?;
            dump.push(expect_single_string_value(child, "line")?);
        }
    }

    Ok(StatementIr { query, dump })
}

fn expect_single_string_value(
    node: &KdlNode,
    kind: &str,
) -> Result<String, Error> {
    let values: Vec<&KdlEntry> = node
        .entries()
        .iter()
        .filter(|entry| entry.name().is_none())
        .collect();

    if values.len() != 1 {
        return Err(Error::Parse(format!(
            "'{}' node must have exactly one string value",
            kind
        )));
    }

    match values[0].value() {
        KdlValue::String(s) => Ok(s.to_string()),
        _ => Err(Error::Parse(format!(
            "'{}' node value must be a string",
            kind
        ))),
    }
}

fn ensure_no_properties(node: &KdlNode, kind: &str) -> Result<(), Error> {
    for entry in node.entries() {
        if let Some(name) = entry.name() {
            return Err(Error::Parse(format!(
                "'{}' node does not support property '{}'",
                kind,
                name.value()
            )));
        }
    }
    Ok(())
}
