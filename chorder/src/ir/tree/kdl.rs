use crate::ir::tree::{AstTree, NodeId};

pub fn print_kdl(tree: &AstTree) -> String {
    let mut out = String::new();
    if !tree.is_empty() {
        print_node(tree, tree.root(), 0, &mut out);
    }
    out
}

pub(crate) fn print_node(tree: &AstTree, id: NodeId, depth: usize, out: &mut String) {
    let node = tree.node(id);
    let pad = "  ".repeat(depth);

    out.push_str(&format!("{}\"{}\"", pad, escape(node.kind.tag())));
    let properties = [
        ("value", node.value()),
        ("qualifier", node.qualifier()),
        ("alias", node.alias()),
        ("meta", node.meta.as_deref()),
    ];
    for (key, value) in properties {
        if let Some(value) = value {
            out.push_str(&format!(" {}=\"{}\"", key, escape(value)));
        }
    }

    let children = tree.children(id);
    if children.is_empty() {
        out.push('\n');
        return;
    }

    out.push_str(" {\n");
    for child in children {
        print_node(tree, *child, depth + 1, out);
    }
    out.push_str(&format!("{}}}\n", pad));
}

pub(crate) fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch.is_control() => out.push_str(&format!("\\u{{{:x}}}", ch as u32)),
            ch => out.push(ch),
        }
    }
    out
}
