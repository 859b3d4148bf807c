use crate::error::Error;
use crate::ir::tree::{AstNode, AstTree, NodeId, NodeKind};
use regex::{Captures, Regex};
use std::sync::LazyLock;

const PREAMBLE: &str = "Explain EXPLAIN AST ";

// A bare token, a bare token followed by a comma-bearing literal tail closed
// by `)` or `]` such as `Tuple_(UInt64_3, 'abc')` or `Array_[UInt64_1, UInt64_2]`,
// or a token containing a quoted literal.
const VALUE: &str = r"([^ ]*(?:, .*[\)\]])?|[^ ]*'(?:.*)?'[^ ]?)";

static ALIAS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(alias ([^)]+)\)").expect("alias pattern is valid")
});

static TYPE_ONLY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^( *)([^ ]+)$").expect("type-only pattern is valid")
});

static TYPE_WITH_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^( *)([^ ]+) +(\(.+\))$").expect("meta pattern is valid")
});

static TYPE_WITH_VALUE_AND_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^( *)([^ ]+) +{} +(\(.+\))$", VALUE))
        .expect("value and meta pattern is valid")
});

static TYPE_WITH_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^( *)([^ ]+) +{}$", VALUE))
        .expect("value pattern is valid")
});

static TYPE_WITH_TWO_VALUES_AND_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^( *)([^ ]+) +{} +{} +(\(.+\))$", VALUE, VALUE))
        .expect("two values and meta pattern is valid")
});

static MATERIALIZED_VIEW_TO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)create\s+materialized\s+view\s+(?:if\s+not\s+exists\s+)?[\w.]+\s+(?:on\s+cluster\s+\S+\s+)?to\s+([\w.]+)",
    )
    .expect("materialized view pattern is valid")
});

struct LineShape {
    pattern: &'static LazyLock<Regex>,
    fill: fn(&Captures<'_>, &mut AstNode),
}

static LINE_SHAPES: [LineShape; 5] = [
    LineShape {
        pattern: &TYPE_ONLY_RE,
        fill: fill_type_only,
    },
    LineShape {
        pattern: &TYPE_WITH_META_RE,
        fill: fill_meta,
    },
    LineShape {
        pattern: &TYPE_WITH_VALUE_AND_META_RE,
        fill: fill_value_and_meta,
    },
    LineShape {
        pattern: &TYPE_WITH_VALUE_RE,
        fill: fill_value,
    },
    LineShape {
        pattern: &TYPE_WITH_TWO_VALUES_AND_META_RE,
        fill: fill_two_values_and_meta,
    },
];

/// Builds the tree for one statement from its `explain ast` lines.
///
/// `query` is the statement text the dump was produced from; it is only
/// consulted to recover the target table of `CREATE MATERIALIZED VIEW ... TO`,
/// which the dump leaves out.
pub fn parse_dump<S: AsRef<str>>(query: &str, lines: &[S]) -> Result<AstTree, Error> {
    let mut tree = AstTree::default();
    let mut previous: Option<NodeId> = None;

    for line in lines {
        let line = line.as_ref();
        if line.trim().is_empty() || line.starts_with(PREAMBLE) {
            continue;
        }

        let node = parse_line(line)?;
        let parent = match previous {
            Some(previous) => Some(attach_point(&tree, previous, node.indent, line)?),
            None => None,
        };

        let is_create = node.kind == NodeKind::CreateQuery;
        let id = tree.push(node, parent);
        if is_create {
            add_materialized_view_target(&mut tree, id, query);
        }
        previous = Some(id);
    }

    if tree.is_empty() {
        return Err(Error::Structure("dump contains no nodes".into()));
    }

    Ok(tree)
}

/// Parses a single dump line into a detached node.
pub fn parse_line(line: &str) -> Result<AstNode, Error> {
    for shape in &LINE_SHAPES {
        if let Some(captures) = shape.pattern.captures(line) {
            let mut node = AstNode::new(
                NodeKind::from_tag(&captures[2]),
                captures[1].len(),
            );
            node.raw_line = line.to_string();
            (shape.fill)(&captures, &mut node);
            return Ok(node);
        }
    }

    Err(Error::Format(line.to_string()))
}

fn attach_point(
    tree: &AstTree,
    previous: NodeId,
    indent: usize,
    line: &str,
) -> Result<NodeId, Error> {
    let previous_indent = tree.node(previous).indent;
    if indent > previous_indent {
        if indent != previous_indent + 1 {
            return Err(Error::Structure(format!(
                "line {:?} is indented {} levels below its predecessor",
                line,
                indent - previous_indent
            )));
        }
        return Ok(previous);
    }

    let mut candidate = tree.parent(previous);
    while let Some(id) = candidate {
        if tree.node(id).indent + 1 == indent {
            return Ok(id);
        }
        candidate = tree.parent(id);
    }

    Err(Error::Structure(format!(
        "no enclosing node at indent {} for line {:?}",
        indent as isize - 1,
        line
    )))
}

fn add_materialized_view_target(tree: &mut AstTree, create: NodeId, query: &str) {
    let Some(captures) = MATERIALIZED_VIEW_TO_RE.captures(query) else {
        return;
    };

    let indent = tree.node(create).indent;
    let mut target = AstNode::new(NodeKind::MaterializedViewToTable, indent + 1);
    set_value_and_qualifier(&captures[1], &mut target);

    let mut identifier = AstNode::new(NodeKind::TableIdentifier, indent + 2);
    identifier.value = target.value.clone();
    identifier.qualifier = target.qualifier.clone();

    let target = tree.push(target, Some(create));
    tree.push(identifier, Some(target));
}

fn fill_type_only(_captures: &Captures<'_>, _node: &mut AstNode) {}

fn fill_meta(captures: &Captures<'_>, node: &mut AstNode) {
    set_meta(&captures[3], node);
}

fn fill_value_and_meta(captures: &Captures<'_>, node: &mut AstNode) {
    set_value_and_qualifier(&captures[3], node);
    set_meta(&captures[4], node);
}

fn fill_value(captures: &Captures<'_>, node: &mut AstNode) {
    set_value_and_qualifier(&captures[3], node);
}

// Seen on CREATE/ALTER with a database-qualified table: `CreateQuery db t (...)`.
fn fill_two_values_and_meta(captures: &Captures<'_>, node: &mut AstNode) {
    node.qualifier = non_empty(&captures[3]);
    node.value = non_empty(&captures[4]);
    set_meta(&captures[5], node);
}

fn set_meta(meta: &str, node: &mut AstNode) {
    node.alias = alias_from_meta(meta);
    node.meta = Some(meta.to_string());
}

// Literal values such as `Float64_1.5` keep their dot.
fn set_value_and_qualifier(value: &str, node: &mut AstNode) {
    let is_literal = node.kind.tag() == "Literal";
    match value.split_once('.') {
        Some((qualifier, rest)) if !is_literal && !rest.contains('.') => {
            node.qualifier = non_empty(qualifier);
            node.value = non_empty(rest);
        }
        _ => node.value = non_empty(value),
    }
}

/// Extracts `X` from an `(alias X)` annotation anywhere in `meta`.
pub fn alias_from_meta(meta: &str) -> Option<String> {
    ALIAS_RE
        .captures(meta)
        .map(|captures| captures[1].to_string())
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
