use crate::error::Error;
use crate::ir;
use crate::options::OrderOptions;
use crate::order;
use crate::passes;
use crate::statement::StatementAst;

pub struct PassSpec {
    pub name: &'static str,
    pub help: &'static str,
    pub run: fn(&str) -> Result<String, Error>,
}

pub fn all_passes() -> &'static [PassSpec] {
    &PASS_REGISTRY
}

pub fn find_pass(name: &str) -> Option<&'static PassSpec> {
    PASS_REGISTRY.iter().find(|spec| spec.name == name)
}

fn parse_batch(input: &str) -> Result<Vec<StatementAst>, Error> {
    let batch = ir::batch::parse_kdl(input)?;
    batch
        .statements
        .iter()
        .map(|statement| StatementAst::from_dump(&statement.query, &statement.dump))
        .collect()
}

fn run_parse_dump(input: &str) -> Result<String, Error> {
    let mut out = String::new();
    for statement in parse_batch(input)? {
        out.push_str(&format!(
            "statement \"{}\" {{\n",
            ir::tree::escape(statement.query())
        ));
        ir::tree::print_node(statement.tree(), statement.tree().root(), 1, &mut out);
        out.push_str("}\n");
    }
    Ok(out)
}

fn run_dependencies(input: &str) -> Result<String, Error> {
    let statements = parse_batch(input)?;
    let graph = passes::graph::run(&statements, &OrderOptions::default());
    let parents: Vec<Vec<usize>> = (0..graph.len())
        .map(|index| graph.parents(index).iter().copied().collect())
        .collect();
    let queries: Vec<&str> = statements.iter().map(StatementAst::query).collect();
    Ok(ir::batch::print_dependencies_kdl(&queries, &parents))
}

fn run_order(input: &str) -> Result<String, Error> {
    let statements = parse_batch(input)?;
    let ordered = order::order_statements(statements, &OrderOptions::default())?;
    let queries: Vec<&str> = ordered.iter().map(StatementAst::query).collect();
    Ok(ir::batch::print_kdl(&queries))
}

static PASS_REGISTRY: [PassSpec; 3] = [
    PassSpec {
        name: "parse-dump",
        help: "Parse explain-ast dumps into node trees",
        run: run_parse_dump,
    },
    PassSpec {
        name: "dependencies",
        help: "List the statements each statement must run after",
        run: run_dependencies,
    },
    PassSpec {
        name: "order",
        help: "Order statements so dependencies run first",
        run: run_order,
    },
];
