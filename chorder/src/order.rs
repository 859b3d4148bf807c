use crate::error::Error;
use crate::ir::batch::BatchIr;
use crate::options::OrderOptions;
use crate::passes;
use crate::source::AstSource;
use crate::statement::StatementAst;

/// Fetches, parses, and orders a batch of statements.
///
/// Blank entries are skipped. The first failing statement aborts the whole
/// batch; the returned texts are the original, unmodified statements.
pub fn order_queries<Q, S>(
    queries: &[Q],
    source: &mut S,
    options: &OrderOptions,
) -> Result<Vec<String>, Error>
where
    Q: AsRef<str>,
    S: AstSource + ?Sized,
{
    let mut statements = Vec::with_capacity(queries.len());
    for query in queries {
        let query = query.as_ref();
        if query.trim().is_empty() {
            continue;
        }
        statements.push(StatementAst::from_query(query, source)?);
    }

    let ordered = order_statements(statements, options)?;
    Ok(ordered
        .into_iter()
        .map(|statement| statement.query().to_string())
        .collect())
}

/// Orders a KDL batch. Statements that carry dump lines are parsed from
/// them; the rest are fetched from `source`. Blank statements are skipped.
pub fn order_batch<S>(
    batch: &BatchIr,
    source: &mut S,
    options: &OrderOptions,
) -> Result<Vec<String>, Error>
where
    S: AstSource + ?Sized,
{
    let mut statements = Vec::with_capacity(batch.statements.len());
    for statement in &batch.statements {
        if statement.query.trim().is_empty() {
            continue;
        }
        let ast = if statement.dump.is_empty() {
            StatementAst::from_query(&statement.query, source)?
        } else {
            StatementAst::from_dump(&statement.query, &statement.dump)?
        };
        statements.push(ast);
    }

    let ordered = order_statements(statements, options)?;
    Ok(ordered
        .into_iter()
        .map(|statement| statement.query().to_string())
        .collect())
}

/// Orders already-parsed statements so every statement follows the ones it
/// depends on.
pub fn order_statements(
    statements: Vec<StatementAst>,
    options: &OrderOptions,
) -> Result<Vec<StatementAst>, Error> {
    let graph = passes::graph::run(&statements, options);
    tracing::info!(
        statements = statements.len(),
        edges = graph.edge_count(),
        "built dependency graph"
    );

    let order = passes::sort::run(&statements, &graph)?;
    let mut slots: Vec<Option<StatementAst>> = statements.into_iter().map(Some).collect();
    Ok(order
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect())
}
