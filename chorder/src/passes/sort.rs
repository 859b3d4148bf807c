use crate::error::Error;
use crate::passes::graph::DependencyGraph;
use crate::statement::StatementAst;
use std::collections::VecDeque;

/// Orders the batch with Kahn's algorithm and returns input positions.
///
/// Statements that become ready at the same time keep their input order. If
/// some statements are never ready the batch has a cycle and no order is
/// returned.
pub fn run(statements: &[StatementAst], graph: &DependencyGraph) -> Result<Vec<usize>, Error> {
    let mut in_degree: Vec<usize> = (0..graph.len())
        .map(|index| graph.parents(index).len())
        .collect();
    let mut queue: VecDeque<usize> = (0..graph.len())
        .filter(|index| in_degree[*index] == 0)
        .collect();
    let mut order = Vec::with_capacity(graph.len());

    while let Some(index) = queue.pop_front() {
        order.push(index);
        for dependent in graph.dependents(index) {
            in_degree[*dependent] -= 1;
            if in_degree[*dependent] == 0 {
                queue.push_back(*dependent);
            }
        }
    }

    if order.len() < graph.len() {
        let remaining: Vec<String> = (0..graph.len())
            .filter(|index| in_degree[*index] > 0)
            .filter_map(|index| statements.get(index))
            .map(|statement| statement.query().to_string())
            .collect();
        tracing::warn!(count = remaining.len(), "dependency cycle detected");
        return Err(Error::Cycle { remaining });
    }

    Ok(order)
}
