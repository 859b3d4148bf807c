use crate::ir::tree::AlterKind;
use crate::options::{ColumnMatching, OrderOptions};
use crate::statement::{ColumnRef, StatementAst};
use std::collections::BTreeSet;
use std::fmt;

/// Why one statement has to run before another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DependencyRule {
    /// Creates a table or view the later statement reads or alters.
    CreatesTable,
    /// Creates a function the later statement calls.
    CreatesFunction,
    /// Introduces a column the later statement uses.
    IntroducesColumn,
    /// Declares a column the later statement renames something to.
    DeclaresRenameTarget,
    /// Uses a column the later statement drops.
    UsesDroppedColumn,
}

impl fmt::Display for DependencyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DependencyRule::CreatesTable => "creates-table",
            DependencyRule::CreatesFunction => "creates-function",
            DependencyRule::IntroducesColumn => "introduces-column",
            DependencyRule::DeclaresRenameTarget => "declares-rename-target",
            DependencyRule::UsesDroppedColumn => "uses-dropped-column",
        };
        f.write_str(name)
    }
}

/// Must-run-before relation over one batch, addressed by input position.
/// At most one edge exists per ordered pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    parents: Vec<BTreeSet<usize>>,
    dependents: Vec<BTreeSet<usize>>,
}

impl DependencyGraph {
    pub fn with_len(len: usize) -> Self {
        DependencyGraph {
            parents: vec![BTreeSet::new(); len],
            dependents: vec![BTreeSet::new(); len],
        }
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Records that `from` runs before `to`. Returns false if the edge was
    /// already present.
    pub fn add_edge(&mut self, from: usize, to: usize) -> bool {
        let added = self.dependents[from].insert(to);
        self.parents[to].insert(from);
        added
    }

    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.dependents
            .get(from)
            .map(|dependents| dependents.contains(&to))
            .unwrap_or(false)
    }

    /// Statements that must run before `index`.
    pub fn parents(&self, index: usize) -> &BTreeSet<usize> {
        &self.parents[index]
    }

    /// Statements that must run after `index`.
    pub fn dependents(&self, index: usize) -> &BTreeSet<usize> {
        &self.dependents[index]
    }

    pub fn edge_count(&self) -> usize {
        self.dependents.iter().map(BTreeSet::len).sum()
    }

    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.dependents
            .iter()
            .enumerate()
            .flat_map(|(from, dependents)| dependents.iter().map(move |to| (from, *to)))
    }
}

/// Everything the edge rules look at, extracted once per statement.
struct StatementFacts {
    created_tables: Vec<String>,
    created_functions: Vec<String>,
    referenced_tables: Vec<String>,
    alter_targets: Vec<String>,
    function_calls: Vec<String>,
    /// Created, added, or renamed-to columns.
    originating_columns: Vec<ColumnRef>,
    /// Created or added columns.
    declared_columns: Vec<ColumnRef>,
    /// Selected, modified, commented, materialized, or renamed-from columns.
    consumed_columns: Vec<ColumnRef>,
    renamed_to_columns: Vec<ColumnRef>,
    /// Every column use that has to happen before a drop of that column.
    pre_drop_columns: Vec<ColumnRef>,
    dropped_columns: Vec<ColumnRef>,
}

impl StatementFacts {
    fn extract(statement: &StatementAst) -> Self {
        let created = statement.create_table_column_refs();
        let added = statement.alter_column_refs(AlterKind::AddColumn);
        let modified = statement.alter_column_refs(AlterKind::ModifyColumn);
        let commented = statement.alter_column_refs(AlterKind::CommentColumn);
        let materialized = statement.alter_column_refs(AlterKind::MaterializeColumn);
        let selected = statement.select_column_refs();
        let renamed_from = statement.renamed_from_column_refs();
        let renamed_to = statement.renamed_to_column_refs();

        let declared_columns = concat(&[&created, &added]);
        let originating_columns = concat(&[&created, &added, &renamed_to]);
        let consumed_columns =
            concat(&[&selected, &modified, &commented, &materialized, &renamed_from]);
        let pre_drop_columns = concat(&[
            &selected,
            &added,
            &modified,
            &commented,
            &materialized,
            &renamed_from,
            &renamed_to,
        ]);

        StatementFacts {
            created_tables: statement.created_tables(),
            created_functions: statement.created_functions(),
            referenced_tables: statement.referenced_tables(),
            alter_targets: statement.alter_targets(),
            function_calls: statement.function_calls(),
            originating_columns,
            declared_columns,
            consumed_columns,
            renamed_to_columns: renamed_to,
            pre_drop_columns,
            dropped_columns: statement.alter_column_refs(AlterKind::DropColumn),
        }
    }
}

/// Builds the dependency graph for a batch.
pub fn run(statements: &[StatementAst], options: &OrderOptions) -> DependencyGraph {
    let facts: Vec<StatementFacts> = statements.iter().map(StatementFacts::extract).collect();
    let mut graph = DependencyGraph::with_len(statements.len());

    for (from, earlier) in facts.iter().enumerate() {
        for (to, later) in facts.iter().enumerate() {
            if from == to {
                continue;
            }

            if let Some(rule) = first_matching_rule(earlier, later, options.column_matching) {
                if graph.add_edge(from, to) {
                    tracing::debug!(
                        %rule,
                        before = statements[from].query(),
                        after = statements[to].query(),
                        "recorded dependency"
                    );
                }
            }
        }
    }

    graph
}

fn first_matching_rule(
    earlier: &StatementFacts,
    later: &StatementFacts,
    matching: ColumnMatching,
) -> Option<DependencyRule> {
    let columns = |a: &[ColumnRef], b: &[ColumnRef]| columns_overlap(a, b, matching);

    if overlaps(&earlier.created_tables, &later.referenced_tables)
        || overlaps(&earlier.created_tables, &later.alter_targets)
    {
        return Some(DependencyRule::CreatesTable);
    }
    if overlaps(&earlier.created_functions, &later.function_calls) {
        return Some(DependencyRule::CreatesFunction);
    }
    if columns(&earlier.originating_columns, &later.consumed_columns) {
        return Some(DependencyRule::IntroducesColumn);
    }
    if columns(&earlier.declared_columns, &later.renamed_to_columns) {
        return Some(DependencyRule::DeclaresRenameTarget);
    }
    if columns(&earlier.pre_drop_columns, &later.dropped_columns) {
        return Some(DependencyRule::UsesDroppedColumn);
    }
    None
}

fn overlaps(a: &[String], b: &[String]) -> bool {
    a.iter().any(|value| b.contains(value))
}

fn columns_overlap(a: &[ColumnRef], b: &[ColumnRef], matching: ColumnMatching) -> bool {
    a.iter()
        .any(|left| b.iter().any(|right| same_column(left, right, matching)))
}

fn same_column(left: &ColumnRef, right: &ColumnRef, matching: ColumnMatching) -> bool {
    if left.name != right.name {
        return false;
    }
    match (matching, &left.table, &right.table) {
        (ColumnMatching::Qualified, Some(left), Some(right)) => left == right,
        _ => true,
    }
}

fn concat(parts: &[&Vec<ColumnRef>]) -> Vec<ColumnRef> {
    parts.iter().flat_map(|part| part.iter().cloned()).collect()
}
