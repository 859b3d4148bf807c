use crate::error::Error;
use crate::ir::tree::{self, AlterKind, AstTree, NodeId, NodeKind};
use crate::source::{explain_query, AstSource};

/// A column as seen by one statement. `table` is the table the column is
/// known to belong to, if the statement pins it down.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub table: Option<String>,
    pub name: String,
}

/// One parsed statement: its dump tree plus the original text.
#[derive(Clone, Debug)]
pub struct StatementAst {
    query: String,
    tree: AstTree,
}

impl StatementAst {
    /// Fetches the dump for `query` from `source` and parses it.
    pub fn from_query<S>(query: &str, source: &mut S) -> Result<Self, Error>
    where
        S: AstSource + ?Sized,
    {
        if query.trim().is_empty() {
            return Err(Error::Input("query cannot be empty".into()));
        }

        let lines = source
            .explain_ast(&explain_query(query))
            .map_err(Error::Fetch)?;
        Self::from_dump(query, &lines)
    }

    pub fn from_dump<S: AsRef<str>>(query: &str, lines: &[S]) -> Result<Self, Error> {
        let tree = tree::parse_dump(query, lines)?;
        tracing::debug!(nodes = tree.len(), query, "parsed statement dump");
        Ok(StatementAst {
            query: query.to_string(),
            tree,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn tree(&self) -> &AstTree {
        &self.tree
    }

    /// Values of matching nodes in pre-order, duplicates kept. Nodes without
    /// a value are skipped.
    pub fn values_where<F>(&self, matches: F) -> Vec<String>
    where
        F: Fn(&AstTree, NodeId) -> bool,
    {
        self.tree
            .walk()
            .filter(|id| matches(&self.tree, *id))
            .filter_map(|id| self.tree.node(id).value.clone())
            .collect()
    }

    fn values_of_kind(&self, kind: NodeKind) -> Vec<String> {
        self.values_where(|tree, id| tree.node(id).kind == kind)
    }

    /// Tables and views created by this statement.
    pub fn created_tables(&self) -> Vec<String> {
        self.values_of_kind(NodeKind::CreateQuery)
    }

    pub fn created_functions(&self) -> Vec<String> {
        self.values_of_kind(NodeKind::CreateFunctionQuery)
    }

    pub fn alter_targets(&self) -> Vec<String> {
        self.values_of_kind(NodeKind::AlterQuery)
    }

    pub fn function_calls(&self) -> Vec<String> {
        self.values_of_kind(NodeKind::Function)
    }

    /// Table identifiers, each followed by its alias when it has one.
    pub fn referenced_tables(&self) -> Vec<String> {
        let mut out = Vec::new();
        for id in self.tree.walk() {
            let node = self.tree.node(id);
            if node.kind != NodeKind::TableIdentifier {
                continue;
            }
            out.extend(node.value.clone());
            out.extend(node.alias.clone());
        }
        out
    }

    pub fn create_table_columns(&self) -> Vec<String> {
        names(self.create_table_column_refs())
    }

    pub fn added_columns(&self) -> Vec<String> {
        names(self.alter_column_refs(AlterKind::AddColumn))
    }

    /// Includes `CLEAR COLUMN`, which the dump renders as a drop.
    pub fn dropped_columns(&self) -> Vec<String> {
        names(self.alter_column_refs(AlterKind::DropColumn))
    }

    pub fn modified_columns(&self) -> Vec<String> {
        names(self.alter_column_refs(AlterKind::ModifyColumn))
    }

    pub fn commented_columns(&self) -> Vec<String> {
        names(self.alter_column_refs(AlterKind::CommentColumn))
    }

    pub fn materialized_columns(&self) -> Vec<String> {
        names(self.alter_column_refs(AlterKind::MaterializeColumn))
    }

    pub fn renamed_from_columns(&self) -> Vec<String> {
        names(self.renamed_from_column_refs())
    }

    pub fn renamed_to_columns(&self) -> Vec<String> {
        names(self.renamed_to_column_refs())
    }

    pub fn select_columns(&self) -> Vec<String> {
        names(self.select_column_refs())
    }

    /// `ColumnDeclaration`s directly under `CreateQuery > Columns > ExpressionList`.
    pub fn create_table_column_refs(&self) -> Vec<ColumnRef> {
        let tree = &self.tree;
        let mut out = Vec::new();

        for id in tree.walk() {
            if tree.node(id).kind != NodeKind::ColumnDeclaration
                || !tree.parent_is(id, &NodeKind::ExpressionList)
            {
                continue;
            }

            let Some(list) = tree.parent(id) else { continue };
            if !tree.parent_is(list, &NodeKind::Columns) {
                continue;
            }
            let Some(columns) = tree.parent(list) else { continue };
            if !tree.parent_is(columns, &NodeKind::CreateQuery) {
                continue;
            }

            let table = tree
                .parent(columns)
                .and_then(|create| tree.node(create).value.clone());
            if let Some(name) = tree.node(id).value.clone() {
                out.push(ColumnRef { table, name });
            }
        }

        out
    }

    /// Column operands of `AlterCommand`s of the given kind. For renames this
    /// returns both the source and the target name.
    pub fn alter_column_refs(&self, kind: AlterKind) -> Vec<ColumnRef> {
        self.alter_operands(kind, |_, _| true)
    }

    pub fn renamed_from_column_refs(&self) -> Vec<ColumnRef> {
        self.rename_column_refs(0)
    }

    pub fn renamed_to_column_refs(&self) -> Vec<ColumnRef> {
        self.rename_column_refs(1)
    }

    /// Rename operands are positional: child 0 is the old name, child 1 the new.
    fn rename_column_refs(&self, position: usize) -> Vec<ColumnRef> {
        self.alter_operands(AlterKind::RenameColumn, |tree, id| {
            tree.child_position(id) == Some(position)
        })
    }

    fn alter_operands<F>(&self, kind: AlterKind, keep: F) -> Vec<ColumnRef>
    where
        F: Fn(&AstTree, NodeId) -> bool,
    {
        let tree = &self.tree;
        let operand_kind = kind.operand_kind();
        let mut out = Vec::new();

        for id in tree.walk() {
            let node = tree.node(id);
            if node.kind != operand_kind || !self.parent_is_alter(id, kind) {
                continue;
            }
            if !keep(tree, id) {
                continue;
            }

            let table = tree
                .nearest_ancestor(id, &NodeKind::AlterQuery)
                .and_then(|alter| tree.node(alter).value.clone());
            if let Some(name) = node.value.clone() {
                out.push(ColumnRef { table, name });
            }
        }

        out
    }

    fn parent_is_alter(&self, id: NodeId, kind: AlterKind) -> bool {
        let Some(parent) = self.tree.parent(id) else {
            return false;
        };
        let parent = self.tree.node(parent);
        parent.kind == NodeKind::AlterCommand
            && parent.value().and_then(AlterKind::from_command) == Some(kind)
    }

    /// Identifiers inside a `SelectQuery`, with their table resolved where
    /// possible.
    ///
    /// A qualifier naming one of the select's tables (by name or alias) is
    /// resolved to that table's name. An unqualified identifier in a
    /// single-table select belongs to that table. Anything else is left
    /// without a table and matches columns of every table.
    pub fn select_column_refs(&self) -> Vec<ColumnRef> {
        let tree = &self.tree;
        let mut out = Vec::new();

        for id in tree.walk() {
            let node = tree.node(id);
            if node.kind != NodeKind::Identifier
                || tree.parent_is(id, &NodeKind::SelectQuery)
            {
                continue;
            }
            let Some(select) = tree.nearest_ancestor(id, &NodeKind::SelectQuery) else {
                continue;
            };
            let Some(name) = node.value.clone() else {
                continue;
            };

            let candidates = self.select_tables(select);
            let table = match node.qualifier() {
                Some(qualifier) => candidates
                    .iter()
                    .find(|(table, alias)| {
                        table == qualifier || alias.as_deref() == Some(qualifier)
                    })
                    .map(|(table, _)| table.clone()),
                None if candidates.len() == 1 => Some(candidates[0].0.clone()),
                None => None,
            };

            out.push(ColumnRef { table, name });
        }

        out
    }

    /// `(name, alias)` of the tables read by `select` itself, not by nested
    /// subqueries.
    fn select_tables(&self, select: NodeId) -> Vec<(String, Option<String>)> {
        let tree = &self.tree;
        tree.descendants(select)
            .filter(|id| tree.node(*id).kind == NodeKind::TableIdentifier)
            .filter(|id| tree.nearest_ancestor(*id, &NodeKind::SelectQuery) == Some(select))
            .filter_map(|id| {
                let node = tree.node(id);
                node.value.clone().map(|table| (table, node.alias.clone()))
            })
            .collect()
    }
}

fn names(columns: Vec<ColumnRef>) -> Vec<String> {
    columns.into_iter().map(|column| column.name).collect()
}
