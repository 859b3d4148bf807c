/// Index of a node inside an [`AstTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Dump node types that dependency extraction cares about. Every other type
/// tag is carried through as [`NodeKind::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    CreateQuery,
    CreateFunctionQuery,
    AlterQuery,
    AlterCommand,
    TableIdentifier,
    Identifier,
    ColumnDeclaration,
    Columns,
    ExpressionList,
    Function,
    SelectQuery,
    MaterializedViewToTable,
    Other(String),
}

impl NodeKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "CreateQuery" => NodeKind::CreateQuery,
            "CreateFunctionQuery" => NodeKind::CreateFunctionQuery,
            "AlterQuery" => NodeKind::AlterQuery,
            "AlterCommand" => NodeKind::AlterCommand,
            "TableIdentifier" => NodeKind::TableIdentifier,
            "Identifier" => NodeKind::Identifier,
            "ColumnDeclaration" => NodeKind::ColumnDeclaration,
            "Columns" => NodeKind::Columns,
            "ExpressionList" => NodeKind::ExpressionList,
            "Function" => NodeKind::Function,
            "SelectQuery" => NodeKind::SelectQuery,
            "MaterializedViewToTable" => NodeKind::MaterializedViewToTable,
            other => NodeKind::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            NodeKind::CreateQuery => "CreateQuery",
            NodeKind::CreateFunctionQuery => "CreateFunctionQuery",
            NodeKind::AlterQuery => "AlterQuery",
            NodeKind::AlterCommand => "AlterCommand",
            NodeKind::TableIdentifier => "TableIdentifier",
            NodeKind::Identifier => "Identifier",
            NodeKind::ColumnDeclaration => "ColumnDeclaration",
            NodeKind::Columns => "Columns",
            NodeKind::ExpressionList => "ExpressionList",
            NodeKind::Function => "Function",
            NodeKind::SelectQuery => "SelectQuery",
            NodeKind::MaterializedViewToTable => "MaterializedViewToTable",
            NodeKind::Other(tag) => tag,
        }
    }
}

/// The ALTER sub-operation named by an `AlterCommand` node's value.
///
/// `CLEAR COLUMN` renders as `DROP_COLUMN` in the dump, so it lands in
/// [`AlterKind::DropColumn`] as well.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AlterKind {
    AddColumn,
    DropColumn,
    ModifyColumn,
    CommentColumn,
    MaterializeColumn,
    RenameColumn,
}

impl AlterKind {
    pub fn from_command(value: &str) -> Option<Self> {
        match value {
            "ADD_COLUMN" => Some(AlterKind::AddColumn),
            "DROP_COLUMN" => Some(AlterKind::DropColumn),
            "MODIFY_COLUMN" => Some(AlterKind::ModifyColumn),
            "COMMENT_COLUMN" => Some(AlterKind::CommentColumn),
            "MATERIALIZE_COLUMN" => Some(AlterKind::MaterializeColumn),
            "RENAME_COLUMN" => Some(AlterKind::RenameColumn),
            _ => None,
        }
    }

    /// Node kind of the column operand under this command.
    pub fn operand_kind(self) -> NodeKind {
        match self {
            AlterKind::AddColumn | AlterKind::ModifyColumn => {
                NodeKind::ColumnDeclaration
            }
            AlterKind::DropColumn
            | AlterKind::CommentColumn
            | AlterKind::MaterializeColumn
            | AlterKind::RenameColumn => NodeKind::Identifier,
        }
    }
}

/// One dump line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AstNode {
    pub kind: NodeKind,
    pub value: Option<String>,
    /// Database or table prefix split off a dotted value.
    pub qualifier: Option<String>,
    pub alias: Option<String>,
    /// Parenthesized annotations, parentheses included.
    pub meta: Option<String>,
    pub indent: usize,
    /// Empty for nodes synthesized from the statement text.
    pub raw_line: String,
}

impl AstNode {
    pub fn new(kind: NodeKind, indent: usize) -> Self {
        AstNode {
            kind,
            value: None,
            qualifier: None,
            alias: None,
            meta: None,
            indent,
            raw_line: String::new(),
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }
}

#[derive(Clone, Debug)]
struct Slot {
    node: AstNode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena holding one statement's dump tree. The first node pushed is the
/// root; children are kept in document order.
#[derive(Clone, Debug, Default)]
pub struct AstTree {
    slots: Vec<Slot>,
}

impl AstTree {
    pub(crate) fn push(&mut self, node: AstNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.slots.len());
        if let Some(parent) = parent {
            self.slots[parent.0].children.push(id);
        }
        self.slots.push(Slot {
            node,
            parent,
            children: Vec::new(),
        });
        id
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Root of a non-empty tree.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &AstNode {
        &self.slots[id.0].node
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.slots[id.0].children
    }

    /// Depth-first pre-order walk from the root.
    pub fn walk(&self) -> PreOrder<'_> {
        let stack = if self.is_empty() {
            Vec::new()
        } else {
            vec![self.root()]
        };
        PreOrder { tree: self, stack }
    }

    pub fn parent_is(&self, id: NodeId, kind: &NodeKind) -> bool {
        self.parent(id)
            .map(|parent| &self.node(parent).kind == kind)
            .unwrap_or(false)
    }

    pub fn nearest_ancestor(&self, id: NodeId, kind: &NodeKind) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(candidate) = current {
            if &self.node(candidate).kind == kind {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }

    /// Position of `id` among its parent's children.
    pub fn child_position(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|child| *child == id)
    }

    /// Descendants of `id`, pre-order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> PreOrder<'_> {
        let mut stack = self.children(id).to_vec();
        stack.reverse();
        PreOrder { tree: self, stack }
    }
}

pub struct PreOrder<'a> {
    tree: &'a AstTree,
    stack: Vec<NodeId>,
}

impl Iterator for PreOrder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
