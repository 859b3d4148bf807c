mod kdl;
mod parse;
mod types;

pub(crate) use kdl::{escape, print_node};
pub use kdl::print_kdl;
pub use parse::{alias_from_meta, parse_dump, parse_line};
pub use types::{AlterKind, AstNode, AstTree, NodeId, NodeKind, PreOrder};
