mod kdl;
mod types;

pub use kdl::{parse_kdl, print_dependencies_kdl, print_kdl};
pub use types::{BatchIr, StatementIr};
