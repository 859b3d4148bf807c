pub mod error;
pub mod ir;
pub mod options;
pub mod order;
pub mod passes;
pub mod registry;
pub mod source;
pub mod statement;

pub use error::{format_for_tests, BoxError, Error};
pub use options::{ColumnMatching, OrderOptions};
pub use order::{order_batch, order_queries, order_statements};
pub use source::{AstSource, ClickHouseLocal};
pub use statement::{ColumnRef, StatementAst};
