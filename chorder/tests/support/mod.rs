#![allow(dead_code)]

use chorder::source::explain_query;
use chorder::{BoxError, StatementAst};
use std::collections::HashMap;

pub const T1: &str = "create table t1 (z Int64) engine=MergeTree order by z";
pub const F1: &str = "create function f1 as () -> true";
pub const V1: &str = "create view v1 as select *, f1() as y from t1";
pub const V2: &str = "create view v2 as select * from v1";
pub const ADD_C: &str = "alter table t1 add column c UInt8";
pub const DROP_C: &str = "alter table t1 drop column c";
pub const RENAME_B_TO_C: &str = "alter table t1 rename column b to c";

pub fn select_with_alias_lines() -> Vec<&'static str> {
    vec![
        "SelectWithUnionQuery (children 1)",
        " ExpressionList (children 1)",
        "  SelectQuery (children 2)",
        "   ExpressionList (children 1)",
        "    Asterisk",
        "    Identifier z (alias n)",
        "    Function z (alias r) (children 1)",
        "     ExpressionList",
        "   TablesInSelectQuery (children 1)",
        "    TablesInSelectQueryElement (children 1)",
        "     TableExpression (children 1)",
        "      TableIdentifier my_table_or_view",
    ]
}

pub fn create_with_literals_lines() -> Vec<&'static str> {
    vec![
        "CreateQuery  my_table_or_view (children 2)",
        " Identifier my_table_or_view",
        " SelectWithUnionQuery (children 1)",
        "  ExpressionList (children 1)",
        "   SelectQuery (children 2)",
        "    ExpressionList (children 2)",
        "     Asterisk",
        "     Literal ' '",
        "     Literal 'a literal with spaces'",
        "     Literal Array_['an', 'array', 'literal']",
        "    TablesInSelectQuery (children 1)",
        "     TablesInSelectQueryElement (children 1)",
        "      TableExpression (children 1)",
        "       TableIdentifier z",
    ]
}

pub fn tuple_literal_lines() -> Vec<&'static str> {
    vec![
        "SelectWithUnionQuery (children 1)",
        " ExpressionList (children 1)",
        "  SelectQuery (children 1)",
        "   ExpressionList (children 1)",
        "    Function describe (children 1)",
        "     ExpressionList (children 2)",
        "      Literal 'thing'",
        "      Function array (children 1)",
        "       ExpressionList (children 2)",
        "        Literal Tuple_(UInt64_3, 'abc', 'abc')",
        "        Literal '{} and {} have {}'",
    ]
}

pub fn t1_lines() -> Vec<&'static str> {
    vec![
        "CreateQuery  t1 (children 3)",
        " Identifier t1",
        " Columns definition (children 1)",
        "  ExpressionList (children 1)",
        "   ColumnDeclaration z (children 1)",
        "    DataType Int64",
        " Storage definition (children 2)",
        "  Function MergeTree (children 1)",
        "   ExpressionList",
        "  Identifier z",
    ]
}

pub fn f1_lines() -> Vec<&'static str> {
    vec![
        "CreateFunctionQuery f1 (children 2)",
        " Identifier f1",
        " Function lambda (children 1)",
        "  ExpressionList (children 2)",
        "   Function tuple (children 1)",
        "    ExpressionList",
        "   Literal Bool_1",
    ]
}

pub fn v1_lines() -> Vec<&'static str> {
    vec![
        "CreateQuery  v1 (children 2)",
        " Identifier v1",
        " SelectWithUnionQuery (children 1)",
        "  ExpressionList (children 1)",
        "   SelectQuery (children 2)",
        "    ExpressionList (children 2)",
        "     Asterisk",
        "     Function f1 (alias y) (children 1)",
        "      ExpressionList",
        "    TablesInSelectQuery (children 1)",
        "     TablesInSelectQueryElement (children 1)",
        "      TableExpression (children 1)",
        "       TableIdentifier t1",
    ]
}

pub fn v2_lines() -> Vec<String> {
    view_over_lines("v2", "v1")
}

/// `create view <name> as select * from <table>`
pub fn view_over_lines(name: &'static str, table: &'static str) -> Vec<String> {
    vec![
        format!("CreateQuery  {} (children 2)", name),
        format!(" Identifier {}", name),
        " SelectWithUnionQuery (children 1)".to_string(),
        "  ExpressionList (children 1)".to_string(),
        "   SelectQuery (children 2)".to_string(),
        "    ExpressionList (children 1)".to_string(),
        "     Asterisk".to_string(),
        "    TablesInSelectQuery (children 1)".to_string(),
        "     TablesInSelectQueryElement (children 1)".to_string(),
        "      TableExpression (children 1)".to_string(),
        format!("       TableIdentifier {}", table),
    ]
}

/// `alter table <table> <COMMAND> <operands>` with identifier operands.
pub fn alter_lines(table: &str, command: &str, operands: &[&str]) -> Vec<String> {
    let mut lines = vec![
        format!("AlterQuery  {} (children 2)", table),
        " ExpressionList (children 1)".to_string(),
        format!("  AlterCommand {} (children {})", command, operands.len()),
    ];
    for operand in operands {
        lines.push(format!("   Identifier {}", operand));
    }
    lines.push(format!(" Identifier {}", table));
    lines
}

/// `alter table <table> <COMMAND> column <column> <ty>` for add and modify.
pub fn alter_declaration_lines(table: &str, command: &str, column: &str, ty: &str) -> Vec<String> {
    vec![
        format!("AlterQuery  {} (children 2)", table),
        " ExpressionList (children 1)".to_string(),
        format!("  AlterCommand {} (children 1)", command),
        format!("   ColumnDeclaration {} (children 1)", column),
        format!("    DataType {}", ty),
        format!(" Identifier {}", table),
    ]
}

/// `create table <name> (<columns> UInt64) engine=MergeTree order by tuple()`
pub fn create_table_lines(name: &str, columns: &[&str]) -> Vec<String> {
    let mut lines = vec![
        format!("CreateQuery  {} (children 3)", name),
        format!(" Identifier {}", name),
        " Columns definition (children 1)".to_string(),
        format!("  ExpressionList (children {})", columns.len()),
    ];
    for column in columns {
        lines.push(format!("   ColumnDeclaration {} (children 1)", column));
        lines.push("    DataType UInt64".to_string());
    }
    lines.push(" Storage definition (children 2)".to_string());
    lines.push("  Function MergeTree (children 1)".to_string());
    lines.push("   ExpressionList".to_string());
    lines.push("  Function tuple (children 1)".to_string());
    lines.push("   ExpressionList".to_string());
    lines
}

/// `select <columns> from <table>` wrapped in `create view <name>`.
pub fn view_selecting_lines(name: &str, table: &str, columns: &[&str]) -> Vec<String> {
    let mut lines = vec![
        format!("CreateQuery  {} (children 2)", name),
        format!(" Identifier {}", name),
        " SelectWithUnionQuery (children 1)".to_string(),
        "  ExpressionList (children 1)".to_string(),
        "   SelectQuery (children 2)".to_string(),
        format!("    ExpressionList (children {})", columns.len()),
    ];
    for column in columns {
        lines.push(format!("     Identifier {}", column));
    }
    lines.push("    TablesInSelectQuery (children 1)".to_string());
    lines.push("     TablesInSelectQueryElement (children 1)".to_string());
    lines.push("      TableExpression (children 1)".to_string());
    lines.push(format!("       TableIdentifier {}", table));
    lines
}

pub fn statement<S: AsRef<str>>(query: &str, lines: &[S]) -> StatementAst {
    StatementAst::from_dump(query, lines)
        .unwrap_or_else(|err| panic!("failed to parse dump for {:?}: {}", query, err))
}

/// An `AstSource` answering from canned dumps keyed by statement text.
pub fn canned_source(
    dumps: Vec<(&str, Vec<String>)>,
) -> impl FnMut(&str) -> Result<Vec<String>, BoxError> {
    let by_explain: HashMap<String, Vec<String>> = dumps
        .into_iter()
        .map(|(query, lines)| (explain_query(query), lines))
        .collect();

    move |explain: &str| -> Result<Vec<String>, BoxError> {
        by_explain
            .get(explain)
            .cloned()
            .ok_or_else(|| format!("no canned dump for {:?}", explain).into())
    }
}

pub fn owned(lines: Vec<&str>) -> Vec<String> {
    lines.into_iter().map(str::to_string).collect()
}

pub fn position(order: &[String], query: &str) -> usize {
    order
        .iter()
        .position(|candidate| candidate == query)
        .unwrap_or_else(|| panic!("{:?} missing from {:?}", query, order))
}
