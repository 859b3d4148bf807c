mod support;

use chorder::ir::tree::AlterKind;
use chorder::ColumnRef;
use support::*;

fn column(table: Option<&str>, name: &str) -> ColumnRef {
    ColumnRef {
        table: table.map(str::to_string),
        name: name.to_string(),
    }
}

#[test]
fn finds_referenced_tables_and_function_calls() {
    let ast = statement("raw query", &select_with_alias_lines());

    assert_eq!(ast.referenced_tables(), vec!["my_table_or_view"]);
    assert_eq!(ast.function_calls(), vec!["z"]);
    assert!(ast.created_tables().is_empty());
}

#[test]
fn referenced_tables_include_aliases() {
    let lines = [
        "SelectWithUnionQuery (children 1)",
        " ExpressionList (children 1)",
        "  SelectQuery (children 2)",
        "   ExpressionList (children 1)",
        "    Asterisk",
        "   TablesInSelectQuery (children 1)",
        "    TablesInSelectQueryElement (children 1)",
        "     TableExpression (children 1)",
        "      TableIdentifier t1 (alias some_alias)",
    ];
    let ast = statement("select * from t1 as some_alias", &lines);

    assert_eq!(ast.referenced_tables(), vec!["t1", "some_alias"]);
}

#[test]
fn finds_created_objects() {
    let table = statement(T1, &t1_lines());
    assert_eq!(table.created_tables(), vec!["t1"]);
    assert_eq!(table.create_table_columns(), vec!["z"]);
    assert_eq!(
        table.create_table_column_refs(),
        vec![column(Some("t1"), "z")]
    );

    let function = statement(F1, &f1_lines());
    assert_eq!(function.created_functions(), vec!["f1"]);
    assert!(function.created_tables().is_empty());
}

#[test]
fn storage_identifiers_are_not_column_declarations_or_selects() {
    let table = statement(T1, &t1_lines());

    assert!(table.select_columns().is_empty());
    assert_eq!(table.function_calls(), vec!["MergeTree"]);
}

#[test]
fn collects_select_columns_below_select_query() {
    let ast = statement("raw query", &select_with_alias_lines());
    assert_eq!(ast.select_columns(), vec!["z"]);

    let tuple = statement("raw query", &tuple_literal_lines());
    assert!(tuple.select_columns().is_empty());
}

#[test]
fn extracts_alter_columns_by_command() {
    let add = statement(ADD_C, &alter_declaration_lines("t1", "ADD_COLUMN", "c", "UInt8"));
    assert_eq!(add.added_columns(), vec!["c"]);
    assert_eq!(add.alter_targets(), vec!["t1"]);
    assert!(add.dropped_columns().is_empty());

    let modify = statement(
        "alter table t1 modify column c UInt16",
        &alter_declaration_lines("t1", "MODIFY_COLUMN", "c", "UInt16"),
    );
    assert_eq!(modify.modified_columns(), vec!["c"]);
    assert!(modify.added_columns().is_empty());

    let drop = statement(DROP_C, &alter_lines("t1", "DROP_COLUMN", &["c"]));
    assert_eq!(drop.dropped_columns(), vec!["c"]);
    assert_eq!(
        drop.alter_column_refs(AlterKind::DropColumn),
        vec![column(Some("t1"), "c")]
    );

    let comment = statement(
        "alter table t1 comment column c 'hi'",
        &alter_lines("t1", "COMMENT_COLUMN", &["c"]),
    );
    assert_eq!(comment.commented_columns(), vec!["c"]);

    let materialize = statement(
        "alter table t1 materialize column c",
        &alter_lines("t1", "MATERIALIZE_COLUMN", &["c"]),
    );
    assert_eq!(materialize.materialized_columns(), vec!["c"]);
}

#[test]
fn alter_table_identifier_is_not_an_operand() {
    let drop = statement(DROP_C, &alter_lines("t1", "DROP_COLUMN", &["c"]));

    assert_eq!(drop.dropped_columns(), vec!["c"]);
    assert!(drop.select_columns().is_empty());
}

#[test]
fn rename_operands_are_positional() {
    let rename = statement(RENAME_B_TO_C, &alter_lines("t1", "RENAME_COLUMN", &["b", "c"]));

    assert_eq!(rename.renamed_from_columns(), vec!["b"]);
    assert_eq!(rename.renamed_to_columns(), vec!["c"]);
    assert_eq!(
        rename.alter_column_refs(AlterKind::RenameColumn),
        vec![column(Some("t1"), "b"), column(Some("t1"), "c")]
    );
}

#[test]
fn rename_with_a_single_operand_has_no_target() {
    let rename = statement("alter table t1 rename column b", &alter_lines("t1", "RENAME_COLUMN", &["b"]));

    assert_eq!(rename.renamed_from_columns(), vec!["b"]);
    assert!(rename.renamed_to_columns().is_empty());
}

#[test]
fn resolves_select_qualifiers_through_aliases() {
    let lines = [
        "SelectWithUnionQuery (children 1)",
        " ExpressionList (children 1)",
        "  SelectQuery (children 2)",
        "   ExpressionList (children 2)",
        "    Identifier x.id",
        "    Identifier name",
        "   TablesInSelectQuery (children 2)",
        "    TablesInSelectQueryElement (children 1)",
        "     TableExpression (children 1)",
        "      TableIdentifier accounts (alias x)",
        "    TablesInSelectQueryElement (children 2)",
        "     TableJoin (children 1)",
        "      Function equals (children 1)",
        "       ExpressionList (children 2)",
        "        Identifier x.id",
        "        Identifier users.account_id",
        "     TableExpression (children 1)",
        "      TableIdentifier users",
    ];
    let ast = statement(
        "select x.id, name from accounts as x join users on x.id = users.account_id",
        &lines,
    );

    assert_eq!(
        ast.select_column_refs(),
        vec![
            column(Some("accounts"), "id"),
            column(None, "name"),
            column(Some("accounts"), "id"),
            column(Some("users"), "account_id"),
        ]
    );
}

#[test]
fn single_table_select_owns_unqualified_columns() {
    let ast = statement(
        "create view v as select id, total from analytics.orders",
        &[
            "CreateQuery  v (children 2)",
            " Identifier v",
            " SelectWithUnionQuery (children 1)",
            "  ExpressionList (children 1)",
            "   SelectQuery (children 2)",
            "    ExpressionList (children 2)",
            "     Identifier id",
            "     Identifier total",
            "    TablesInSelectQuery (children 1)",
            "     TablesInSelectQueryElement (children 1)",
            "      TableExpression (children 1)",
            "       TableIdentifier analytics.orders",
        ],
    );

    assert_eq!(
        ast.select_column_refs(),
        vec![column(Some("orders"), "id"), column(Some("orders"), "total")]
    );
}

#[test]
fn subquery_tables_do_not_count_for_the_outer_select() {
    let lines = [
        "SelectWithUnionQuery (children 1)",
        " ExpressionList (children 1)",
        "  SelectQuery (children 2)",
        "   ExpressionList (children 1)",
        "    Identifier id",
        "   TablesInSelectQuery (children 1)",
        "    TablesInSelectQueryElement (children 1)",
        "     TableExpression (children 1)",
        "      Subquery (children 1)",
        "       SelectWithUnionQuery (children 1)",
        "        ExpressionList (children 1)",
        "         SelectQuery (children 2)",
        "          ExpressionList (children 1)",
        "           Identifier id",
        "          TablesInSelectQuery (children 1)",
        "           TablesInSelectQueryElement (children 1)",
        "            TableExpression (children 1)",
        "             TableIdentifier inner_table",
    ];
    let ast = statement("select id from (select id from inner_table)", &lines);

    assert_eq!(
        ast.select_column_refs(),
        vec![column(None, "id"), column(Some("inner_table"), "id")]
    );
}

#[test]
fn values_where_keeps_duplicates_in_document_order() {
    let ast = statement("raw query", &tuple_literal_lines());

    let functions = ast.values_where(|tree, id| tree.node(id).kind.tag() == "Function");
    assert_eq!(functions, vec!["describe", "array"]);

    let literals = ast.values_where(|tree, id| tree.node(id).kind.tag() == "Literal");
    assert_eq!(
        literals,
        vec!["'thing'", "Tuple_(UInt64_3, 'abc', 'abc')", "'{} and {} have {}'"]
    );
}

#[test]
fn materialized_view_target_counts_as_referenced_table() {
    let query = "create materialized view mv1 to dest as select z from t1";
    let ast = statement(query, &view_selecting_lines("mv1", "t1", &["z"]));

    assert_eq!(ast.referenced_tables(), vec!["dest", "t1"]);
    assert_eq!(ast.created_tables(), vec!["mv1"]);
}
