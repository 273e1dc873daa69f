use super::*;
use crate::models::{CharLength, ColumnDef, TableIdentifier};

fn plain(name: &str, data_type: &str, nullable: bool) -> ColumnDef {
    ColumnDef {
        name: name.to_string(),
        data_type: data_type.to_string(),
        char_length: None,
        numeric_precision: None,
        numeric_scale: None,
        is_nullable: nullable,
    }
}

fn varchar(name: &str, length: CharLength, nullable: bool) -> ColumnDef {
    ColumnDef {
        name: name.to_string(),
        data_type: "varchar".to_string(),
        char_length: Some(length),
        numeric_precision: None,
        numeric_scale: None,
        is_nullable: nullable,
    }
}

fn decimal(name: &str, precision: u8, scale: u8) -> ColumnDef {
    ColumnDef {
        name: name.to_string(),
        data_type: "decimal".to_string(),
        char_length: None,
        numeric_precision: Some(precision),
        numeric_scale: Some(scale),
        is_nullable: false,
    }
}

fn sample_schema() -> Vec<ColumnDef> {
    vec![
        plain("Id", "int", false),
        varchar("Name", CharLength::Bounded(50), true),
        decimal("Balance", 10, 2),
    ]
}

#[test]
fn test_identical_schemas_match() {
    let schema = sample_schema();
    assert!(schemas_match(&schema, &schema.clone()));
}

#[test]
fn test_names_and_types_compare_case_insensitively() {
    let source = sample_schema();
    let mut target = sample_schema();
    target[0].name = "ID".to_string();
    target[1].data_type = "VARCHAR".to_string();
    assert!(schemas_match(&source, &target));
}

#[test]
fn test_name_difference_at_same_position_fails() {
    let source = sample_schema();
    let mut target = sample_schema();
    target[0].name = "Identifier".to_string();
    assert!(!schemas_match(&source, &target));
}

#[test]
fn test_base_type_difference_at_same_position_fails() {
    let source = sample_schema();
    let mut target = sample_schema();
    target[0].data_type = "bigint".to_string();
    assert!(!schemas_match(&source, &target));
}

#[test]
fn test_column_count_mismatch_fails() {
    let source = sample_schema();
    let mut target = sample_schema();
    target.push(plain("Extra", "int", true));
    assert!(!schemas_match(&source, &target));
}

#[test]
fn test_reordered_columns_fail() {
    let source = sample_schema();
    let mut target = sample_schema();
    target.swap(0, 1);
    assert!(!schemas_match(&source, &target));
}

#[test]
fn test_length_difference_fails() {
    let source = sample_schema();
    let mut target = sample_schema();
    target[1].char_length = Some(CharLength::Bounded(60));
    assert!(!schemas_match(&source, &target));

    target[1].char_length = Some(CharLength::Max);
    assert!(!schemas_match(&source, &target));
}

#[test]
fn test_nullability_difference_fails() {
    let source = sample_schema();
    let mut target = sample_schema();
    target[1].is_nullable = false;
    assert!(!schemas_match(&source, &target));
}

#[test]
fn test_precision_and_scale_differences_fail() {
    let source = sample_schema();
    let mut target = sample_schema();
    target[2].numeric_precision = Some(12);
    assert!(!schemas_match(&source, &target));

    let mut target = sample_schema();
    target[2].numeric_scale = Some(4);
    assert!(!schemas_match(&source, &target));
}

#[test]
fn test_create_table_renders_lengths_and_nullability() {
    let table = TableIdentifier::parse("dbo.Customers2");
    let columns = vec![
        plain("Id", "int", false),
        varchar("Name", CharLength::Bounded(50), true),
        decimal("Balance", 10, 2),
        plain("CreatedAt", "datetime2", true),
    ];

    let ddl = build_create_table(&table, &columns);
    let expected = "CREATE TABLE [dbo].[Customers2] (
    [Id] int NOT NULL,
    [Name] varchar(50) NULL,
    [Balance] decimal(10,2) NOT NULL,
    [CreatedAt] datetime2 NULL
)";
    assert_eq!(ddl, expected);
}

#[test]
fn test_create_table_renders_unbounded_as_max() {
    let table = TableIdentifier::parse("dbo.Notes");
    let columns = vec![
        varchar("Body", CharLength::Max, true),
        ColumnDef {
            name: "Payload".to_string(),
            data_type: "varbinary".to_string(),
            char_length: Some(CharLength::Max),
            numeric_precision: None,
            numeric_scale: None,
            is_nullable: true,
        },
    ];

    let ddl = build_create_table(&table, &columns);
    assert!(ddl.contains("[Body] varchar(max) NULL"));
    assert!(ddl.contains("[Payload] varbinary(max) NULL"));
}

#[test]
fn test_create_table_defaults_missing_char_length_to_max() {
    let table = TableIdentifier::parse("dbo.Notes");
    let mut column = varchar("Body", CharLength::Bounded(1), true);
    column.char_length = None;

    let ddl = build_create_table(&table, &[column]);
    assert!(ddl.contains("[Body] varchar(max) NULL"));
}

#[test]
fn test_create_table_defaults_decimal_to_18_0() {
    let table = TableIdentifier::parse("dbo.Ledger");
    let mut column = decimal("Amount", 1, 1);
    column.numeric_precision = None;
    column.numeric_scale = None;

    let ddl = build_create_table(&table, &[column]);
    assert!(ddl.contains("[Amount] decimal(18,0) NOT NULL"));
}

#[test]
fn test_create_table_quotes_awkward_identifiers() {
    let table = TableIdentifier::parse("dbo.Odd]Name");
    let columns = vec![plain("Col]umn", "int", false)];

    let ddl = build_create_table(&table, &columns);
    assert!(ddl.starts_with("CREATE TABLE [dbo].[Odd]]Name] ("));
    assert!(ddl.contains("[Col]]umn] int NOT NULL"));
}
