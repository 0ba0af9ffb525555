#![cfg(feature = "cli")]

use std::fs;
use std::io::{Cursor, ErrorKind};

use tsqlc::analysis::check_left_joins;
use tsqlc::ast::Statement;
use tsqlc::cli::{self, CliError, FormatOptions, LintOptions, SearchOptions};
use tsqlc::search::{find_tables, SearchQuery, TablePattern, UsageContext};
use tsqlc::transform::qualify_tables;
use tsqlc::tsql::{self, Error};
use tsqlc::writer::to_sql;

const SCRIPT: &str = "
-- nightly order maintenance
begin
  insert into dbo.audit (id, note)
  select o.id, 'closed' from [dbo].[orders] o where o.status = 3;

  update o
     set status = 4
    from orders o
         join customers c on c.id = o.customer_id
   where c.region in (select region from regions where active = 1);

  delete from shop..orders where id not in (select order_id from invoices);

  if exists (select 1 from orders where status = 0)
    insert orders (id) values ((select max(id) + 1 from orders))
end";

fn hits(query: SearchQuery) -> Vec<(UsageContext, String, usize)> {
    let statements = tsql::parse(SCRIPT).unwrap();
    find_tables(&statements, query)
        .into_iter()
        .map(|hit| (hit.context, hit.table, hit.line))
        .collect()
}

// ============================================================================
// Entry points
// ============================================================================

#[test]
fn test_parse_whole_script() {
    let statements = tsql::parse(SCRIPT).unwrap();
    assert_eq!(statements.len(), 1);
    let Statement::Block(block) = &statements[0] else {
        panic!("expected a block");
    };
    assert_eq!(block.body.len(), 4);
}

#[test]
fn test_parse_from_reader_and_chars() {
    let from_reader = tsql::parse_reader(Cursor::new(SCRIPT.as_bytes())).unwrap();
    let from_chars = tsql::parse_chars(SCRIPT.chars().collect::<Vec<_>>()).unwrap();
    assert_eq!(from_reader, from_chars);
}

#[test]
fn test_parse_file() {
    let path = std::env::temp_dir().join(format!("tsqlc-{}.sql", std::process::id()));
    fs::write(&path, "select 1; select 2").unwrap();
    let statements = tsql::parse_file(&path);
    fs::remove_file(&path).unwrap();
    assert_eq!(statements.unwrap().len(), 2);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = tsql::parse_file("/definitely/not/here.sql").unwrap_err();
    assert!(matches!(err, Error::Io(ref e) if e.kind() == ErrorKind::NotFound));
}

#[test]
fn test_invalid_utf8_is_rejected() {
    let err = tsql::parse_bytes(&[b's', 0xff, 0xfe]).unwrap_err();
    assert!(matches!(err, Error::Io(ref e) if e.kind() == ErrorKind::InvalidData));
}

#[test]
fn test_parse_tokens_lexed_earlier() {
    let tokens = tsql::lex("select a -- trailing\nfrom t").unwrap();
    assert_eq!(tokens.len(), 5);
    let statements = tsql::parse_tokens(Some(tokens)).unwrap();
    assert_eq!(statements, tsql::parse("select a from t").unwrap());
}

#[test]
fn test_missing_sources() {
    assert_eq!(
        tsql::parse_source(None).unwrap_err().to_string(),
        "no characters source provided"
    );
    assert!(tsql::parse_source(Some("")).unwrap().is_empty());
}

#[test]
fn test_errors_keep_their_messages() {
    let lex = tsql::parse("select [open").unwrap_err();
    assert!(matches!(lex, Error::Parse(_)));
    assert_eq!(lex.to_string(), "`]` expected at line 1 char 13.");

    let lex = tsql::lex("select ?").unwrap_err();
    assert!(matches!(lex, Error::Lex(_)));
}

// ============================================================================
// Search
// ============================================================================

#[test]
fn test_search_classifies_every_use() {
    let found = hits(SearchQuery::new(TablePattern::name("orders")));
    assert_eq!(
        found,
        vec![
            (UsageContext::SelectInInsert, "[dbo].[orders]".to_string(), 5),
            (UsageContext::Update, "orders".to_string(), 9),
            (UsageContext::Select, "orders".to_string(), 15),
            (UsageContext::Insert, "orders".to_string(), 16),
            (UsageContext::SelectInInsert, "orders".to_string(), 16),
        ]
    );
}

#[test]
fn test_search_empty_schema_and_delete_target() {
    let found = hits(SearchQuery::new(TablePattern::name("shop.dbo.orders")));
    assert_eq!(found, vec![(UsageContext::Delete, "shop..orders".to_string(), 13)]);
}

#[test]
fn test_search_select_feeding_dml() {
    let found = hits(SearchQuery::new(TablePattern::name("regions")));
    assert_eq!(found, vec![(UsageContext::SelectInUpdate, "regions".to_string(), 11)]);

    let found = hits(SearchQuery::new(TablePattern::name("invoices")));
    assert_eq!(found, vec![(UsageContext::SelectInDelete, "invoices".to_string(), 13)]);
}

#[test]
fn test_search_by_regex_and_context() {
    let pattern = TablePattern::regex(r"(?i)^(audit|dbo\.audit|customers)$").unwrap();
    let query = SearchQuery::new(pattern).with_contexts(vec![UsageContext::Insert]);
    let found = hits(query);
    assert_eq!(found, vec![(UsageContext::Insert, "dbo.audit".to_string(), 4)]);
}

#[test]
fn test_search_through_cli_as_json() {
    let options = SearchOptions {
        table: "customers".into(),
        json: true,
        ..Default::default()
    };
    let out = cli::execute_search(SCRIPT, &options).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value[0]["context"], "select-in-update");
    assert_eq!(value[0]["table"], "customers");
    assert_eq!(value[0]["line"], 10);
}

// ============================================================================
// Analysis
// ============================================================================

#[test]
fn test_left_join_filters_across_statements() {
    let statements = tsql::parse(
        "select * from a left join b on b.id = a.id where b.x = 1 and b.y is null;
         update a set n = 1 from a left outer join c on c.id = a.id where not c.flag = 1;
         select * from a left join d on d.id = a.id where d.id is not null;
         select * from a join e on e.id = a.id where e.x = 1",
    )
    .unwrap();
    let findings: Vec<(usize, String)> = check_left_joins(&statements)
        .into_iter()
        .map(|finding| (finding.line, finding.reference))
        .collect();
    assert_eq!(
        findings,
        vec![
            (1, "b.x".to_string()),
            (2, "c.flag".to_string()),
            (3, "d.id".to_string()),
        ]
    );
}

#[test]
fn test_left_join_filters_in_subqueries() {
    let statements = tsql::parse(
        "select 1 where exists (select 1 from a left join b on b.id = a.id where B.x > 0)",
    )
    .unwrap();
    let findings = check_left_joins(&statements);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].alias, "b");
    assert_eq!(findings[0].reference, "B.x");
}

#[test]
fn test_lint_through_cli() {
    let out = cli::execute_lint(
        "select * from a left join b on b.id = a.id where b.x = 1",
        &LintOptions::default(),
    )
    .unwrap();
    assert_eq!(
        out,
        "line 1 char 50: `b.x` in WHERE drops the unmatched rows of LEFT JOIN `b`\n"
    );
}

// ============================================================================
// Rewrite pipeline
// ============================================================================

#[test]
fn test_qualify_write_and_reparse() {
    let mut statements = tsql::parse(SCRIPT).unwrap();
    // orders (update FROM), customers, regions, invoices, orders (exists), orders (insert), orders (subquery)
    assert_eq!(qualify_tables(&mut statements, "dbo"), 7);

    let written = to_sql(&statements);
    let reparsed = tsql::parse(&written).unwrap();
    assert_eq!(reparsed, statements);

    // dbo-qualified names still match the bare name
    let found = find_tables(&reparsed, SearchQuery::new(TablePattern::name("orders")));
    assert_eq!(found.len(), 5);
    assert!(found.iter().skip(1).all(|hit| hit.table == "dbo.orders"));
}

#[test]
fn test_format_through_cli() {
    let out = cli::execute_format(
        "select a from t",
        &FormatOptions {
            qualify: Some("hr".into()),
        },
    )
    .unwrap();
    assert_eq!(out, "SELECT  a\nFROM    hr.t\n\n");

    let plain = cli::execute_format("select a from t", &FormatOptions::default()).unwrap();
    assert_eq!(plain, "SELECT  a\nFROM    t\n\n");
}

#[test]
fn test_tokens_through_cli() {
    let out = cli::execute_tokens("select 'x'").unwrap();
    assert_eq!(out, "Token 1,1 - SELECT\nToken 1,8 - VarcharConstant => 'x'\n");
}

#[test]
fn test_cli_errors() {
    let err = cli::execute_format("select", &FormatOptions::default()).unwrap_err();
    assert!(matches!(err, CliError::Sql(Error::Parse(_))));
    assert_eq!(err.to_string(), "`Eof` unexpected at line 1 char 1.");
}
