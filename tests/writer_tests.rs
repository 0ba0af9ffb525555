// tests/writer_tests.rs

use tsqlc::parser::parse;
use tsqlc::writer::{to_sql, write_sql, SqlWriter};

/// Parse, write, re-parse: the trees must match and the text must be stable.
fn assert_round_trip(source: &str) {
    let original = parse(source).unwrap_or_else(|e| panic!("{source:?}: {e}"));
    let written = to_sql(&original);
    let reparsed = parse(&written).unwrap_or_else(|e| panic!("{written:?}: {e}"));
    assert_eq!(original, reparsed, "tree changed after writing:\n{written}");
    assert_eq!(written, to_sql(&reparsed), "layout is not stable");
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_insert_layout() {
    let statements =
        parse("insert into dbo.t with (tablockx) (a, b) values (1, 'x'), (2, N'y');").unwrap();
    assert_eq!(
        to_sql(&statements),
        "INSERT  dbo.t WITH (TABLOCKX) (\n          a\n          ,b\n        )\n\
         VALUES  (1, 'x')\n        ,(2, N'y');\n\n"
    );
}

#[test]
fn test_update_layout() {
    let statements = parse(
        "update t set a = 1, b = b + 1 from t inner join u x on x.id = t.id where x.k is not null",
    )
    .unwrap();
    assert_eq!(
        to_sql(&statements),
        "UPDATE  t\nSET     a = 1\n        ,b = b + 1\nFROM    t\n        INNER JOIN u AS x\n\
         \x20         ON x.id = t.id\nWHERE   x.k IS NOT NULL\n\n"
    );
}

#[test]
fn test_if_else_layout() {
    let statements = parse("if 1 = 0 select 1 else begin delete t end").unwrap();
    assert_eq!(
        to_sql(&statements),
        "IF 1 = 0\n  SELECT  1\nELSE\nBEGIN\n  DELETE  t\nEND\n\n"
    );
}

#[test]
fn test_top_on_its_own_line() {
    let statements = parse("select top (10) a from t").unwrap();
    assert_eq!(
        to_sql(&statements),
        "SELECT  TOP (10)\n        a\nFROM    t\n\n"
    );
}

#[test]
fn test_constants() {
    let statements = parse("select 'it''s', N'x', 3e+4, 100.001, 6000000000").unwrap();
    let written = to_sql(&statements);
    assert!(written.contains("'it''s'"));
    assert!(written.contains("N'x'"));
    assert!(written.contains("3e4"));
    assert!(written.contains("100.001"));
    assert!(written.contains("6000000000"));
}

#[test]
fn test_nested_negation_is_not_a_comment() {
    let statements = parse("select - -1, 2 - -3").unwrap();
    let written = to_sql(&statements);
    assert!(!written.contains("--"), "{written}");
    assert_eq!(parse(&written).unwrap(), statements);
}

#[test]
fn test_terminators_are_kept() {
    let statements = parse("select 1; select 2 ;;").unwrap();
    assert_eq!(
        to_sql(&statements),
        "SELECT  1;\n\nSELECT  2;\n\n;\n\n"
    );
}

#[test]
fn test_writer_accumulates() {
    let statements = parse("delete a; delete b").unwrap();
    let mut writer = SqlWriter::new();
    writer.append(&statements[0]);
    assert_eq!(writer.as_str(), "DELETE  a;\n\n");
    writer.append(&statements[1]);
    assert_eq!(writer.into_string(), "DELETE  a;\n\nDELETE  b\n\n");
}

#[test]
fn test_write_into_sink() {
    let statements = parse("select 1").unwrap();
    let mut buffer = Vec::new();
    write_sql(&statements, &mut buffer).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), to_sql(&statements));
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_round_trip_select() {
    assert_round_trip(
        "select  top (100*10) *, NULL AS col1
         from    tb_test as t with (nolock)
                 inner join tb_test2 t2 on t1.id = t2.id
                 full outer join t4 on 333=4
                 left outer join t4 on x =x
                 right join t4 on y = z
         where   name like 'alistair%'
                 and name is not null
                 or age is null
                 or not age is null",
    );
}

#[test]
fn test_round_trip_columns() {
    assert_round_trip("select a = 1, 'b' = 2, 3 as 'c''d', t.*, d e, dbo.fn_(1, 'sda') f");
    assert_round_trip("select ......x. x  . x, x . x. x.  x");
    assert_round_trip("select coalesce(a, 0), nullif(b, 1), left(c, 2), right(d, 3), getdate()");
}

#[test]
fn test_round_trip_expressions() {
    assert_round_trip("select 1*-2+5 as b, -(2323) as c, ~a & b | c ^ d % 2, (a + b) * c / d");
    assert_round_trip("select 1.5e-2, .5, 99999999999999999999, null");
}

#[test]
fn test_round_trip_predicates() {
    assert_round_trip(
        "select 1 where a between 1 and 2 and b not between c and d + 1
         and e in (1, 2) and f not in (select g from h) and i not like 'x%'
         and j >= all (select k from l) and m < some (select 1) and n <> any (select 2)
         and exists (select 1 from o where o.p = q) and (r = 1 or s = 2)
         and (t + 1) * 2 = 4 and (select max(u) from v) > 3",
    );
}

#[test]
fn test_round_trip_sources() {
    assert_round_trip(
        "select 1 from (select 1 as x) s cross join u with (nolock, updlock)
         outer apply (select 2 as y) v cross apply w
         left join (select z from zz) q on q.z = s.x",
    );
}

#[test]
fn test_round_trip_dml() {
    assert_round_trip("delete top (5) from x from xxxx x (TABLOCKX) where 1 = 2");
    assert_round_trip("delete from x where 1 = 2;");
    assert_round_trip(
        "update top 5 dbo.xxx set val1 = 1, val2 = 3
         from dbo.xxx inner join yyy on val1 <= val5
         where val2 <> 4;",
    );
    assert_round_trip("insert top (3443) dbo.tb_test with(tablockx) values (1,2,'ss'),(3,4,'22')");
    assert_round_trip("insert into dbo.tb_test with(tablockx)(xx,yy,zz) values (1,2,'ss');");
    assert_round_trip("insert dbo.tb_test (aa,bb) select col1, col2 from tb_y;");
}

#[test]
fn test_round_trip_control_flow() {
    assert_round_trip(
        "if 1 = 0 select 1 else select 0
         if exists (select 1) begin update t set a = 1; ; end
         while @i < 10 begin ; end",
    );
}

#[test]
fn test_round_trip_nested_control_flow() {
    assert_round_trip(
        "while 1 = 1
           if a = 1
             if b = 2 select 1
             else begin delete t; delete u end
           else
             while c = 3 select 2;",
    );
}
