// tests/transform_tests.rs

#[cfg(test)]
mod tests {
    use tsqlc::ast::*;
    use tsqlc::parser::parse;
    use tsqlc::transform::{qualify_tables, SchemaQualifier};
    use tsqlc::visitor::walk_mut;
    use tsqlc::writer::to_sql;

    fn qualify(source: &str, schema: &str) -> (usize, Vec<Statement>) {
        let mut statements = parse(source).unwrap();
        let count = qualify_tables(&mut statements, schema);
        (count, statements)
    }

    fn table_names(statement: &Statement) -> Vec<String> {
        let from = match statement {
            Statement::Select(select) => &select.from,
            Statement::Update(update) => &update.from,
            Statement::Delete(delete) => &delete.from,
            Statement::SelectInsert(insert) => &insert.select.from,
            other => panic!("statement has no FROM list: {:?}", other),
        };
        from.iter()
            .filter_map(|source| match source {
                FromSource::Reference(from) => Some(from.name.identifier()),
                FromSource::Subquery(_) => None,
            })
            .collect()
    }

    // ========================================================================
    // FROM lists
    // ========================================================================

    #[test]
    fn test_one_part_names_get_the_schema() {
        let (count, statements) =
            qualify("select * from orders o join dbo.items i on i.order_id = o.id", "dbo");
        assert_eq!(count, 1);
        assert_eq!(table_names(&statements[0]), vec!["dbo.orders", "dbo.items"]);
    }

    #[test]
    fn test_multi_part_and_empty_part_names_are_kept() {
        let (count, statements) = qualify("select 1 from db..orders cross join .items", "dbo");
        assert_eq!(count, 0);
        assert_eq!(table_names(&statements[0]), vec!["db..orders", ".items"]);
    }

    #[test]
    fn test_subqueries_are_reached() {
        let (count, statements) = qualify(
            "select 1 from (select id from orders) o
             where exists (select 1 from items where items.id = o.id)
               and o.id in (select id from refunds)",
            "sales",
        );
        assert_eq!(count, 3);
        let written = to_sql(&statements);
        assert!(written.contains("sales.orders"));
        assert!(written.contains("sales.items"));
        assert!(written.contains("sales.refunds"));
        // column references are not table names
        assert!(written.contains("items.id = o.id"));
    }

    #[test]
    fn test_variables_and_temp_tables_are_skipped() {
        let (count, _) = qualify("select 1 from @t join #tmp on 1 = 1 join ##global on 1 = 1", "dbo");
        assert_eq!(count, 0);
    }

    // ========================================================================
    // DML targets
    // ========================================================================

    #[test]
    fn test_insert_targets() {
        let (count, statements) = qualify(
            "insert orders values (1); insert into archive (id) select id from orders",
            "dbo",
        );
        assert_eq!(count, 3);
        let Statement::ValuesInsert(values) = &statements[0] else {
            panic!("expected INSERT ... VALUES");
        };
        assert_eq!(values.target.identifier(), "dbo.orders");
        // column lists are not tables
        let Statement::SelectInsert(select) = &statements[1] else {
            panic!("expected INSERT ... SELECT");
        };
        assert_eq!(select.target.identifier(), "dbo.archive");
        assert_eq!(select.columns[0].identifier(), "id");
        assert_eq!(table_names(&statements[1]), vec!["dbo.orders"]);
    }

    #[test]
    fn test_plain_update_and_delete_targets() {
        let (count, statements) =
            qualify("update orders set total = 0; delete from orders where id = 1", "dbo");
        assert_eq!(count, 2);
        assert!(matches!(&statements[0], Statement::Update(u) if u.target.identifier() == "dbo.orders"));
        assert!(matches!(&statements[1], Statement::Delete(d) if d.target.identifier() == "dbo.orders"));
    }

    #[test]
    fn test_targets_named_in_from_list_resolve_through_it() {
        let (count, statements) = qualify(
            "update Orders set total = 0 from orders join items on items.id = orders.id;
             delete s from (select 1 as x) s",
            "dbo",
        );
        assert_eq!(count, 2);
        let Statement::Update(update) = &statements[0] else {
            panic!("expected UPDATE");
        };
        assert_eq!(update.target.identifier(), "Orders");
        assert_eq!(table_names(&statements[0]), vec!["dbo.orders", "dbo.items"]);
        assert!(matches!(&statements[1], Statement::Delete(d) if d.target.identifier() == "s"));
    }

    #[test]
    fn test_set_targets_are_columns() {
        let (count, statements) = qualify("update t set total = 0", "dbo");
        assert_eq!(count, 1);
        match &statements[0] {
            Statement::Update(update) => match &update.set[0] {
                Column::Set { target, .. } => assert_eq!(target.identifier(), "total"),
                other => panic!("expected SET column, got {:?}", other),
            },
            other => panic!("expected UPDATE, got {:?}", other),
        }
    }

    // ========================================================================
    // Control flow and repeat runs
    // ========================================================================

    #[test]
    fn test_nested_statements() {
        let (count, statements) = qualify(
            "if exists (select 1 from flags) begin delete queue end else while 1 = 1 update jobs set n = 1",
            "ops",
        );
        assert_eq!(count, 3);
        let written = to_sql(&statements);
        assert!(written.contains("ops.flags"));
        assert!(written.contains("ops.queue"));
        assert!(written.contains("ops.jobs"));
    }

    #[test]
    fn test_second_pass_is_a_no_op() {
        let mut statements = parse("select 1 from a join b on a.id = b.id").unwrap();
        assert_eq!(qualify_tables(&mut statements, "dbo"), 2);
        let once = statements.clone();
        assert_eq!(qualify_tables(&mut statements, "dbo"), 0);
        assert_eq!(statements, once);
    }

    #[test]
    fn test_qualifier_reports_its_progress() {
        let mut statements = parse("select 1 from a; select 2 from b").unwrap();
        let qualifier = walk_mut(&mut statements[..1], SchemaQualifier::new("hr"));
        assert_eq!(qualifier.schema(), "hr");
        assert_eq!(qualifier.qualified(), 1);
        assert_eq!(table_names(&statements[1]), vec!["b"]);
    }
}
