use sqlstitch::{
    Dialect, JoinKind, OfflineAdapter, SortDirection, Statement, StatementKind, StitchConfig,
    Value,
};
use std::sync::Arc;

fn statement(dialect: Dialect) -> Statement {
    Statement::with_adapter(Arc::new(OfflineAdapter::new(dialect)))
}

fn configure(stmt: &mut Statement, kind: StatementKind) {
    stmt.set_type(kind)
        .add_table("shop.orders", Some("o"))
        .add_join(JoinKind::Join, "customers", Some("c"), Some("c.id = o.customer_id"))
        .add_join(JoinKind::Left, "addresses", Some("a"), Some("a.id = o.address_id"))
        .add_join(JoinKind::Right, "stores", Some("s"), Some("s.id = o.store_id"))
        .add_join(JoinKind::Inner, "items", Some("i"), Some("i.order_id = o.id"))
        .add_join(JoinKind::Outer, "coupons", Some("cp"), Some("cp.id = o.coupon_id"))
        .add_column("o.total", Some("amount"), 99.5, None)
        .add_column("c.email", Some("email"), "a@example.com", None)
        .add_column("o.status", None, "open", None)
        .add_where_with_params("o.created_at > :since", [("since", "2024-01-01")])
        .add_sort("o.created_at", Some(SortDirection::Desc))
        .set_page_number(2)
        .set_page_size(50);
}

#[test]
fn select_end_to_end() {
    let mut stmt = statement(Dialect::MySql);
    configure(&mut stmt, StatementKind::Select);

    assert_eq!(
        stmt.generate_query(),
        "SELECT `o`.`total` AS amount, `c`.`email` AS email, `o`.`status` \
         FROM shop.orders o, customers c ON c.id = o.customer_id, \
         addresses a ON a.id = o.address_id, stores s ON s.id = o.store_id, \
         items i ON i.order_id = o.id, coupons cp ON cp.id = o.coupon_id \
         WHERE o.created_at > :since ORDER BY o.created_at DESC LIMIT 50, 50"
    );

    let params = stmt.get_parameters();
    assert_eq!(params.get(":amount"), Some(&Value::Float(99.5)));
    assert_eq!(params.get(":ostatus"), Some(&Value::Text("open".into())));
    assert_eq!(params.get(":since"), Some(&Value::Text("2024-01-01".into())));
}

#[test]
fn postgres_dialect_end_to_end() {
    let mut stmt = statement(Dialect::Postgres);
    configure(&mut stmt, StatementKind::Select);
    let sql = stmt.generate_query();
    assert!(sql.starts_with(r#"SELECT "o"."total" AS amount, "c"."email" AS email"#));
    assert!(sql.ends_with("ORDER BY o.created_at DESC LIMIT 50 OFFSET 50"));
}

#[test]
fn insert_uses_base_table_and_assignments() {
    let mut stmt = statement(Dialect::MySql);
    configure(&mut stmt, StatementKind::Insert);
    assert_eq!(
        stmt.generate_query(),
        "INSERT `o`.`total` = :amount, `c`.`email` = :email, `o`.`status` = :ostatus \
         INTO shop.orders"
    );
}

#[test]
fn update_with_raw_template() {
    let mut stmt = statement(Dialect::MySql);
    configure(&mut stmt, StatementKind::Update);
    stmt.set_template("UPDATE {{tables}} SET {{columns}} {{where}}");
    assert_eq!(
        stmt.generate_query(),
        "UPDATE shop.orders SET `o`.`total` = :amount, `c`.`email` = :email, \
         `o`.`status` = :ostatus WHERE o.created_at > :since"
    );
}

#[test]
fn delete_default_template_keeps_singular_table_token() {
    let mut stmt = statement(Dialect::MySql);
    configure(&mut stmt, StatementKind::Delete);
    assert_eq!(
        stmt.generate_query(),
        "DELETE FROM {{table}} WHERE o.created_at > :since"
    );
}

#[test]
fn partial_template_only_fills_present_tokens() {
    let mut stmt = statement(Dialect::MySql);
    configure(&mut stmt, StatementKind::Select);
    stmt.add_where("o.total > 10");
    stmt.set_template(
        "SELECT COUNT(*) FROM orders o WHERE o.deleted_at IS NULL {{where|AND}}",
    );
    assert_eq!(
        stmt.generate_query(),
        "SELECT COUNT(*) FROM orders o WHERE o.deleted_at IS NULL \
         AND (o.created_at > :since) AND (o.total > 10)"
    );
}

#[test]
fn config_file_drives_statement_defaults() {
    let config = StitchConfig::from_toml_str(
        r#"
        dialect = "postgres"
        default_page_size = 10
        log_sql = false
        "#,
    )
    .unwrap();
    let mut stmt = Statement::with_config(&config);
    stmt.set_type(StatementKind::Select)
        .add_table("users", None)
        .add_column("id", None, Value::Null, None)
        .set_page_number(3);
    assert_eq!(
        stmt.generate_query(),
        r#"SELECT "id" FROM users   LIMIT 10 OFFSET 20"#
    );
}

#[test]
fn statement_kind_codes_are_stable() {
    let kinds: Vec<StatementKind> = serde_json::from_str("[1, 2, 3, 4]").unwrap();
    assert_eq!(
        kinds,
        vec![
            StatementKind::Select,
            StatementKind::Insert,
            StatementKind::Update,
            StatementKind::Delete
        ]
    );
}
