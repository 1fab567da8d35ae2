use super::*;
use crate::columns;
use crate::columns::ColumnValueSet;
use crate::value::Value;

fn frags(set: ColumnValueSet) -> Fragments {
    Fragments::build(&set)
}

#[test]
fn probe_uses_predicate_and_limit() {
    let stmt = probe("kv", &frags(columns! { "key" => "k1" })).unwrap();
    assert_eq!(stmt.kind(), StatementKind::Probe);
    assert_eq!(stmt.to_sql(), "SELECT true FROM kv WHERE key = $1 LIMIT 1");
    assert_eq!(
        stmt.to_literal_sql().unwrap(),
        "SELECT true FROM kv WHERE key = 'k1' LIMIT 1"
    );
}

#[test]
fn probe_refuses_empty_predicate() {
    let err = probe("kv", &Fragments::default()).unwrap_err();
    assert!(matches!(err, TableError::EmptyFilter { .. }));
}

#[test]
fn select_star_without_filter() {
    let stmt = select("kv", &FilterContext::default(), None, None, &[], false);
    assert_eq!(stmt.to_sql(), "SELECT * FROM kv");
}

#[test]
fn select_columns_with_filter_and_limit() {
    let filter = FilterContext::new(columns! { "key" => "k1" });
    let stmt = select("kv", &filter, None, None, &["value"], true);
    assert_eq!(stmt.to_sql(), "SELECT value FROM kv WHERE key = $1 LIMIT 1");
    assert_eq!(
        stmt.to_literal_sql().unwrap(),
        "SELECT value FROM kv WHERE key = 'k1' LIMIT 1"
    );
}

#[test]
fn select_without_join_ignores_extra_predicate() {
    let filter = FilterContext::new(columns! { "key" => "k1" });
    let stmt = select("kv", &filter, None, Some("value <> ''"), &["a", "b"], false);
    assert_eq!(stmt.to_sql(), "SELECT a, b FROM kv WHERE key = $1");
}

#[test]
fn select_with_join() {
    let filter = FilterContext::new(columns! { "user_id" => "u1" });
    let join = JoinSpec::new("msgs", "msg_id");
    let stmt = select("msg_users", &filter, Some(&join), None, &["value"], false);
    assert_eq!(
        stmt.to_literal_sql().unwrap(),
        "SELECT msgs.value FROM msgs, msg_users \
         WHERE msgs.msg_id = msg_users.msg_id AND user_id = 'u1'"
    );
    assert_eq!(stmt.params(), vec![&Value::from("u1")]);
}

#[test]
fn select_with_join_star_extra_and_limit() {
    let filter = FilterContext::new(columns! { "user_id" => "u1" });
    let join = JoinSpec::new("msgs", "msg_id");
    let stmt = select(
        "msg_users",
        &filter,
        Some(&join),
        Some("msgs.read = false"),
        &[],
        true,
    );
    assert_eq!(
        stmt.to_sql(),
        "SELECT msgs.* FROM msgs, msg_users \
         WHERE msgs.msg_id = msg_users.msg_id AND user_id = $1 AND msgs.read = false LIMIT 1"
    );
}

#[test]
fn select_with_join_and_empty_filter_skips_predicate() {
    let join = JoinSpec::new("msgs", "msg_id");
    let stmt = select("msg_users", &FilterContext::default(), Some(&join), None, &["a", "b"], false);
    assert_eq!(
        stmt.to_sql(),
        "SELECT msgs.a, msgs.b FROM msgs, msg_users WHERE msgs.msg_id = msg_users.msg_id"
    );
}

#[test]
fn insert_filter_only() {
    let stmt = insert("kv", &frags(columns! { "key" => "hi", "value" => "there" }), &Fragments::default()).unwrap();
    assert_eq!(stmt.to_sql(), "INSERT INTO kv (key, value) VALUES ($1, $2)");
    assert_eq!(
        stmt.to_literal_sql().unwrap(),
        "INSERT INTO kv (key, value) VALUES ('hi', 'there')"
    );
}

#[test]
fn insert_appends_mutation_after_filter() {
    let stmt = insert(
        "t",
        &frags(columns! { "key" => "k1" }),
        &frags(columns! { "value" => "v1" }),
    )
    .unwrap();
    assert_eq!(
        stmt.to_literal_sql().unwrap(),
        "INSERT INTO t (key, value) VALUES ('k1', 'v1')"
    );
    assert_eq!(stmt.to_sql(), "INSERT INTO t (key, value) VALUES ($1, $2)");
}

#[test]
fn update_uses_mutation_pairs() {
    let stmt = update(
        "t",
        &frags(columns! { "key" => "k1" }),
        &frags(columns! { "value" => "v2" }),
    )
    .unwrap();
    assert_eq!(stmt.to_sql(), "UPDATE t SET value = $1 WHERE key = $2");
    assert_eq!(
        stmt.to_literal_sql().unwrap(),
        "UPDATE t SET value = 'v2' WHERE key = 'k1'"
    );
    assert_eq!(stmt.params(), vec![&Value::from("v2"), &Value::from("k1")]);
}

#[test]
fn update_without_mutation_reapplies_filter_pairs() {
    let stmt = update("t", &frags(columns! { "key" => "k1", "value" => "v1" }), &Fragments::default()).unwrap();
    assert_eq!(
        stmt.to_literal_sql().unwrap(),
        "UPDATE t SET key = 'k1', value = 'v1' WHERE key = 'k1' AND value = 'v1'"
    );
}

#[test]
fn delete_uses_predicate() {
    let stmt = delete("t", &frags(columns! { "key" => "k1" })).unwrap();
    assert_eq!(stmt.kind(), StatementKind::Delete);
    assert_eq!(stmt.to_literal_sql().unwrap(), "DELETE FROM t WHERE key = 'k1'");
}

#[test]
fn mutations_refuse_empty_filter() {
    let empty = Fragments::default();
    let m = frags(columns! { "value" => "v" });
    assert!(matches!(delete("t", &empty), Err(TableError::EmptyFilter { .. })));
    assert!(matches!(update("t", &empty, &m), Err(TableError::EmptyFilter { .. })));
    assert!(matches!(insert("t", &empty, &m), Err(TableError::EmptyFilter { .. })));
}

#[test]
fn on_conflict_updates_mutation_columns() {
    let stmt = upsert_on_conflict(
        "t",
        &frags(columns! { "key" => "k1" }),
        &frags(columns! { "value" => "v1", "hits" => 1 }),
        &["value", "hits"],
    )
    .unwrap();
    assert_eq!(stmt.kind(), StatementKind::Upsert);
    assert_eq!(
        stmt.to_sql(),
        "INSERT INTO t (key, value, hits) VALUES ($1, $2, $3) \
         ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, hits = EXCLUDED.hits"
    );
}

#[test]
fn on_conflict_without_mutation_does_nothing() {
    let stmt = upsert_on_conflict("t", &frags(columns! { "key" => "k1" }), &Fragments::default(), &[]).unwrap();
    assert_eq!(
        stmt.to_literal_sql().unwrap(),
        "INSERT INTO t (key) VALUES ('k1') ON CONFLICT (key) DO NOTHING"
    );
}
