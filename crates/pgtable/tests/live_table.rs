//! Round trips against a real database. Skipped unless `DATABASE_URL` is set.

use pgtable::{
    ConnectConfig, Fetched, Got, Table, TableConfig, TableError, UpsertOutcome, UpsertStrategy,
    Value, columns, connect, create_table, drop_table,
};
use std::time::{SystemTime, UNIX_EPOCH};

async fn try_connect() -> Option<tokio_postgres::Client> {
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let client = connect(&ConnectConfig::from_url(database_url))
        .await
        .expect("Failed to connect to DATABASE_URL with NoTls");
    Some(client)
}

fn unique_name(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    format!("{prefix}_{}_{nanos}", std::process::id())
}

#[tokio::test]
async fn key_value_round_trip() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let name = unique_name("pgtable_kv");
    assert!(create_table(&client, &name, None).await.unwrap());
    assert!(!create_table(&client, &name, None).await.unwrap());

    let kv = Table::new(name.as_str());
    let k1 = kv.clone().filter(columns! { "key" => "k1" });

    let first = k1.set(&client, columns! { "value" => "v1" }).await.unwrap();
    let second = k1.set(&client, columns! { "value" => "v2" }).await.unwrap();
    assert_eq!(first, UpsertOutcome::Inserted(1));
    assert_eq!(second, UpsertOutcome::Updated(1));

    let got = k1.get(&client, &["value"]).await.unwrap();
    assert_eq!(got, Some(Got::Value(Value::from("v2"))));
    assert!(kv.has(&client, columns! { "key" => "k1" }).await.unwrap());

    // Quotes are fine when bound.
    kv.clone()
        .filter(columns! { "key" => "it's" })
        .set(&client, columns! { "value" => "o'clock" })
        .await
        .unwrap();
    let all = kv.clone().filter(columns! {}).fetch(&client, &["key"]).await.unwrap();
    assert_eq!(all.len(), 2);

    assert_eq!(k1.remove(&client).await.unwrap(), 1);
    assert!(!kv.has(&client, columns! { "key" => "k1" }).await.unwrap());
    assert_eq!(k1.get(&client, &["value"]).await.unwrap(), None);

    assert!(drop_table(&client, &name).await.unwrap());
    assert!(!drop_table(&client, &name).await.unwrap());
}

#[tokio::test]
async fn literal_mode_round_trip() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let name = unique_name("pgtable_lit");
    create_table(&client, &name, None).await.unwrap();

    let kv = Table::new(name.as_str()).with_config(TableConfig::new().literal());
    let row = kv.clone().filter(columns! { "key" => "hi", "value" => "there" });
    assert!(row.set(&client, columns! {}).await.unwrap().is_inserted());
    assert!(row.set(&client, columns! {}).await.unwrap().is_updated());

    let err = kv
        .filter(columns! { "key" => "it's" })
        .remove(&client)
        .await
        .unwrap_err();
    assert!(matches!(err, TableError::MalformedLiteral { .. }));

    drop_table(&client, &name).await.unwrap();
}

#[tokio::test]
async fn on_conflict_upsert_and_unique_violation() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let name = unique_name("pgtable_oc");
    create_table(&client, &name, None).await.unwrap();

    let merged = Table::new(name.as_str())
        .with_config(TableConfig::new().upsert(UpsertStrategy::OnConflict))
        .filter(columns! { "key" => "k1" });
    merged.set(&client, columns! { "value" => "a" }).await.unwrap();
    merged.set(&client, columns! { "value" => "b" }).await.unwrap();
    let got = merged.get(&client, &["value"]).await.unwrap();
    assert_eq!(got.and_then(Got::into_value), Some(Value::from("b")));

    // Filtering on a non-unique column lets the probe miss while the key collides.
    let err = Table::new(name.as_str())
        .filter(columns! { "key" => "k1", "value" => "zzz" })
        .set(&client, columns! {})
        .await
        .unwrap_err();
    assert!(err.is_unique_violation());

    drop_table(&client, &name).await.unwrap();
}

#[tokio::test]
async fn join_round_trip() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let msgs = unique_name("pgtable_msgs");
    let links = unique_name("pgtable_msg_users");
    create_table(&client, &msgs, Some("msg_id TEXT PRIMARY KEY, value TEXT, read BOOLEAN"))
        .await
        .unwrap();
    create_table(&client, &links, Some("msg_id TEXT, user_id TEXT"))
        .await
        .unwrap();

    for (id, body, read) in [("m1", "hello", false), ("m2", "bye", true)] {
        Table::new(msgs.as_str())
            .filter(columns! { "msg_id" => id })
            .set(&client, columns! { "value" => body, "read" => read })
            .await
            .unwrap();
        Table::new(links.as_str())
            .filter(columns! { "msg_id" => id, "user_id" => "u1" })
            .set(&client, columns! {})
            .await
            .unwrap();
    }

    let inbox = Table::new(links.as_str())
        .filter(columns! { "user_id" => "u1" })
        .join(msgs.as_str(), "msg_id");

    let all = inbox.fetch(&client, &["value"]).await.unwrap();
    let mut bodies = all.into_column().unwrap();
    bodies.sort_by(|a, b| a.as_str().cmp(&b.as_str()));
    assert_eq!(bodies, vec![Value::from("bye"), Value::from("hello")]);

    let unread = inbox
        .clone()
        .and_raw(format!("{msgs}.read = false"))
        .fetch(&client, &["msg_id", "value"])
        .await
        .unwrap();
    match unread {
        Fetched::Rows(rows) => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].get(1), Some(&Value::from("hello")));
        }
        Fetched::Column(_) => panic!("expected rows"),
    }

    let err = inbox.remove(&client).await.unwrap_err();
    assert!(matches!(err, TableError::JoinedMutationNotAllowed { .. }));

    drop_table(&client, &links).await.unwrap();
    drop_table(&client, &msgs).await.unwrap();
}

#[tokio::test]
async fn scalars_coerce_into_text_columns_when_bound() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let name = unique_name("pgtable_coerce");
    create_table(&client, &name, None).await.unwrap();

    let person = Table::new(name.as_str()).filter(columns! { "key" => 8823 });
    person.set(&client, columns! { "value" => 1.5 }).await.unwrap();
    person.set(&client, columns! { "value" => true }).await.unwrap();
    assert!(
        Table::new(name.as_str())
            .has(&client, columns! { "key" => "8823" })
            .await
            .unwrap()
    );
    let got = person.get(&client, &["value"]).await.unwrap();
    assert_eq!(got, Some(Got::Value(Value::from("true"))));

    let unowned = Table::new(name.as_str()).filter(columns! { "key" => "k2", "value" => None::<&str> });
    assert!(unowned.set(&client, columns! {}).await.unwrap().is_inserted());
    assert!(unowned.set(&client, columns! {}).await.unwrap().is_updated());

    drop_table(&client, &name).await.unwrap();
}
