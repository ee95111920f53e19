use super::*;
use crate::statement::Fields;
use crate::value::Value;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Records every statement and answers from canned responses.
#[derive(Default)]
struct RecordingExecutor {
    statements: Mutex<Vec<String>>,
    rows: Mutex<VecDeque<Vec<Record>>>,
    affected: u64,
    fail_with: Option<(String, String)>,
}

impl RecordingExecutor {
    fn with_rows(rows: Vec<Record>) -> Self {
        let exec = Self::default();
        exec.rows.lock().unwrap().push_back(rows);
        exec
    }

    fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    fn record(&self, sql: &str) -> QbResult<()> {
        self.statements.lock().unwrap().push(sql.to_string());
        match &self.fail_with {
            Some((code, message)) => Err(QbError::Statement {
                code: Some(code.clone()),
                message: message.clone(),
                sql: sql.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl Executor for RecordingExecutor {
    async fn fetch(&self, sql: &str) -> QbResult<Vec<Record>> {
        self.record(sql)?;
        Ok(self.rows.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn execute(&self, sql: &str) -> QbResult<u64> {
        self.record(sql)?;
        Ok(self.affected)
    }
}

fn user(id: &str, name: &str) -> Record {
    Record::new().with("id", Some(id)).with("name", Some(name))
}

#[tokio::test]
async fn select_builds_where_clause() {
    let qb = QueryBuilder::new(RecordingExecutor::with_rows(vec![user("1", "ann")]));
    let cond = Condition::from_json(&json!({"status": "active", "or": {"id": [1, 2]}})).unwrap();

    let rows = qb.select("users", cond, "*").await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(
        qb.executor().statements(),
        ["SELECT * FROM users WHERE status = 'active' AND (id = '1' OR id = '2')"]
    );
}

#[tokio::test]
async fn select_without_condition_omits_where() {
    let qb = QueryBuilder::new(RecordingExecutor::default());
    qb.select("users", Condition::new(), ["id", "name"]).await.unwrap();
    assert_eq!(qb.executor().statements(), ["SELECT id, name FROM users"]);
}

#[tokio::test]
async fn raw_condition_passes_through() {
    let qb = QueryBuilder::new(RecordingExecutor::default());
    qb.select("users", "created_at > now() - interval '1 day'", "*")
        .await
        .unwrap();
    assert_eq!(
        qb.executor().statements(),
        ["SELECT * FROM users WHERE created_at > now() - interval '1 day'"]
    );
}

#[tokio::test]
async fn one_returns_first_row_or_none() {
    let qb = QueryBuilder::new(RecordingExecutor::with_rows(vec![
        user("1", "ann"),
        user("2", "bob"),
    ]));
    let row = qb.one("users", Condition::new(), "*").await.unwrap().unwrap();
    assert_eq!(row.get("name"), Some("ann"));

    let none = qb.one("users", Condition::new().eq("id", 99), "*").await.unwrap();
    assert!(none.is_none());
}

#[tokio::test]
async fn insert_returns_id_column() {
    let exec = RecordingExecutor::with_rows(vec![Record::new().with("id", Some("17"))]);
    let qb = QueryBuilder::new(exec);

    let id = qb
        .insert("users", &Fields::new().set("name", "ann").set("age", 30))
        .await
        .unwrap();

    assert_eq!(id, 17);
    assert_eq!(
        qb.executor().statements(),
        ["INSERT INTO users (name, age) VALUES ('ann', '30') RETURNING id"]
    );
}

#[tokio::test]
async fn insert_uses_configured_id_column() {
    let exec = RecordingExecutor::with_rows(vec![Record::new().with("user_id", Some("5"))]);
    let qb = QueryBuilder::with_options(exec, BuilderOptions::new().id_column("user_id"));

    let id = qb.insert("users", &Fields::new().set("name", "x")).await.unwrap();

    assert_eq!(id, 5);
    assert!(qb.executor().statements()[0].ends_with("RETURNING user_id"));
}

#[tokio::test]
async fn insert_without_returned_row_is_decode_error() {
    let qb = QueryBuilder::new(RecordingExecutor::default());
    let err = qb.insert("users", &Fields::new()).await.unwrap_err();
    assert!(matches!(err, QbError::Decode { .. }));
}

#[tokio::test]
async fn insert_returning_handles_non_integer_keys() {
    let key = "6f1c2b8e-4d1a-4c55-9a39-1f0e7a3b2c10";
    let exec = RecordingExecutor::with_rows(vec![
        Record::new().with("uid", Some(key)).with("name", Some("ann")),
    ]);
    let qb = QueryBuilder::new(exec);

    let row = qb
        .insert_returning("users", &Fields::new().set("name", "ann"), ["uid", "name"])
        .await
        .unwrap();

    assert_eq!(row.get_as::<uuid::Uuid>("uid").unwrap().to_string(), key);
    assert_eq!(
        qb.executor().statements(),
        ["INSERT INTO users (name) VALUES ('ann') RETURNING uid, name"]
    );

    let users = qb.scoped("users");
    let err = users
        .insert_returning(&Fields::new().set("name", "bob"), "*")
        .await
        .unwrap_err();
    assert!(matches!(err, QbError::Decode { .. }));
}

#[tokio::test]
async fn insert_rejects_non_integer_id() {
    let exec = RecordingExecutor::with_rows(vec![Record::new().with("id", Some("abc"))]);
    let qb = QueryBuilder::new(exec);
    let err = qb.insert("users", &Fields::new()).await.unwrap_err();
    assert!(matches!(err, QbError::Decode { ref column, .. } if column == "id"));
}

#[tokio::test]
async fn update_and_delete_report_counts() {
    let exec = RecordingExecutor {
        affected: 3,
        ..Default::default()
    };
    let qb = QueryBuilder::new(exec);

    let n = qb
        .update_count(
            "users",
            Condition::new().eq("status", "gone"),
            Condition::new().eq("team", 4),
        )
        .await
        .unwrap();
    assert_eq!(n, 3);
    assert!(qb
        .update("users", Condition::new().eq("a", 1), Condition::raw("id = 1"))
        .await
        .unwrap());
    assert_eq!(qb.del_count("users", Condition::new().eq("team", 4)).await.unwrap(), 3);
    assert!(qb.del("users", Condition::new().eq("id", 1)).await.unwrap());

    assert_eq!(
        qb.executor().statements(),
        [
            "UPDATE users SET status = 'gone' WHERE team = '4'",
            "UPDATE users SET a = '1' WHERE id = 1",
            "DELETE FROM users WHERE team = '4'",
            "DELETE FROM users WHERE id = '1'",
        ]
    );
}

#[tokio::test]
async fn invalid_condition_never_reaches_executor() {
    let qb = QueryBuilder::new(RecordingExecutor::default());

    let err = qb
        .select("users", Condition::new().any_of("id", [1, 2]), "*")
        .await
        .unwrap_err();
    assert!(err.is_invalid_condition());

    let err = qb.del("users", Condition::new()).await.unwrap_err();
    assert!(err.is_invalid_condition());

    let err = qb
        .update("users", Condition::new().eq("a", 1), Condition::new().and(Condition::new()))
        .await
        .unwrap_err();
    assert!(err.is_invalid_condition());

    assert!(qb.executor().statements().is_empty());
}

#[tokio::test]
async fn statement_errors_propagate() {
    let exec = RecordingExecutor {
        fail_with: Some(("42P01".into(), "relation \"nope\" does not exist".into())),
        ..Default::default()
    };
    let qb = QueryBuilder::new(exec);

    let err = qb.select("nope", Condition::new(), "*").await.unwrap_err();
    match err {
        QbError::Statement { code, sql, .. } => {
            assert_eq!(code.as_deref(), Some("42P01"));
            assert_eq!(sql, "SELECT * FROM nope");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn scoped_view_curries_table() {
    let exec = RecordingExecutor::with_rows(vec![Record::new().with("id", Some("8"))]);
    let qb = QueryBuilder::new(exec);
    let users = qb.scoped("app.users");
    assert_eq!(users.table(), "app.users");

    let id = users.insert(&Fields::new().set("name", "z")).await.unwrap();
    users.select(Condition::new().eq("id", id), "*").await.unwrap();
    users
        .update(Condition::new().eq("name", "y"), Condition::new().eq("id", id))
        .await
        .unwrap();
    users.del(Condition::new().eq("id", id)).await.unwrap();

    assert_eq!(
        qb.executor().statements(),
        [
            "INSERT INTO app.users (name) VALUES ('z') RETURNING id",
            "SELECT * FROM app.users WHERE id = '8'",
            "UPDATE app.users SET name = 'y' WHERE id = '8'",
            "DELETE FROM app.users WHERE id = '8'",
        ]
    );
}

#[tokio::test]
async fn select_as_maps_rows() {
    struct User {
        id: i64,
        name: String,
    }

    impl FromRecord for User {
        fn from_record(r: &Record) -> QbResult<Self> {
            Ok(Self {
                id: r.get_as("id")?,
                name: r.get_as("name")?,
            })
        }
    }

    let qb = QueryBuilder::new(RecordingExecutor::with_rows(vec![
        user("1", "ann"),
        user("2", "bob"),
    ]));
    let users: Vec<User> = qb.select_as("users", Condition::new(), "*").await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].id, 2);
    assert_eq!(users[1].name, "bob");

    let none: Option<User> = qb.one_as("users", Condition::new(), "*").await.unwrap();
    assert!(none.is_none());
}

#[tokio::test]
async fn builder_over_borrowed_executor() {
    let exec = RecordingExecutor::default();
    let qb = QueryBuilder::new(&exec);
    qb.select("t", Condition::new().eq("flag", Value::Bool(true)), "*")
        .await
        .unwrap();
    assert_eq!(exec.statements(), ["SELECT * FROM t WHERE flag = 'true'"]);
}
