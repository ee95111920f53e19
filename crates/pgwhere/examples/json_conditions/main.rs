//! Compile conditions given in the JSON mapping form, without a database.
//!
//! Run with:
//!   cargo run --example json_conditions -p pgwhere

use pgwhere::{Columns, Condition, Fields, QbResult, compile_set, select_sql, update_sql};
use serde_json::json;

fn main() -> QbResult<()> {
    let filters = [
        json!({"a": 1, "b": 2, "or": {"c": 3, "and": {"d": 4, "e": 5}}}),
        json!({"status": "active", "or": {"role": ["admin", "owner"]}}),
        json!({"deleted_at": null, "name": "O'Brien"}),
        json!({"and": {}, "or": {"and": {}}}),
        json!("created_at > now() - interval '1 day'"),
    ];

    for filter in &filters {
        let cond = Condition::from_json(filter)?;
        println!("{filter}\n  => {}\n", select_sql("users", &Columns::All, &cond)?);
    }

    // A list outside an "or" group is rejected.
    match Condition::from_json(&json!({"id": [1, 2]}))?.to_sql() {
        Ok(sql) => println!("unexpected: {sql}"),
        Err(e) => println!("rejected: {e}\n"),
    }

    let values = Fields::from_json(&json!({"status": "disabled", "note": null}))?.to_condition();
    println!("SET {}", compile_set(&values)?);
    println!(
        "{}",
        update_sql("users", &values, &Condition::new().eq("id", 7))?
    );
    Ok(())
}
