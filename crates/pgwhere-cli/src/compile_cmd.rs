use crate::cli::CompileArgs;
use anyhow::Context;
use pgwhere::{Condition, Connective, compile};

pub fn run(args: CompileArgs) -> anyhow::Result<()> {
    println!("{}", compile_json(&args.condition, args.op)?);
    Ok(())
}

/// Parse `--where` JSON into a condition.
pub fn parse_condition(raw: &str) -> anyhow::Result<Condition> {
    let value: serde_json::Value =
        serde_json::from_str(raw).with_context(|| format!("--where is not valid JSON: {raw}"))?;
    Ok(Condition::from_json(&value)?)
}

fn compile_json(raw: &str, op: Connective) -> anyhow::Result<String> {
    let cond = parse_condition(raw)?;
    Ok(compile(&cond, op)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_nested_groups() {
        let sql = compile_json(
            r#"{"a": 1, "b": 2, "or": {"c": 3, "and": {"d": 4, "e": 5}}}"#,
            Connective::And,
        )
        .unwrap();
        assert_eq!(sql, "a = '1' AND b = '2' AND (c = '3' OR (d = '4' AND e = '5'))");
    }

    #[test]
    fn top_level_or_allows_lists() {
        let sql = compile_json(r#"{"a": [1, 2]}"#, Connective::Or).unwrap();
        assert_eq!(sql, "a = '1' OR a = '2'");

        let err = compile_json(r#"{"a": [1, 2]}"#, Connective::And).unwrap_err();
        assert!(err.to_string().contains("only allowed under 'or'"));
    }

    #[test]
    fn json_string_is_raw_sql() {
        let sql = compile_json(r#""id > 10""#, Connective::And).unwrap();
        assert_eq!(sql, "id > 10");
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = parse_condition("{a: 1}").unwrap_err();
        assert!(format!("{err:#}").starts_with("--where is not valid JSON"));
    }
}
