use crate::cli::{ConnArgs, DeleteArgs, InsertArgs, QueryCommand, SelectArgs, UpdateArgs};
use crate::compile_cmd::parse_condition;
use crate::config;
use anyhow::Context;
use pgwhere::{Columns, Condition, Executor, Fields, QueryBuilder, Record};

pub async fn run(cmd: QueryCommand) -> anyhow::Result<()> {
    let conn = match &cmd {
        QueryCommand::Select(a) | QueryCommand::One(a) => &a.conn,
        QueryCommand::Insert(a) => &a.conn,
        QueryCommand::Update(a) => &a.conn,
        QueryCommand::Delete(a) => &a.conn,
    };
    let qb = connect(conn).await?;

    match cmd {
        QueryCommand::Select(args) => {
            for row in select(&qb, &args).await? {
                println!("{}", row_json(&row)?);
            }
        }
        QueryCommand::One(args) => match one(&qb, &args).await? {
            Some(row) => println!("{}", row_json(&row)?),
            None => println!("null"),
        },
        QueryCommand::Insert(args) => println!("{}", insert(&qb, &args).await?),
        QueryCommand::Update(args) => println!("{}", update(&qb, &args).await?),
        QueryCommand::Delete(args) => println!("{}", delete(&qb, &args).await?),
    }
    Ok(())
}

async fn connect(conn: &ConnArgs) -> anyhow::Result<QueryBuilder<tokio_postgres::Client>> {
    let settings = config::resolve(conn)?;
    let client = QueryBuilder::connect(&settings.connect)
        .await
        .with_context(|| {
            format!(
                "failed to connect to {}:{} as {}",
                settings.connect.host, settings.connect.port, settings.connect.user
            )
        })?;
    Ok(QueryBuilder::with_options(client.into_executor(), settings.builder))
}

fn optional_condition(raw: Option<&str>) -> anyhow::Result<Condition> {
    raw.map(parse_condition).transpose().map(Option::unwrap_or_default)
}

fn parse_fields(raw: &str, flag: &str) -> anyhow::Result<Fields> {
    let value: serde_json::Value =
        serde_json::from_str(raw).with_context(|| format!("{flag} is not valid JSON: {raw}"))?;
    Fields::from_json(&value).with_context(|| format!("invalid {flag}"))
}

fn columns(list: &Option<Vec<String>>) -> Columns {
    match list {
        Some(names) => Columns::List(names.clone()),
        None => Columns::All,
    }
}

fn row_json(row: &Record) -> anyhow::Result<String> {
    Ok(serde_json::to_string(row)?)
}

async fn select<E: Executor>(qb: &QueryBuilder<E>, args: &SelectArgs) -> anyhow::Result<Vec<Record>> {
    let cond = optional_condition(args.condition.as_deref())?;
    Ok(qb.select(&args.table, cond, columns(&args.columns)).await?)
}

async fn one<E: Executor>(qb: &QueryBuilder<E>, args: &SelectArgs) -> anyhow::Result<Option<Record>> {
    let cond = optional_condition(args.condition.as_deref())?;
    Ok(qb.one(&args.table, cond, columns(&args.columns)).await?)
}

async fn insert<E: Executor>(qb: &QueryBuilder<E>, args: &InsertArgs) -> anyhow::Result<i64> {
    let fields = parse_fields(&args.fields, "--fields")?;
    Ok(qb.insert(&args.table, &fields).await?)
}

async fn update<E: Executor>(qb: &QueryBuilder<E>, args: &UpdateArgs) -> anyhow::Result<u64> {
    let values = parse_fields(&args.set, "--set")?.to_condition();
    let cond = parse_condition(&args.condition)?;
    Ok(qb.update_count(&args.table, values, cond).await?)
}

async fn delete<E: Executor>(qb: &QueryBuilder<E>, args: &DeleteArgs) -> anyhow::Result<u64> {
    let cond = parse_condition(&args.condition)?;
    Ok(qb.del_count(&args.table, cond).await?)
}
