use pgwhere::Connective;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Compile,
    Select,
    One,
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Compile(CompileArgs),
    Query(QueryCommand),
}

#[derive(Debug, Clone)]
pub struct CompileArgs {
    pub condition: String,
    pub op: Connective,
}

/// Where to find connection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnArgs {
    /// Explicit `--config`; `None` means the optional default `pgwhere.toml`.
    pub config: Option<PathBuf>,
    pub database_url: Option<String>,
}

#[derive(Debug, Clone)]
pub enum QueryCommand {
    Select(SelectArgs),
    One(SelectArgs),
    Insert(InsertArgs),
    Update(UpdateArgs),
    Delete(DeleteArgs),
}

#[derive(Debug, Clone)]
pub struct SelectArgs {
    pub conn: ConnArgs,
    pub table: String,
    pub condition: Option<String>,
    pub columns: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct InsertArgs {
    pub conn: ConnArgs,
    pub table: String,
    pub fields: String,
}

#[derive(Debug, Clone)]
pub struct UpdateArgs {
    pub conn: ConnArgs,
    pub table: String,
    pub set: String,
    pub condition: String,
}

#[derive(Debug, Clone)]
pub struct DeleteArgs {
    pub conn: ConnArgs,
    pub table: String,
    pub condition: String,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    let topic = match first.as_str() {
        "-h" | "--help" | "help" => return Ok(Command::Help(HelpTopic::Root)),
        "compile" => HelpTopic::Compile,
        "select" => HelpTopic::Select,
        "one" => HelpTopic::One,
        "insert" => HelpTopic::Insert,
        "update" => HelpTopic::Update,
        "delete" => HelpTopic::Delete,
        _ => anyhow::bail!("unknown command: {first}"),
    };

    let Some(opts) = parse_options(topic, it.map(|s| s.as_str()))? else {
        return Ok(Command::Help(topic));
    };
    build_command(topic, opts)
}

/// Flags accepted by each command, besides `-h`/`--help`.
fn allowed_flags(topic: HelpTopic) -> &'static [&'static str] {
    match topic {
        HelpTopic::Root => &[],
        HelpTopic::Compile => &["--where", "--op"],
        HelpTopic::Select | HelpTopic::One => &[
            "--config",
            "--database-url",
            "--table",
            "--where",
            "--columns",
        ],
        HelpTopic::Insert => &["--config", "--database-url", "--table", "--fields"],
        HelpTopic::Update => &["--config", "--database-url", "--table", "--set", "--where"],
        HelpTopic::Delete => &["--config", "--database-url", "--table", "--where"],
    }
}

#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    database_url: Option<String>,
    table: Option<String>,
    condition: Option<String>,
    columns: Option<Vec<String>>,
    fields: Option<String>,
    set: Option<String>,
    op: Option<String>,
}

/// `Ok(None)` when help was requested.
fn parse_options<'a>(
    topic: HelpTopic,
    mut it: impl Iterator<Item = &'a str>,
) -> anyhow::Result<Option<Options>> {
    let allowed = allowed_flags(topic);
    let mut opts = Options::default();

    while let Some(token) = it.next() {
        if matches!(token, "-h" | "--help") {
            return Ok(None);
        }

        let (name, inline) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (token, None),
        };
        if !allowed.contains(&name) {
            anyhow::bail!("unknown argument: {token}");
        }

        let value = match inline {
            Some(v) => v.to_string(),
            None => {
                let Some(v) = it.next() else {
                    anyhow::bail!("{name} requires a value");
                };
                v.to_string()
            }
        };

        match name {
            "--config" => opts.config = Some(PathBuf::from(value)),
            "--database-url" => opts.database_url = Some(value),
            "--table" => opts.table = Some(value),
            "--where" => opts.condition = Some(value),
            "--columns" => {
                let parsed = split_csv(&value);
                if parsed.is_empty() {
                    anyhow::bail!("--columns must not be empty");
                }
                opts.columns = Some(parsed);
            }
            "--fields" => opts.fields = Some(value),
            "--set" => opts.set = Some(value),
            "--op" => opts.op = Some(value),
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Some(opts))
}

fn build_command(topic: HelpTopic, opts: Options) -> anyhow::Result<Command> {
    let conn = ConnArgs {
        config: opts.config,
        database_url: opts.database_url,
    };

    let cmd = match topic {
        HelpTopic::Root => Command::Help(HelpTopic::Root),
        HelpTopic::Compile => {
            let op = match opts.op.as_deref() {
                None => Connective::And,
                Some(key) => Connective::from_key(&key.to_ascii_lowercase())
                    .ok_or_else(|| anyhow::anyhow!("--op must be 'and' or 'or', got {key:?}"))?,
            };
            Command::Compile(CompileArgs {
                condition: required(opts.condition, "--where")?,
                op,
            })
        }
        HelpTopic::Select | HelpTopic::One => {
            let args = SelectArgs {
                conn,
                table: required(opts.table, "--table")?,
                condition: opts.condition,
                columns: opts.columns,
            };
            Command::Query(if topic == HelpTopic::One {
                QueryCommand::One(args)
            } else {
                QueryCommand::Select(args)
            })
        }
        HelpTopic::Insert => Command::Query(QueryCommand::Insert(InsertArgs {
            conn,
            table: required(opts.table, "--table")?,
            fields: required(opts.fields, "--fields")?,
        })),
        HelpTopic::Update => Command::Query(QueryCommand::Update(UpdateArgs {
            conn,
            table: required(opts.table, "--table")?,
            set: required(opts.set, "--set")?,
            condition: required(opts.condition, "--where")?,
        })),
        HelpTopic::Delete => Command::Query(QueryCommand::Delete(DeleteArgs {
            conn,
            table: required(opts.table, "--table")?,
            condition: required(opts.condition, "--where")?,
        })),
    };
    Ok(cmd)
}

fn required(value: Option<String>, flag: &str) -> anyhow::Result<String> {
    value.ok_or_else(|| anyhow::anyhow!("missing required {flag}"))
}

fn split_csv(v: &str) -> Vec<String> {
    v.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

const CONN_OPTIONS: &str = "\
CONNECTION OPTIONS:
  --config <FILE>         Config file path (default: pgwhere.toml, optional)
  --database-url <URL>    Override the [database] section of the config";

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
pgwhere - compile condition trees and run simple statements on PostgreSQL

USAGE:
  pgwhere <COMMAND> [OPTIONS]

COMMANDS:
  compile       Print the SQL expression for a condition (no database)
  select        Print matching rows as JSON lines
  one           Print the first matching row as JSON (or null)
  insert        Insert a row and print its id
  update        Update matching rows and print how many changed
  delete        Delete matching rows and print how many were removed

Conditions are JSON: {{\"a\": 1, \"or\": {{\"b\": [2, 3]}}}} compiles to
a = '1' AND (b = '2' OR b = '3'). A JSON string is passed through as raw SQL.

Run `pgwhere <command> --help` for more."
            );
        }
        HelpTopic::Compile => {
            println!(
                "\
USAGE:
  pgwhere compile --where <JSON> [OPTIONS]

OPTIONS:
  --where <JSON>          Condition to compile
  --op <and|or>           Connective between top-level terms (default: and)
  -h, --help              Print help"
            );
        }
        HelpTopic::Select | HelpTopic::One => {
            let name = if topic == HelpTopic::One { "one" } else { "select" };
            println!(
                "\
USAGE:
  pgwhere {name} --table <TABLE> [OPTIONS]

OPTIONS:
  --table <TABLE>         Table to read
  --where <JSON>          Condition (default: all rows)
  --columns <CSV>         Comma-separated column list (default: *)
  -h, --help              Print help

{CONN_OPTIONS}"
            );
        }
        HelpTopic::Insert => {
            println!(
                "\
USAGE:
  pgwhere insert --table <TABLE> --fields <JSON> [OPTIONS]

OPTIONS:
  --table <TABLE>         Table to insert into
  --fields <JSON>         Object of column values
  -h, --help              Print help

{CONN_OPTIONS}"
            );
        }
        HelpTopic::Update => {
            println!(
                "\
USAGE:
  pgwhere update --table <TABLE> --set <JSON> --where <JSON> [OPTIONS]

OPTIONS:
  --table <TABLE>         Table to update
  --set <JSON>            Object of column values to assign
  --where <JSON>          Condition (required, must not be empty)
  -h, --help              Print help

{CONN_OPTIONS}"
            );
        }
        HelpTopic::Delete => {
            println!(
                "\
USAGE:
  pgwhere delete --table <TABLE> --where <JSON> [OPTIONS]

OPTIONS:
  --table <TABLE>         Table to delete from
  --where <JSON>          Condition (required, must not be empty)
  -h, --help              Print help

{CONN_OPTIONS}"
            );
        }
    }
}
