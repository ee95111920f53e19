mod cli;
mod compile_cmd;
mod config;
mod query_cmd;

use tracing_subscriber::EnvFilter;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    init_logging();
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Compile(args) => compile_cmd::run(args),
        cli::Command::Query(cmd) => query_cmd::run(cmd).await,
    }
}

/// Logs go to stderr so stdout stays machine-readable. Filtered by `RUST_LOG`,
/// warnings only by default.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
