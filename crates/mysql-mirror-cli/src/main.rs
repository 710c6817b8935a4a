//! mysql-mirror CLI - copy the employees `titles` table between MySQL databases.

use clap::Parser;
use mysql_mirror::{
    CopyOrchestrator, EndpointConfig, MirrorConfig, MirrorError, MysqlReader, MysqlWriter,
    DEFAULT_BATCH_SIZE,
};
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "mysql-mirror")]
#[command(about = "Copy the employees `titles` table from one MySQL database into another")]
#[command(version)]
struct Cli {
    /// Source database user
    #[arg(allow_hyphen_values = true)]
    source_user: String,

    /// Source database password
    #[arg(allow_hyphen_values = true)]
    source_password: String,

    /// Source database host
    #[arg(allow_hyphen_values = true)]
    source_host: String,

    /// Source database name
    #[arg(allow_hyphen_values = true)]
    source_database: String,

    /// Target database user
    #[arg(allow_hyphen_values = true)]
    target_user: String,

    /// Target database password
    #[arg(allow_hyphen_values = true)]
    target_password: String,

    /// Target database host
    #[arg(allow_hyphen_values = true)]
    target_host: String,

    /// Target database name
    #[arg(allow_hyphen_values = true)]
    target_database: String,

    /// Rows moved per batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Source database port
    #[arg(long, default_value_t = 3306)]
    source_port: u16,

    /// Target database port
    #[arg(long, default_value_t = 3306)]
    target_port: u16,

    /// Output JSON run report to stdout
    #[arg(long)]
    output_json: bool,

    /// Exit with an error if any batch was rejected by the target
    #[arg(long)]
    fail_on_partial: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,
}

impl Cli {
    fn to_config(&self) -> MirrorConfig {
        MirrorConfig::new(
            EndpointConfig::new(
                &self.source_user,
                &self.source_password,
                &self.source_host,
                &self.source_database,
            )
            .with_port(self.source_port),
            EndpointConfig::new(
                &self.target_user,
                &self.target_password,
                &self.target_host,
                &self.target_database,
            )
            .with_port(self.target_port),
        )
        .with_batch_size(self.batch_size)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), MirrorError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format);

    let config = cli.to_config();
    config.validate()?;
    info!(
        "Copying titles from {} to {}",
        config.source.display_name(),
        config.target.display_name()
    );

    let source = MysqlReader::connect(&config.source).await;
    let target = MysqlWriter::connect(&config.target).await;

    let report = CopyOrchestrator::from_config(&config)
        .run(source, target)
        .await?;

    if cli.output_json {
        println!("{}", report.to_json()?);
    }

    if cli.fail_on_partial && !report.is_complete() {
        return Err(MirrorError::PartialCopy {
            failed: report.failed_batches.len(),
            attempted: report.batches_attempted,
        });
    }

    if !cli.output_json {
        println!("Operation was successful!");
    }

    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout is reserved for the result line / JSON report
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
