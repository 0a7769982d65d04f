use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use psp_gateway::application::processor::PaymentProcessor;
use psp_gateway::config::{Config, GatewayConfig, LogFormat};
use psp_gateway::domain::ports::{AcquirerGatewayBox, TransactionStoreBox};
use psp_gateway::infrastructure::in_memory::InMemoryTransactionStore;
use psp_gateway::infrastructure::mock_acquirer::MockAcquirerGateway;
use psp_gateway::interfaces::csv::outcome_writer::OutcomeWriter;
use psp_gateway::interfaces::csv::payment_reader::PaymentReader;
use psp_gateway::interfaces::csv::run_batch;
use psp_gateway::interfaces::http::{AppState, router};
use psp_gateway::logging::init_logger;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file (optional). Flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the payments HTTP API
    Serve {
        /// Address to listen on, e.g. 127.0.0.1:8080
        #[arg(long)]
        bind: Option<String>,

        /// Give up on an acquirer call after this many milliseconds
        #[arg(long)]
        gateway_timeout_ms: Option<u64>,

        /// Delay every mock acquirer decision by this many milliseconds
        #[arg(long)]
        gateway_latency_ms: Option<u64>,
    },
    /// Process a CSV file of payment requests and print the outcomes as CSV
    Batch {
        /// Input payments CSV file
        input: PathBuf,
    },
}

fn build_processor(gateway: &GatewayConfig) -> PaymentProcessor {
    let store: TransactionStoreBox = Box::new(InMemoryTransactionStore::new());
    let acquirer: AcquirerGatewayBox = match gateway.latency() {
        Some(latency) => Box::new(MockAcquirerGateway::with_latency(latency)),
        None => Box::new(MockAcquirerGateway::new()),
    };

    let processor = PaymentProcessor::new(store, acquirer);
    match gateway.timeout() {
        Some(timeout) => processor.with_gateway_timeout(timeout),
        None => processor,
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).into_diagnostic()?;
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    init_logger(&config.logging);

    match cli.command {
        Command::Serve {
            bind,
            gateway_timeout_ms,
            gateway_latency_ms,
        } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if gateway_timeout_ms.is_some() {
                config.gateway.timeout_ms = gateway_timeout_ms;
            }
            if gateway_latency_ms.is_some() {
                config.gateway.latency_ms = gateway_latency_ms;
            }

            let addr = config.bind_addr().into_diagnostic()?;
            let app = router(AppState::new(build_processor(&config.gateway)));

            let listener = tokio::net::TcpListener::bind(addr).await.into_diagnostic()?;
            info!(%addr, "PSP gateway listening");
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
                .into_diagnostic()?;
        }
        Command::Batch { input } => {
            let processor = build_processor(&config.gateway);
            let file = File::open(input).into_diagnostic()?;

            let stdout = io::stdout();
            let mut writer = OutcomeWriter::new(stdout.lock());
            run_batch(&processor, PaymentReader::new(file), &mut writer)
                .await
                .into_diagnostic()?;
        }
    }

    Ok(())
}
