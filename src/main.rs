//! Web Log Collector entry point.
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │              WEB LOG COLLECTOR                │
//!                    │                                               │
//!   POST /error      │  ┌────────┐   ┌──────────┐   ┌────────────┐  │
//!   POST /csp   ─────┼─▶│  http  │──▶│ context  │──▶│    sink    │──┼──▶ stream /
//!                    │  │ server │   │ builder  │   │ (injected) │  │    rotated file
//!                    │  └────────┘   └──────────┘   └────────────┘  │
//!                    │                                               │
//!   204 No Content ◀─┼── always, except malformed bodies in strict  │
//!                    │   mode (400) and internal failures (500)      │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use web_log_collector::config::{validate_config, CollectorConfig, ReportMode};
use web_log_collector::observability::{logging, FileSink, ReportFileWriter, ReportSink, TracingSink};
use web_log_collector::CollectorServer;

#[derive(Parser)]
#[command(name = "web-log-collector")]
#[command(about = "Run an HTTP server that collects reports from web sites and logs them.", long_about = None)]
struct Cli {
    /// The host address on which to listen.
    #[arg(long, default_value = "localhost")]
    host: String,

    /// The port on which to listen.
    #[arg(long, default_value_t = 80)]
    port: u16,

    /// The path of the directory where to write log files.
    #[arg(long)]
    log_directory: Option<PathBuf>,

    /// Acknowledge malformed report bodies instead of answering 400/500.
    #[arg(long)]
    lenient: bool,

    /// Enable unverified identity extraction from the named cookie.
    #[arg(long, value_name = "NAME")]
    identity_cookie: Option<String>,
}

impl Cli {
    fn into_config(self) -> CollectorConfig {
        let mut config = CollectorConfig::default();
        config.listener.host = self.host;
        config.listener.port = self.port;
        config.log_directory = self.log_directory;
        if self.lenient {
            config.report_mode = ReportMode::Lenient;
        }
        if let Some(name) = self.identity_cookie {
            config.identity.enabled = true;
            config.identity.cookie_name = name;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = Cli::parse().into_config();

    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            tracing::error!(%error, "Invalid configuration");
        }
        return Err(format!("configuration rejected ({} problems)", errors.len()).into());
    }

    tracing::info!(
        bind_address = %config.listener.bind_address(),
        log_directory = ?config.log_directory,
        mode = ?config.report_mode,
        "Configuration loaded"
    );

    // Sink selection happens exactly once; handlers only ever append to it.
    let sink: Arc<dyn ReportSink> = match &config.log_directory {
        Some(directory) => Arc::new(FileSink::new(ReportFileWriter::open(directory)?)),
        None => Arc::new(TracingSink),
    };

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = CollectorServer::new(config, sink);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
