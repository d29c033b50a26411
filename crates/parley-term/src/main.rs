//! Parley chat client binary.
//!
//! # Usage
//!
//! ```bash
//! # Connect to a chat server
//! parley 127.0.0.1 17365
//!
//! # Scripted input, with debug logging on stderr
//! printf 'alice\nhello\nbye\n' | RUST_LOG=debug parley 127.0.0.1 17365
//! ```

use std::{
    io::{self, Write},
    process::ExitCode,
    time::Duration,
};

use clap::Parser;
use parley_app::Runtime;
use parley_client::{ClientConfig, Connection, ServerAddress};
use parley_core::{ExitStatus, Session, Termination};
use parley_term::{PromptMode, StdConsole, TermError};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Interactive line chat client
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(about = "Interactive line chat client")]
#[command(version)]
struct Args {
    /// IPv4 address of the chat server
    server_ip: String,

    /// TCP port of the chat server, in [1024, 65535]
    port: String,

    /// Seconds to wait for the connection to be established
    #[arg(long, default_value_t = 10)]
    connect_timeout_secs: u64,

    /// When to show the username and input prompts
    #[arg(long, value_enum, default_value_t = PromptMode::Auto)]
    prompt: PromptMode,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr so they never mix into the chat on stdout.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    match run(args) {
        Ok(termination) => {
            tracing::info!(?termination, "session ended");
            match termination.exit_status() {
                ExitStatus::Success => ExitCode::SUCCESS,
                ExitStatus::Failure => ExitCode::FAILURE,
            }
        },
        Err(err) => {
            tracing::debug!(?err, "startup failed");
            // Nothing useful is left to do if stderr itself is gone.
            let _ = writeln!(io::stderr(), "Error: {err}");
            ExitCode::FAILURE
        },
    }
}

fn run(args: Args) -> Result<Termination, TermError> {
    let server = ServerAddress::new(&args.server_ip, &args.port)?;
    let config = ClientConfig {
        connect_timeout: Duration::from_secs(args.connect_timeout_secs),
        ..ClientConfig::default()
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(TermError::Runtime)?;

    let result = runtime.block_on(async {
        let mut console = StdConsole::stdio(args.prompt);
        let name = console.prompt_display_name().await?;
        console.banner(&name)?;

        let conn = Connection::connect(server.socket_addr(), &config).await?;
        let session = Session::new(name, server.socket_addr());

        Ok::<_, TermError>(Runtime::new(conn, console, session).run(tokio::signal::ctrl_c()).await)
    });

    // A blocking stdin read may still be parked on the blocking pool.
    runtime.shutdown_background();
    result
}
