//! spamc codec tool
//!
//! Composes spamd requests and inspects spamd responses offline.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use spamc::protocol::{self, Header, Status};
use spamc::{ClientConfig, SpamdError, Verb};
use tracing_subscriber::{fmt, EnvFilter};

/// spamc codec tool
#[derive(Parser, Debug)]
#[command(name = "spamc-codec")]
#[command(about = "Compose and inspect spamd protocol messages")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a request for a message to stdout
    Compose {
        /// Verb (CHECK, HEADERS, PING, PROCESS, REPORT, REPORT_IFSPAM, SYMBOLS, TELL)
        verb: String,

        /// User to scan as
        #[arg(short, long)]
        user: Option<String>,

        /// Compress the body with zlib
        #[arg(short, long)]
        compress: bool,

        /// Extra header, as 'Name: value'
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Message file (stdin if omitted)
        file: Option<PathBuf>,
    },

    /// Decode a raw response and print a summary
    Parse {
        /// Response file (stdin if omitted)
        file: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,spamc=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Compose { verb, user, compress, headers, file } => {
            compose(&verb, user, compress, &headers, file)
        }
        Commands::Parse { file } => parse(file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            // Status errors exit with their sysexits code
            let code = e.status().unwrap_or(Status::Protocol).code();
            ExitCode::from(code)
        }
    }
}

fn compose(
    verb: &str,
    user: Option<String>,
    compress: bool,
    headers: &[String],
    file: Option<PathBuf>,
) -> spamc::Result<()> {
    let verb: Verb = verb.to_ascii_uppercase().parse()?;

    let mut builder = ClientConfig::builder().compress(compress);
    if let Some(user) = user {
        builder = builder.user(user);
    }
    let config = builder.build();

    let body = if verb.requires_body() {
        Some(read_input(file)?.into())
    } else {
        None
    };

    let mut request = config.request(verb, body);
    for raw in headers {
        let header = Header::parse_line(raw.as_bytes())
            .map_err(|e| SpamdError::BadRequest(format!("Invalid header {:?}: {}", raw, e)))?;
        request.headers.push(header);
    }

    let mut stdout = io::stdout().lock();
    protocol::write_request(&mut stdout, &request)?;
    tracing::info!("Composed {} request", verb);
    Ok(())
}

fn parse(file: Option<PathBuf>) -> spamc::Result<()> {
    let raw = read_input(file)?;
    let response = protocol::decode_response(&raw)?;

    tracing::info!(
        "SPAMD/{} {} {} ({})",
        response.version,
        response.status.code(),
        response.message,
        response.status.name()
    );
    for header in &response.headers {
        tracing::info!("{}", header);
    }
    if let Some(spam) = response.spam() {
        tracing::info!(
            "Verdict: {} (score {} / threshold {})",
            if spam.is_spam { "spam" } else { "ham" },
            spam.score,
            spam.threshold
        );
    }

    let mut stdout = io::stdout().lock();
    stdout.write_all(response.body())?;
    stdout.flush()?;
    Ok(())
}

fn read_input(file: Option<PathBuf>) -> io::Result<Vec<u8>> {
    match file {
        Some(path) => fs::read(path),
        None => {
            let mut buffer = Vec::new();
            io::stdin().lock().read_to_end(&mut buffer)?;
            Ok(buffer)
        }
    }
}
