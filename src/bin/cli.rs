//! msgstore CLI Client
//!
//! Command-line interface for interacting with a msgstore server.

use clap::{Parser, Subcommand};
use msgstore::client::Client;
use msgstore::protocol::{Response, Status};
use msgstore::Message;
use tracing_subscriber::{fmt, EnvFilter};

/// msgstore CLI
#[derive(Parser, Debug)]
#[command(name = "msgstore-cli")]
#[command(about = "CLI for the msgstore message service")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a message
    Add {
        #[arg(long)]
        application_id: i64,

        #[arg(long)]
        session_id: String,

        #[arg(long)]
        message_id: String,

        /// Participant names, in order (repeatable)
        #[arg(long = "participant")]
        participants: Vec<String>,

        #[arg(long)]
        content: String,
    },

    /// Get messages, e.g. `get sessionId=s1`
    Get {
        /// Query: applicationId=<int>, sessionId=<id> or messageId=<id>
        query: String,
    },

    /// Delete messages, e.g. `del applicationId=1`
    Del {
        /// Query: applicationId=<int>, sessionId=<id> or messageId=<id>
        query: String,
    },

    /// Ping the server
    Ping,
}

fn main() {
    // Quiet unless RUST_LOG asks for more; stdout is reserved for responses
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut client = match Client::connect(&args.server) {
        Ok(client) => {
            tracing::debug!(server = %args.server, "Connected");
            client
        }
        Err(e) => {
            eprintln!("error: cannot connect to {}: {}", args.server, e);
            std::process::exit(2);
        }
    };

    let result = match args.command {
        Commands::Add {
            application_id,
            session_id,
            message_id,
            participants,
            content,
        } => client.add_message(&Message::new(
            application_id,
            session_id,
            message_id,
            participants,
            content,
        )),
        Commands::Get { query } => client.get_message(&query),
        Commands::Del { query } => client.delete_message(&query),
        Commands::Ping => client.ping(),
    };

    match result {
        Ok(response) => print_response(&response),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    }
}

fn print_response(response: &Response) {
    let body = match response.json() {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()),
        Err(_) => String::from_utf8_lossy(&response.body).into_owned(),
    };

    if response.status == Status::Ok {
        println!("{}", body);
    } else {
        eprintln!("{} {}", response.status.code(), response.status.name());
        eprintln!("{}", body);
        std::process::exit(1);
    }
}
