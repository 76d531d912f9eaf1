//! LinkTCP CLI
//!
//! Interactive line chat over a single TCP link.
//!
//! Lines typed on stdin are sent to the peer; inbound lines go to stdout,
//! state changes and log lines to stderr. `/quit` or end of input
//! disconnects.

use std::io::BufRead;
use std::path::PathBuf;
use std::thread;

use clap::{Parser, Subcommand};
use crossbeam::channel::{unbounded, Receiver};
use crossbeam::select;
use tracing_subscriber::{fmt, EnvFilter};

use linktcp::transcript::format_bytes;
use linktcp::{
    ConnectionConfig, ConnectionState, Engine, EngineConfig, LinkError, Message, SettingsStore,
    Transcript,
};

/// LinkTCP
#[derive(Parser, Debug)]
#[command(name = "linktcp")]
#[command(about = "Point-to-point TCP line chat")]
#[command(version)]
struct Args {
    /// File remembering the last-used connection
    #[arg(short, long, default_value = "./linktcp_settings.bin")]
    settings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Dial a remote host
    Connect {
        /// Host name or IP address
        #[arg(long)]
        host: String,

        /// Remote port
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Wait for one inbound connection
    Listen {
        /// Local port (0 picks a free one)
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Interface to bind
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Repeat the last saved connection
    Resume,

    /// Print this host's IPv4 address
    Ip,
}

/// Tracing directive when RUST_LOG is unset; engine log lines are already
/// printed from the observer stream
const DEFAULT_LOG_FILTER: &str = "warn";

/// One thing the main loop reacts to
enum Event {
    State(Option<ConnectionState>),
    Inbound(Option<Message>),
    Log(Option<String>),
    Input(Option<String>),
}

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let store = SettingsStore::new(&args.settings);

    let mut engine_config = EngineConfig::builder();
    let config = match args.command {
        Commands::Connect { host, port } => ConnectionConfig::client(host, port),
        Commands::Listen { port, bind } => {
            engine_config = engine_config.bind_host(bind);
            ConnectionConfig::server(port)
        }
        Commands::Resume => match store.load() {
            Ok(Some(config)) => config,
            Ok(None) => {
                eprintln!("No saved connection at {}", store.path().display());
                std::process::exit(2);
            }
            Err(e) => {
                eprintln!("Cannot read saved connection: {}", e);
                std::process::exit(2);
            }
        },
        Commands::Ip => {
            println!("{}", linktcp::local_ipv4());
            return;
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("{}", e);
        std::process::exit(2);
    }
    if let Err(e) = store.save(&config) {
        tracing::warn!("Could not save settings: {}", e);
    }

    tracing::info!("LinkTCP v{} ({} role)", linktcp::VERSION, config.role);

    let engine = Engine::new(engine_config.build());
    match run(&engine, config) {
        Ok(transcript) => print_summary(&transcript),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Drive one session until the link ends or input is exhausted
fn run(engine: &Engine, config: ConnectionConfig) -> linktcp::Result<Transcript> {
    let states = engine.subscribe_state();
    let inbound = engine.subscribe_messages();
    let logs = engine.subscribe_logs();
    let input = spawn_stdin_reader();

    let attempt = {
        let engine = engine.clone();
        thread::spawn(move || engine.start(&config))
    };

    let mut transcript = Transcript::new();
    let mut started = false;

    loop {
        let event = select! {
            recv(states) -> s => Event::State(s.ok()),
            recv(inbound) -> m => Event::Inbound(m.ok()),
            recv(logs) -> l => Event::Log(l.ok()),
            recv(input) -> i => Event::Input(i.ok()),
        };

        match event {
            Event::State(Some(state)) => {
                eprintln!("* {}", state);
                if state.is_active() {
                    started = true;
                } else if started {
                    break;
                }
            }
            Event::Inbound(Some(message)) => {
                println!("<< {}", message.content());
                transcript.record_received(message);
            }
            Event::Log(Some(line)) => {
                eprintln!("  {}", line);
                transcript.record_log(line);
            }
            Event::Input(Some(line)) => {
                let text = line.trim_end_matches('\r');
                if text == "/quit" {
                    break;
                }
                if text.is_empty() {
                    continue;
                }
                match engine.send(text) {
                    Ok(()) => {
                        transcript.record_sent(text);
                    }
                    Err(e) => eprintln!("! {}", e),
                }
            }
            // Stdin closed or engine gone
            Event::Input(None) | Event::State(None) => break,
            Event::Inbound(None) | Event::Log(None) => break,
        }
    }

    engine.disconnect();

    // Drain log lines emitted by the teardown
    while let Ok(line) = logs.try_recv() {
        transcript.record_log(line);
    }

    match attempt.join() {
        Ok(Err(e)) if !e.is_cancelled() => Err(e),
        Ok(_) => Ok(transcript),
        Err(_) => Err(LinkError::Connect("connection thread panicked".to_string())),
    }
}

/// Forward stdin lines over a channel so the main loop can select on them
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = unbounded();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn print_summary(transcript: &Transcript) {
    eprintln!(
        "Sent {} ({} bytes), received {} ({} bytes), {} messages",
        format_bytes(transcript.total_bytes_sent()),
        transcript.total_bytes_sent(),
        format_bytes(transcript.total_bytes_received()),
        transcript.total_bytes_received(),
        transcript.messages().len()
    );
}
