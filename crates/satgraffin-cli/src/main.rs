//! satgraffin - conversational client for the SatGraffin knowledge base

mod config;
mod ui;

use clap::Parser;
use satgraffin_api::{Backend, QueryClient};
use satgraffin_chat::{
    ChatSession, Conversation, FileHistoryStore, HistoryStore, MemoryHistoryStore, Role, Status,
};
use tokio::io::AsyncBufReadExt;

/// satgraffin - chat with the MOSDAC satellite-data knowledge base
#[derive(Parser, Debug)]
#[command(name = "satgraffin")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backend base URL (overrides SATGRAFFIN_API_BASE_URL and config)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Stable user id sent with each query (default: random per run)
    #[arg(short, long)]
    user_id: Option<String>,

    /// Run a single query non-interactively and print the reply
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Disable TUI mode (use simple stdin/stdout)
    #[arg(long)]
    no_tui: bool,

    /// Keep the transcript in memory only for this run
    #[arg(long)]
    ephemeral: bool,

    /// Remove the persisted transcript and exit
    #[arg(long)]
    clear_history: bool,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup tracing
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("satgraffin=debug")
            .init();
    }

    // Initialize config and exit
    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    // Clear persisted history and exit
    if args.clear_history {
        let mut store = FileHistoryStore::new(FileHistoryStore::default_path());
        store.clear();
        println!("Persisted conversation history removed.");
        return Ok(());
    }

    // Load config file
    let cfg = config::Config::load();

    let base_url = cfg.resolve_base_url(
        args.base_url.as_deref(),
        std::env::var("SATGRAFFIN_API_BASE_URL").ok().as_deref(),
    );

    let user_id = args
        .user_id
        .or(cfg.user_id.clone())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    tracing::debug!("Using backend at {}", base_url);

    let store: Box<dyn HistoryStore> = if args.ephemeral {
        Box::new(MemoryHistoryStore::new())
    } else {
        Box::new(FileHistoryStore::new(FileHistoryStore::default_path()))
    };

    let conversation = Conversation::new(store);
    let client = QueryClient::new(base_url);
    let mut session = ChatSession::new(conversation, client, user_id);

    // Non-interactive: one query, one reply
    if let Some(query) = args.command {
        session.send(&query).await;
        print_reply(&session);
        if session.conversation().status() == Status::Error {
            std::process::exit(1);
        }
        return Ok(());
    }

    let use_tui = !args.no_tui && cfg.tui.unwrap_or(true);
    if use_tui {
        ui::run(session).await
    } else {
        run_plain(session).await
    }
}

/// Print the latest assistant reply (and its sources) for the plain modes
fn print_reply<B: Backend>(session: &ChatSession<B>) {
    let conversation = session.conversation();

    if let Some(message) = conversation
        .messages()
        .iter()
        .rev()
        .find(|m| m.role == Role::Assistant)
    {
        println!("{}", message.content);
        for (i, link) in message.sources.iter().enumerate() {
            println!("  [{}] {}", i + 1, link);
        }
    }

    if let Some(detail) = conversation.error_message() {
        eprintln!("status: error ({})", detail);
    }
}

/// Simple stdin/stdout conversation loop
async fn run_plain<B: Backend>(mut session: ChatSession<B>) -> anyhow::Result<()> {
    use std::io::Write;

    println!("SatGraffin - MOSDAC knowledge assistant");
    println!("Commands: /clear  /quit\n");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "/quit" | "/exit" => break,
            "/clear" => {
                session.clear();
                println!("Conversation cleared.");
            }
            _ => {
                if session.send(&line).await {
                    print_reply(&session);
                }
            }
        }
    }

    Ok(())
}
