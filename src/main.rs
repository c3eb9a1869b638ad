use std::io;

use clap::{Args, Parser, Subcommand};
use lu::about;
use lu::chat::{self, ChatExit, InputEvent};
use lu::config::{DEFAULT_API_URL, DEFAULT_WS_URL};
use lu::render::TerminalRenderer;
use lu::{ClientConfig, ClientError, SessionClient, SessionId};
use serde::Serialize;
use tokio::sync::mpsc;

#[derive(Parser, Debug)]
#[command(name = "lu", about = "Chat with the Lu loan sales assistant")]
struct Cli {
    #[arg(long, env = "LU_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[arg(long, env = "LU_WS_URL", default_value = DEFAULT_WS_URL)]
    ws_url: String,

    /// Log level for stderr output (error, warn, info, debug, trace).
    #[arg(long, env = "LU_LOG", default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive chat (default).
    Chat,
    /// Print the About page.
    About,
    /// Check backend health.
    Ping,
    Session(SessionCommand),
}

#[derive(Args, Debug)]
struct SessionCommand {
    #[command(subcommand)]
    command: SessionSubcommand,
}

#[derive(Subcommand, Debug)]
enum SessionSubcommand {
    Create,
    Show { session_id: String },
    Delete { session_id: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ClientError> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .init();

    let client = || ClientConfig::new(&cli.api_url, &cli.ws_url).map(SessionClient::new);
    match cli.command.as_ref().unwrap_or(&Command::Chat) {
        Command::About => Ok(about::render_about(&mut io::stdout().lock())?),
        Command::Chat => run_chat(&client()?).await,
        Command::Ping => run_ping(&client()?).await,
        Command::Session(session) => run_session(&client()?, &session.command).await,
    }
}

async fn run_chat(client: &SessionClient) -> Result<(), ClientError> {
    let (tx, mut rx) = mpsc::channel(16);
    spawn_stdin_reader(tx.clone());
    spawn_interrupt_watch(tx);

    let mut renderer = TerminalRenderer::new(io::stdout());
    loop {
        let outcome = chat::run_chat(client, &mut rx, &mut renderer).await?;
        if outcome.exit == ChatExit::Quit {
            return Ok(());
        }
        tracing::info!("chat: reloading with a new session");
    }
}

/// Stdin is read on a plain thread so a blocked read never holds the runtime
/// open at exit.
fn spawn_stdin_reader(tx: mpsc::Sender<InputEvent>) {
    std::thread::spawn(move || chat::pump_input(io::stdin().lock(), &tx));
}

fn spawn_interrupt_watch(tx: mpsc::Sender<InputEvent>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(InputEvent::Quit).await;
        }
    });
}

async fn run_ping(client: &SessionClient) -> Result<(), ClientError> {
    let health = client.health().await?;
    println!("ok {} {} ({})", health.status, health.version, health.environment);
    Ok(())
}

async fn run_session(client: &SessionClient, command: &SessionSubcommand) -> Result<(), ClientError> {
    match command {
        SessionSubcommand::Create => {
            let created = client.create_session().await?;
            print_json(&serde_json::json!({
                "session_id": created.id.as_str(),
                "created_at": created.created_at,
                "greeting_message": created.greeting,
            }))
        }
        SessionSubcommand::Show { session_id } => {
            let summary = client.fetch_session(&parse_session_id(session_id)?).await?;
            print_json(&summary)
        }
        SessionSubcommand::Delete { session_id } => {
            let ack = client.delete_session(&parse_session_id(session_id)?).await?;
            print_json(&ack)
        }
    }
}

fn parse_session_id(raw: &str) -> Result<SessionId, ClientError> {
    SessionId::new(raw).ok_or(ClientError::EmptySessionId)
}

fn print_json(value: &impl Serialize) -> Result<(), ClientError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
