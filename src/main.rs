use std::io::Write;
use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tracing::info;
use uuid::Uuid;

use poli_agent::agents::PassOutcome;
use poli_agent::types::Turn;
use poli_agent::utils::init_logger;
use poli_agent::{build_state, config::Config, create_router, AppState};

#[derive(Parser)]
#[command(name = "poli-agent", version, about = "Fraud complaint assistant: report intake, evidence collection and letter drafting")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve,
    /// Talk to the supervisor from the terminal
    Chat,
    /// Draft a complaint letter interactively
    Draft,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    // Keep the guard alive so the file writer flushes on exit
    let _log_guard = init_logger(&config.log)?;
    info!(provider = %config.llm.default_provider, "Configuration loaded: {:?}", config.server);

    let state = build_state(config)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(state).await,
        Commands::Chat => chat_loop(state).await,
        Commands::Draft => draft_loop(state).await,
    }
}

async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", state.config.server.host, state.config.server.port).parse()?;
    let app = create_router(state);

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

fn is_exit(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "exit" | "quit")
}

fn prompt() -> anyhow::Result<()> {
    print!("사용자: ");
    std::io::stdout().flush()?;
    Ok(())
}

async fn chat_loop(state: AppState) -> anyhow::Result<()> {
    let session_id = Uuid::new_v4();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("사기 피해 상담을 시작합니다. 종료하려면 exit 또는 quit 을 입력하세요.");

    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else { break };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if is_exit(input) {
            break;
        }

        match state.chat.process_chat(Some(session_id), vec![Turn::user(input)]).await {
            Ok(reply) => println!("상담원: {}", reply.reply.unwrap_or_default()),
            Err(e) => eprintln!("오류: {}", e),
        }
    }

    Ok(())
}

async fn draft_loop(state: AppState) -> anyhow::Result<()> {
    let session_id = Uuid::new_v4();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("진정서 작성을 시작합니다. 피해 상황을 말씀해주세요. 종료하려면 exit 또는 quit 을 입력하세요.");

    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else { break };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if is_exit(input) {
            break;
        }

        match state.drafts.process_turn(Some(session_id), input).await {
            Ok(turn) => {
                for reply in &turn.replies {
                    println!("상담원: {}", reply);
                }
                if turn.outcome != PassOutcome::LetterDrafted {
                    println!("(정보 충족도 {:.0}%)", turn.completion_ratio * 100.0);
                }
            }
            Err(e) => eprintln!("오류: {}", e),
        }
    }

    Ok(())
}
