//! whatsapp-rag-bot entry point.
//!
//! - `whatsapp-rag-bot [serve]` - run the webhook server
//! - `whatsapp-rag-bot console` - chat with the assistant on stdin/stdout

use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use uuid::Uuid;

use whatsapp_rag_bot::adapters::http::app_router;
use whatsapp_rag_bot::adapters::storage::InMemoryConversationStore;
use whatsapp_rag_bot::application::{ChatCommand, ChatHandler};
use whatsapp_rag_bot::bootstrap::{self, BootstrapError};

const USAGE: &str = "usage: whatsapp-rag-bot [serve|console]";

#[tokio::main]
async fn main() -> ExitCode {
    let result = match std::env::args().nth(1).as_deref() {
        None | Some("serve") => serve().await,
        Some("console") => console().await,
        Some(other) => {
            eprintln!("unknown command: {}\n{}", other, USAGE);
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("whatsapp-rag-bot: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn serve() -> Result<(), BootstrapError> {
    let config = bootstrap::load_config()?;
    bootstrap::init_tracing(&config.server);

    let store = bootstrap::build_store(&config);
    let purge = store
        .as_ref()
        .map(|store| store.spawn_purge_task(config.features.history_ttl()));
    let state = bootstrap::build_state(&config, store)?;
    let app = app_router(state, config.server.request_timeout());

    let addr = config.server.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        retain_history = config.features.retain_history,
        "Listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(purge) = purge {
        purge.abort();
    }
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}

/// Interactive session. History lives for the whole process.
async fn console() -> Result<(), BootstrapError> {
    let config = bootstrap::load_chat_config()?;
    bootstrap::init_tracing(&config.server);

    let completion = bootstrap::build_completion(&config)?;
    let orchestrator = bootstrap::build_orchestrator(&config, completion)?;
    let handler = ChatHandler::new(
        orchestrator,
        Some(Arc::new(InMemoryConversationStore::without_expiry())),
        config.assistant.system_prompt.clone(),
    );
    let chat_id = Uuid::new_v4().to_string();

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(format!("{} ready. Type 'quit' to exit.\n", config.assistant.name).as_bytes())
        .await?;

    loop {
        stdout.write_all(b"\nYou: ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.eq_ignore_ascii_case("quit") {
            break;
        }
        if input.is_empty() {
            continue;
        }

        let reply = match handler.handle(ChatCommand::new(&chat_id, input)).await {
            Ok(result) => result.reply,
            Err(e) => {
                tracing::error!(error = %e, "Chat turn failed");
                config.assistant.fallback_reply.clone()
            }
        };
        stdout
            .write_all(format!("Assistant: {}\n", reply).as_bytes())
            .await?;
    }

    Ok(())
}
