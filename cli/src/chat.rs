//! Line-oriented interactive chat

use crate::render;
use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use toolgate_application::{RunTurnError, RunTurnInput, RunTurnUseCase};
use tracing::debug;

/// Read messages from stdin until EOF, `/quit` or Ctrl-C at the prompt.
///
/// Ctrl-C during a turn cancels only that turn.
pub async fn run(use_case: &RunTurnUseCase, model: &str, json: bool) -> Result<()> {
    print_welcome(model);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{} ", ">>>".cyan().bold());
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };
        let Some(line) = line else {
            println!();
            break;
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('/') {
            if handle_command(line) {
                break;
            }
            continue;
        }

        let token = CancellationToken::new();
        let turn = use_case.execute_cancellable(RunTurnInput::new(line), token.clone());
        tokio::pin!(turn);

        let outcome = tokio::select! {
            outcome = &mut turn => outcome,
            _ = tokio::signal::ctrl_c() => {
                debug!("Ctrl-C received, cancelling turn");
                token.cancel();
                turn.await
            }
        };

        match outcome {
            Ok(output) => render::print_turn(&output, json)?,
            Err(RunTurnError::Cancelled) => println!("{}", "(cancelled)".yellow()),
        }
        println!();
    }

    println!("Bye!");
    Ok(())
}

fn print_welcome(model: &str) {
    println!();
    println!("{} (model: {})", "toolgate chat".bold(), model);
    println!("Type a message, /help for commands, /quit to exit.");
    println!("Ctrl-C cancels a running turn.");
    println!();
}

/// Returns true when the loop should exit
fn handle_command(line: &str) -> bool {
    match line {
        "/quit" | "/exit" | "/q" => true,
        "/help" | "/h" => {
            println!("  /help   Show this help");
            println!("  /quit   Exit");
            false
        }
        other => {
            println!("{} {}", "Unknown command:".yellow(), other);
            false
        }
    }
}
