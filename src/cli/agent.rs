//! Agent command handler (one-shot + interactive).

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;

use reagent::agent::classify_turn;
use reagent::log_component;
use reagent::session::{ConversationManager, Message};

use super::common::{create_agent, friendly_error, load_config};

/// Answer one message, or chat until `exit`/`quit`/EOF.
pub(crate) async fn cmd_agent(message: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let prototype = create_agent(&config, "cli")?;
    log_component!(
        debug,
        "cli",
        "Agent ready",
        tools = prototype.tools().len(),
        max_iterations = prototype.settings().max_iterations
    );

    let manager = ConversationManager::new(prototype);
    let conversation = manager.create().await;

    if let Some(msg) = message {
        match manager.execute(&conversation, &msg).await {
            Ok(messages) => print!("{}", format_turn(&messages)),
            Err(e) => {
                eprintln!("Error: {}", friendly_error(&e));
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    println!("Reagent Interactive Agent");
    println!("Type your message and press Enter. Type 'quit' or 'exit' to stop.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!();
                break;
            }
            Ok(_) => {
                let input = input.trim();
                if input.is_empty() {
                    continue;
                }
                if input == "quit" || input == "exit" {
                    println!("Goodbye!");
                    break;
                }

                match manager.execute(&conversation, input).await {
                    Ok(messages) => {
                        println!();
                        println!("{}", format_turn(&messages));
                    }
                    Err(e) => {
                        eprintln!("Error: {}", friendly_error(&e));
                        eprintln!();
                    }
                }
            }
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Render a turn as `ROLE: content` lines, then the final answer if there is one.
pub(crate) fn format_turn(messages: &[Message]) -> String {
    let mut out = String::new();
    for message in messages {
        out.push_str(&format!(
            "{}: {}\n",
            message.role.to_string().to_uppercase(),
            message.content
        ));
    }
    if let Some(answer) = classify_turn(messages).final_answer {
        out.push_str(&format!("\n>>> {}\n", answer));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_turn_marks_final_answer() {
        let turn = vec![
            Message::assistant("Thought: look it up\nAction: echo: hi\nPAUSE"),
            Message::tool_result("call_1", "Observation from echo: hi"),
            Message::assistant("Final Answer: hi"),
        ];
        let out = format_turn(&turn);
        assert!(out.starts_with("ASSISTANT: Thought: look it up\n"));
        assert!(out.contains("TOOL: Observation from echo: hi\n"));
        assert!(out.ends_with("\n>>> hi\n"));
    }

    #[test]
    fn test_format_turn_without_answer() {
        let out = format_turn(&[Message::system("Error: Tool teleport not found")]);
        assert_eq!(out, "SYSTEM: Error: Tool teleport not found\n");
    }
}
