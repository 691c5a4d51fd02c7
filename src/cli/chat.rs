use anyhow::Result;
use chrono::Utc;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::ai::chat::Chat;
use crate::ai::prompt::scheduling_prompt;
use crate::ai::tools::ToolRegistry;
use crate::core::AppConfig;
use crate::google::GoogleCalendar;
use crate::openai::{Message, Role};

/// Interactive session over the same bounded loop the API uses. Turns
/// are kept in memory for the session only.
pub async fn run() -> Result<()> {
    let config = AppConfig::default();
    let openai = config.openai()?;
    let zone = config.time_zone;

    let mut rl = DefaultEditor::new()?;
    let mut history: Vec<Message> = Vec::new();

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                let now = Utc::now();
                let calendar = GoogleCalendar::from_config(&config)?;
                let registry = ToolRegistry::new(&calendar, zone, now);
                let system_message = scheduling_prompt(
                    &config.system_message,
                    &now.with_timezone(&zone).to_rfc3339(),
                    zone.name(),
                )?;

                let mut transcript = history.clone();
                transcript.push(Message::new(Role::User, line));
                let result = Chat::builder(&openai.api_hostname, &openai.api_key, &openai.model)
                    .system_message(&system_message)
                    .transcript(transcript)
                    .build()
                    .run(&registry)
                    .await;

                match result {
                    Ok(outcome) => {
                        if let Some(operation) = &outcome.operation {
                            println!("[{}]", operation);
                        }
                        println!("{}", outcome.answer);
                        history.push(Message::new(Role::User, line));
                        history.push(Message::new(Role::Assistant, &outcome.answer));
                    }
                    // Keep the session alive so the user can retry
                    Err(err) => println!("Error: {}", err),
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
