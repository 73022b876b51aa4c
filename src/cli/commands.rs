use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::content::{ContentFormat, ParsedContent, analyze_content, get_content_summary};
use crate::context::{UpstreamTurn, build_context, build_upstream_turns};
use crate::markdown::parse_markdown;
use crate::models::{ChatRequest, Conversation, Message, MessageRole};
use crate::utils::{ContextConfig, load_conversation, read_input};

#[derive(Parser)]
#[command(name = "chat-content")]
#[command(version)]
#[command(about = "Parse, classify and build upstream context for chat messages", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse markdown into a block/inline AST
    Parse {
        /// Input file, `-` for stdin
        #[arg(default_value = "-")]
        file: PathBuf,
    },
    /// Classify a message and report its primary format
    Classify {
        /// Input file, `-` for stdin
        #[arg(default_value = "-")]
        file: PathBuf,
    },
    /// Build the context that accompanies the next message
    Context {
        /// Conversation JSON file
        conversation: PathBuf,
        /// Recent-message window (overrides CHAT_CONTEXT_WINDOW)
        #[arg(short, long)]
        window: Option<usize>,
        /// Also assemble the request and upstream turns for this message
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Build the summary-regeneration prompt for a completed exchange
    SummaryPrompt {
        /// Conversation JSON file, as it was before the exchange
        conversation: PathBuf,
        /// User message of the exchange
        #[arg(long)]
        user: String,
        /// Assistant reply of the exchange
        #[arg(long)]
        assistant: String,
    },
    /// Show statistics about a conversation
    Stats {
        /// Conversation JSON file
        conversation: PathBuf,
    },
}

#[derive(Serialize)]
struct ClassifyReport {
    format: ContentFormat,
    summary: String,
    parsed: ParsedContent,
}

#[derive(Serialize)]
struct RequestReport {
    request: ChatRequest,
    turns: Vec<UpstreamTurn>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryPromptReport {
    /// Message count to record with the new summary, absent when no refresh is due
    due_at: Option<usize>,
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConversationStats {
    conversation_id: String,
    title: String,
    total_messages: usize,
    context_messages: usize,
    error_messages: usize,
    user_messages: usize,
    assistant_messages: usize,
    formats: BTreeMap<ContentFormat, usize>,
    languages: Vec<String>,
    last_summary_at: usize,
    summary_due: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(command) => {
            let config = ContextConfig::from_env().context("Invalid context configuration")?;
            let output = execute(command, &config)?;
            println!("{}", output);
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

/// Run one command and return its JSON output
pub fn execute(command: Commands, config: &ContextConfig) -> Result<String> {
    match command {
        Commands::Parse { file } => {
            let text = read_input(Some(file.as_path()))?;
            to_json(&parse_markdown(&text))
        }
        Commands::Classify { file } => {
            let text = read_input(Some(file.as_path()))?;
            let (parsed, format) = analyze_content(&text);
            let summary = get_content_summary(&parsed);
            to_json(&ClassifyReport { format, summary, parsed })
        }
        Commands::Context { conversation, window, message } => {
            let conversation = load_conversation(&conversation)?;
            let context = build_context(&conversation, window.unwrap_or(config.context_window));
            match message {
                Some(message) => {
                    let turns = build_upstream_turns(&context, &message);
                    to_json(&RequestReport { request: ChatRequest::new(message, context), turns })
                }
                None => to_json(&context),
            }
        }
        Commands::SummaryPrompt { conversation, user, assistant } => {
            let conversation = load_conversation(&conversation)?;
            let context = build_context(&conversation, config.context_window);
            let policy = config.summary_policy();
            to_json(&SummaryPromptReport {
                due_at: policy.refresh_due(&context),
                prompt: policy.build_prompt(&context, &user, &assistant),
            })
        }
        Commands::Stats { conversation } => {
            let conversation = load_conversation(&conversation)?;
            to_json(&conversation_stats(&conversation, config))
        }
    }
}

fn conversation_stats(conversation: &Conversation, config: &ContextConfig) -> ConversationStats {
    let messages = &conversation.messages;
    let replies: Vec<&Message> =
        messages.iter().filter(|m| m.role == MessageRole::Assistant && !m.is_error).collect();

    // Classification is pure, so replies are analyzed in parallel
    let analyzed: Vec<(ParsedContent, ContentFormat)> =
        replies.par_iter().map(|m| analyze_content(&m.content)).collect();

    let mut formats = BTreeMap::new();
    let mut languages: Vec<String> = Vec::new();
    for (parsed, format) in &analyzed {
        *formats.entry(*format).or_insert(0) += 1;
        for language in &parsed.languages {
            if !languages.contains(language) {
                languages.push(language.clone());
            }
        }
    }

    let context_messages = messages.iter().filter(|m| !m.is_error).count();
    let user_messages = messages.iter().filter(|m| m.role == MessageRole::User).count();
    let error_messages = messages.len() - context_messages;

    let last_summary_at = conversation.summary.as_ref().map_or(0, |s| s.message_count_at_update);
    debug!(
        conversation_id = %conversation.id,
        replies = replies.len(),
        "computed conversation stats"
    );

    ConversationStats {
        conversation_id: conversation.id.clone(),
        title: conversation.title.clone(),
        total_messages: messages.len(),
        context_messages,
        error_messages,
        user_messages,
        assistant_messages: messages.len() - user_messages,
        formats,
        languages,
        last_summary_at,
        summary_due: config.summary_policy().should_update(context_messages, last_summary_at),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::Value;
    use tempfile::NamedTempFile;

    use super::*;

    const CONVERSATION: &str = r#"{
        "id": "c1",
        "title": "Rust",
        "messages": [
            {"id": "1", "role": "user", "content": "show json", "status": "complete", "timestamp": 1},
            {"id": "2", "role": "assistant", "content": "```json\n{\"a\": 1}\n```", "status": "complete", "timestamp": 2},
            {"id": "3", "role": "user", "content": "and python", "status": "complete", "timestamp": 3},
            {"id": "4", "role": "assistant", "content": "```python\nprint(1)\n```", "status": "complete", "timestamp": 4},
            {"id": "5", "role": "assistant", "content": "Network error", "status": "error", "timestamp": 5, "isError": true}
        ],
        "createdAt": 1,
        "updatedAt": 5
    }"#;

    fn temp_file(content: &str) -> NamedTempFile {
        let mut temp = NamedTempFile::new().unwrap();
        write!(temp, "{}", content).unwrap();
        temp
    }

    fn run_json(command: Commands) -> Value {
        let output = execute(command, &ContextConfig::default()).unwrap();
        serde_json::from_str(&output).unwrap()
    }

    #[test]
    fn test_parse_command() {
        let file = temp_file("# Title\n\nBody");
        let value = run_json(Commands::Parse { file: file.path().to_path_buf() });
        assert_eq!(value[0]["type"], "heading");
        assert_eq!(value[1]["type"], "paragraph");
    }

    #[test]
    fn test_classify_command() {
        let file = temp_file("| A | B |\n|---|---|\n| 1 | 2 |");
        let value = run_json(Commands::Classify { file: file.path().to_path_buf() });
        assert_eq!(value["format"], "table");
        assert_eq!(value["summary"], "table");
        assert_eq!(value["parsed"]["hasTable"], true);
    }

    #[test]
    fn test_context_command_with_window() {
        let file = temp_file(CONVERSATION);
        let value = run_json(Commands::Context {
            conversation: file.path().to_path_buf(),
            window: Some(2),
            message: None,
        });
        assert_eq!(value["meta"]["totalMessageCount"], 4);
        assert_eq!(value["relevantMessages"].as_array().unwrap().len(), 2);
        assert_eq!(value["relevantMessages"][0]["content"], "and python");
    }

    #[test]
    fn test_context_command_with_message() {
        let file = temp_file(CONVERSATION);
        let value = run_json(Commands::Context {
            conversation: file.path().to_path_buf(),
            window: None,
            message: Some("next".into()),
        });
        assert_eq!(value["request"]["message"], "next");
        assert_eq!(value["turns"].as_array().unwrap().len(), 5);
        assert_eq!(value["turns"][1]["role"], "model");
    }

    #[test]
    fn test_summary_prompt_command() {
        let file = temp_file(CONVERSATION);
        let value = run_json(Commands::SummaryPrompt {
            conversation: file.path().to_path_buf(),
            user: "q".into(),
            assistant: "a".into(),
        });
        assert_eq!(value["dueAt"], 6);
        assert!(value["prompt"].as_str().unwrap().ends_with("User: q\n\nAssistant: a\n\nSummary:"));
    }

    #[test]
    fn test_stats_command() {
        let file = temp_file(CONVERSATION);
        let value = run_json(Commands::Stats { conversation: file.path().to_path_buf() });
        assert_eq!(value["totalMessages"], 5);
        assert_eq!(value["contextMessages"], 4);
        assert_eq!(value["errorMessages"], 1);
        assert_eq!(value["userMessages"], 2);
        assert_eq!(value["assistantMessages"], 3);
        assert_eq!(value["formats"]["json"], 1);
        assert_eq!(value["formats"]["text"], 1);
        assert_eq!(value["languages"], serde_json::json!(["json", "python"]));
        assert_eq!(value["summaryDue"], false);
    }

    #[test]
    fn test_missing_conversation_file() {
        let result = execute(
            Commands::Stats { conversation: PathBuf::from("/no/such/conversation.json") },
            &ContextConfig::default(),
        );
        assert!(result.is_err());
    }
}
