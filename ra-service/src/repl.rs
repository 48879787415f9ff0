//! Interactive chat loop

use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use ra_chat::{ChatSession, ResearchAssistant, EXAMPLE_QUESTIONS};

const HELP: &str = "Commands:
  /web       toggle web search
  /files     toggle vector store search
  /clear     clear the conversation
  /examples  show example questions
  /help      show this help
  /quit      exit";

/// Parsed input line
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Ask(&'a str),
    ToggleWeb,
    ToggleFiles,
    Clear,
    Examples,
    Help,
    Quit,
    Unknown(&'a str),
    Empty,
}

fn parse(line: &str) -> Command<'_> {
    let line = line.trim();
    match line {
        "" => Command::Empty,
        "/web" => Command::ToggleWeb,
        "/files" => Command::ToggleFiles,
        "/clear" => Command::Clear,
        "/examples" => Command::Examples,
        "/help" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        other if other.starts_with('/') => Command::Unknown(other),
        question => Command::Ask(question),
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

fn print_status(session: &ChatSession, assistant: &ResearchAssistant) {
    let sources = session.sources();
    let web = if sources.web_search && !assistant.web_search_available() {
        "on (unavailable: no search key)"
    } else {
        on_off(sources.web_search)
    };
    println!("Sources: web search {}, vector store {}", web, on_off(sources.file_search));
    if !sources.any() {
        println!("Warning: no search source selected. Use /web or /files.");
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

/// Read questions from stdin until EOF or `/quit`
pub async fn run(assistant: &ResearchAssistant, session: &mut ChatSession) -> Result<()> {
    println!("Research Assistant. Type /help for commands.");
    print_status(session, assistant);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        match parse(&line) {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::Examples => {
                for example in EXAMPLE_QUESTIONS {
                    println!("  {}", example);
                }
            }
            Command::Clear => {
                session.clear();
                println!("Conversation cleared.");
            }
            Command::ToggleWeb => {
                session.toggle_web_search();
                print_status(session, assistant);
            }
            Command::ToggleFiles => {
                session.toggle_file_search();
                print_status(session, assistant);
            }
            Command::Unknown(command) => println!("Unknown command {}. Type /help.", command),
            Command::Ask(question) => {
                let response = session.ask(assistant, question).await;
                println!("\n{}\n", response);
            }
        }
        prompt()?;
    }

    Ok(())
}
