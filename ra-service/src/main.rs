//! Research Assistant
//!
//! Command-line front end for the research assistant:
//! - One-shot mode (`--question`)
//! - Interactive chat with source toggles

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

use ra_chat::{ChatSession, ResearchAssistant, SearchSources};
use ra_core::config::{load_environment, try_load_env_file};
use ra_core::AgentConfig;

mod repl;

#[derive(Parser, Debug)]
#[command(name = "research-assistant")]
#[command(about = "Ask questions answered from your documents and the web")]
struct Args {
    /// Ask a single question and exit
    #[arg(short, long)]
    question: Option<String>,

    /// Model used when provisioning assistants
    #[arg(long)]
    model: Option<String>,

    /// Start with web search deselected
    #[arg(long)]
    no_web_search: bool,

    /// Start with vector store search deselected
    #[arg(long)]
    no_file_search: bool,

    /// Milliseconds between run status polls
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Polls allowed before a run is abandoned
    #[arg(long)]
    max_polls: Option<u32>,

    /// Environment file to load instead of the default locations
    #[arg(long)]
    env_file: Option<PathBuf>,
}

impl Args {
    fn apply(&self, config: &mut AgentConfig) {
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(ms) = self.poll_interval_ms {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(n) = self.max_polls {
            config.max_poll_iterations = n.max(1);
        }
    }

    fn sources(&self) -> SearchSources {
        SearchSources {
            web_search: !self.no_web_search,
            file_search: !self.no_file_search,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let env_file = match &args.env_file {
        Some(path) => try_load_env_file(&path.to_string_lossy()),
        None => load_environment(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("research_assistant=info".parse()?)
                .add_directive("ra_chat=info".parse()?)
                .add_directive("ra_llm=info".parse()?)
                .add_directive("ra_tools=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = &env_file {
        info!("Using environment file {}", path);
    }

    let mut config = match AgentConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    args.apply(&mut config);
    info!(
        model = %config.model,
        web_search = config.web_search_available(),
        "Configuration loaded"
    );

    let assistant = ResearchAssistant::from_config(&config);
    let mut session = ChatSession::with_sources(args.sources());

    match &args.question {
        Some(question) => {
            let response = session.ask(&assistant, question).await;
            println!("{}", response);
        }
        None => repl::run(&assistant, &mut session).await?,
    }

    Ok(())
}
