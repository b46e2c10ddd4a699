use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{
    AskOutcome, CommandEffect, DashboardCommand, DashboardSession, HttpDashboardApi, ListPhase,
};
use shared::domain::{FilterSet, PageCursor};
use tokio::io::{stdin, stdout, BufReader};

mod browse;
mod config;
mod render;

#[derive(Parser, Debug)]
#[command(name = "dashboard", about = "Sales representative dashboard client")]
struct Args {
    /// API root, e.g. http://localhost:8000/api
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[arg(long)]
    page_size: Option<u32>,
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Log request lifecycle at info level.
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch one page of sales representatives.
    List {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        role: String,
        #[arg(long, default_value = "")]
        region: String,
        #[arg(long, default_value = "")]
        skills: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Print the raw page as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Ask the AI assistant a question about the sales data.
    Ask {
        #[arg(required = true)]
        question: Vec<String>,
    },
    /// Interactive session reading commands from stdin.
    Browse,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let default_level = if args.verbose { "info" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut settings = config::load_settings(&args.config)?;
    if let Some(url) = args.api_url {
        settings.api_base_url = url;
    }
    if let Some(size) = args.page_size.filter(|size| *size > 0) {
        settings.page_size = size;
    }
    if let Some(timeout) = args.timeout_ms.filter(|ms| *ms > 0) {
        settings.request_timeout_ms = timeout;
    }

    let api = Arc::new(HttpDashboardApi::new(&settings.api_base_url)?);
    let session = DashboardSession::new(api, settings.session_options());

    match args.command {
        Command::List {
            name,
            role,
            region,
            skills,
            page,
            json,
        } => {
            let filters = FilterSet {
                name,
                role,
                region,
                skills,
            };
            let cursor = PageCursor::new(page, settings.page_size);
            session.list().request_list(filters, cursor).await;
            let snapshot = session.snapshot().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot.list.result.items)?);
            } else {
                print!("{}", render::render_list(&snapshot.list, None));
            }
            if snapshot.list.phase == ListPhase::Error {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Ask { question } => {
            let effect = session
                .dispatch(DashboardCommand::Ask(question.join(" ")))
                .await;
            if let Some(panel) = render::render_ai(&session.snapshot().await.ai) {
                print!("{panel}");
            }
            match effect {
                CommandEffect::Ai(AskOutcome::Answered) => {}
                CommandEffect::Ai(AskOutcome::Ignored) => {
                    eprintln!("question is empty");
                    return Ok(ExitCode::FAILURE);
                }
                _ => return Ok(ExitCode::FAILURE),
            }
        }
        Command::Browse => {
            browse::run(&session, BufReader::new(stdin()), stdout()).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
