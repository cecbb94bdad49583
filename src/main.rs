//! docbench - Long-context multi-document comparison across LLM providers
//!
//! Loads a directory of PDFs, asks every selected model the same question
//! about them, and prints cost, latency and token usage side by side.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docbench::balance;
use docbench::config::{Config, KeySource, DEFAULT_CONFIG_PATH};
use docbench::documents::load_documents;
use docbench::models::{ModelFactory, ModelId, Provider, PRICING};
use docbench::report::ComparisonReport;
use docbench::dispatch::{sample_question, SAMPLE_QUESTIONS};
use docbench::Dispatcher;

#[derive(Parser)]
#[command(name = "docbench")]
#[command(about = "Compare LLM providers on questions over a set of PDF documents")]
#[command(version)]
struct Cli {
    /// Path to configuration file (optional; defaults apply when missing)
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the selected models a question about the documents
    Query {
        /// Question to ask
        #[arg(short, long, required_unless_present = "sample", conflicts_with = "sample")]
        question: Option<String>,

        /// Ask a preset question by number (see `questions`)
        #[arg(short, long)]
        sample: Option<usize>,

        /// Documents directory (overrides config)
        #[arg(short, long)]
        docs: Option<PathBuf>,

        /// Model to query; repeat to compare several (default: all)
        #[arg(short, long = "model")]
        models: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load the documents and report their size
    Load {
        /// Documents directory (overrides config)
        #[arg(short, long)]
        docs: Option<PathBuf>,
    },

    /// Show models and their prices
    Models,

    /// List the preset sample questions
    Questions,

    /// Check the DeepSeek account balance
    Balance,
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("docbench={}", level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn report_key_sources(key_sources: &[(Provider, KeySource)]) {
    for (provider, source) in key_sources {
        match source {
            KeySource::None => tracing::warn!(
                provider = %provider,
                var = provider.env_var(),
                "No API key configured; queries to this provider will fail"
            ),
            source => tracing::debug!(provider = %provider, source = %source, "API key resolved"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; variables may come from the shell.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let (config, key_sources) = Config::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    init_tracing(&config.logging.level);
    report_key_sources(&key_sources);

    match cli.command {
        Commands::Query {
            question,
            sample,
            docs,
            models,
            json,
        } => {
            let question = match (question, sample) {
                (Some(question), _) => question,
                (None, Some(index)) => sample_question(index)?.to_string(),
                (None, None) => String::new(),
            };
            if question.trim().is_empty() {
                anyhow::bail!("Please enter a question");
            }
            let models: Vec<ModelId> = if models.is_empty() {
                ModelId::ALL.to_vec()
            } else {
                models
                    .iter()
                    .map(|m| m.parse::<ModelId>())
                    .collect::<Result<_, _>>()?
            };

            let dir = docs.unwrap_or_else(|| PathBuf::from(&config.documents.dir));
            let loaded = load_documents(&dir)?;
            if loaded.document_names.is_empty() {
                tracing::warn!(dir = %dir.display(), "No PDF documents found; querying with empty context");
            }

            let dispatcher = Dispatcher::new(ModelFactory::new(config)?);
            let results = dispatcher.compare(&models, &loaded.context, &question).await;
            let failed = results.iter().filter(|r| r.is_error()).count();
            if failed > 0 {
                tracing::warn!(failed, total = results.len(), "Some model queries failed");
            }
            let report = ComparisonReport::new(question, results);

            if json {
                println!("{}", report.to_json()?);
            } else {
                print!("{}", report.render_text());
            }
            Ok(())
        }

        Commands::Load { docs } => {
            let dir = docs.unwrap_or_else(|| PathBuf::from(&config.documents.dir));
            let loaded = load_documents(&dir)?;
            println!("Loaded {} documents", loaded.document_names.len());
            println!("Total Tokens: {}", loaded.token_count);
            for name in &loaded.document_names {
                println!("  - {}", name);
            }
            Ok(())
        }

        Commands::Models => {
            println!(
                "{:<28}  {:<24}  {:>10}  {:>11}",
                "Model", "Name", "Input $/M", "Output $/M"
            );
            for entry in &PRICING {
                println!(
                    "{:<28}  {:<24}  {:>10.2}  {:>11.2}",
                    entry.model_id.as_str(),
                    entry.display_name,
                    entry.input_price_per_million,
                    entry.output_price_per_million
                );
            }
            Ok(())
        }

        Commands::Questions => {
            for (i, question) in SAMPLE_QUESTIONS.iter().enumerate() {
                println!("{}. {}", i + 1, question);
            }
            Ok(())
        }

        Commands::Balance => {
            let info = balance::check_balance(&config).await;
            for line in balance::summary_lines(info.as_ref()) {
                println!("{}", line);
            }
            Ok(())
        }
    }
}
