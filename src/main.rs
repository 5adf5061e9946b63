use anyhow::Result;
use clap::Parser;
use colored::*;
use std::sync::Arc;

// Import from our modular crates
use medrag_cli::{
    AnswerExplainer, QueryRouter, display_banner, interpret, read_question, render_result,
};
use medrag_core::{ChatLlm, DocumentStore, Embedder};
use medrag_deepseek::DeepSeekClient;
use medrag_store::{FastEmbedder, MemoryStore, MongoConfig, MongoStore, SAMPLE_SUMMARIES, ToolKit};

#[derive(Parser)]
#[command(name = "medrag")]
#[command(about = "AI-powered hospital records assistant", long_about = None)]
struct Cli {
    /// Answer a single question and exit
    #[arg(short, long)]
    question: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Initialize components
    let llm = Arc::new(DeepSeekClient::from_env()?);
    let embedder = Arc::new(FastEmbedder::from_env()?);

    let store: Arc<dyn DocumentStore> = match MongoConfig::from_env() {
        Ok(config) => {
            let store = MongoStore::connect(&config).await?;
            println!("{} Connected to the document store", "✅".green());
            Arc::new(store)
        }
        Err(e) => {
            println!(
                "{} {}. Continuing with built-in sample data.",
                "⚠️".yellow(),
                e
            );
            let store = MemoryStore::with_sample_patients();
            for summary in SAMPLE_SUMMARIES {
                store.insert_summary(*summary, embedder.embed(summary)?)?;
            }
            Arc::new(store)
        }
    };

    let toolkit = ToolKit::new(embedder.clone(), store);
    let router = QueryRouter::new(llm.clone());
    let explainer = AnswerExplainer::new(llm.clone());

    // Handle one-shot question
    if let Some(question) = cli.question {
        run_turn(&question, &router, &toolkit, &explainer).await;
        return Ok(());
    }

    // Interactive mode
    display_banner();

    let mut history = Vec::new();

    loop {
        let Some(question) = read_question(&mut history).await? else {
            println!("{}", "👋 Goodbye!".green());
            break;
        };

        if question.is_empty() {
            continue;
        }

        run_turn(&question, &router, &toolkit, &explainer).await;
    }

    Ok(())
}

/// One question end to end: route, execute, explain
///
/// A failed step reports and ends the turn; the loop carries on with the
/// next question.
async fn run_turn<L: ChatLlm>(
    question: &str,
    router: &QueryRouter<L>,
    toolkit: &ToolKit,
    explainer: &AnswerExplainer<L>,
) {
    let raw_decision = match router.route(question).await {
        Ok(raw) => raw,
        Err(e) => {
            println!("{} Routing failed: {}", "❌".red(), e);
            return;
        }
    };
    println!("\n{} {}", "[Router Decision]:".cyan(), raw_decision);

    let call = interpret(&raw_decision);
    if call.is_none() {
        println!("{}", "(could not interpret the routing decision)".dimmed());
    }

    let output = match &call {
        Some(call) => match toolkit.dispatch(call).await {
            Ok(output) => output,
            Err(e) => {
                println!("{} Tool execution failed: {}", "❌".red(), e);
                return;
            }
        },
        None => None,
    };

    let rendered = render_result(output.as_ref()).unwrap_or_else(|_| "null".to_string());
    println!("\n{} {}", "[Tool Output]:".cyan(), rendered);

    match explainer.explain(question, output.as_ref()).await {
        Ok(answer) => {
            println!("\n{}", "=== FINAL ANSWER ===".bold());
            println!("\n{}", answer);
        }
        Err(e) => println!("{} Explanation failed: {}", "❌".red(), e),
    }
}
