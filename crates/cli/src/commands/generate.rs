//! `copymill generate` — Run the three-stage pipeline.

use copymill_config::AppConfig;
use copymill_core::{Channel, NewContentRecord, PipelineState, Provider, Retriever};
use copymill_pipeline::{Orchestrator, PipelineEvent};
use copymill_providers::OpenAiCompatProvider;
use copymill_retrieval::VectorRetriever;
use std::sync::Arc;
use tracing::warn;

pub struct GenerateArgs {
    pub business: String,
    pub features: String,
    pub customer: String,
    pub channel: Channel,
    pub tone: String,
    pub no_rag: bool,
    pub show_stages: bool,
}

pub async fn run(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // No credentials, no run
    if let Err(e) = config.validate_credentials() {
        eprintln!();
        eprintln!("  ERROR: {e}");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    COPYMILL_API_KEY='sk-...'   (highest priority)");
        eprintln!("    OPENAI_API_KEY='sk-...'");
        eprintln!();
        eprintln!("  Or add api_key to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let api_key = config.api_key.clone().unwrap_or_default();
    let provider: Arc<dyn Provider> = Arc::new(
        OpenAiCompatProvider::new("openai", config.api_url.clone(), api_key)
            .map_err(|e| format!("Failed to build provider: {e}"))?,
    );

    // Retrieval is best-effort: a failed seed degrades to a plain run
    let retriever: Option<Arc<dyn Retriever>> = if config.enable_rag && !args.no_rag {
        match VectorRetriever::seed(provider.clone(), &config.embedding_model).await {
            Ok(r) => Some(Arc::new(r)),
            Err(e) => {
                warn!(error = %e, "Retrieval setup failed, continuing without RAG");
                None
            }
        }
    } else {
        None
    };

    let orchestrator = Orchestrator::new(provider, retriever, &config.model)
        .with_temperature(config.temperature);
    let state = PipelineState::new(
        &args.business,
        &args.features,
        &args.customer,
        args.channel,
        &args.tone,
    );

    println!();
    println!("  Generating {} copy for {} ...", args.channel, args.business);
    println!();

    let mut rx = orchestrator.run_streaming(state, None);
    let mut final_state: Option<PipelineState> = None;

    while let Some(event) = rx.recv().await {
        match event {
            PipelineEvent::StageCompleted { role, output, .. } => {
                println!("  [done] {}", role.label());
                if args.show_stages {
                    println!();
                    for line in output.lines() {
                        println!("    {line}");
                    }
                    println!();
                }
            }
            PipelineEvent::Completed { state } => final_state = Some(state),
            PipelineEvent::Failed { message } => {
                return Err(format!("Pipeline failed: {message}").into());
            }
        }
    }

    let state = final_state.ok_or("Pipeline ended without a result")?;
    let final_content = state.final_content.clone().ok_or("Run produced no final content")?;

    println!();
    println!("  ── Final copy ──────────────────────────────");
    println!();
    for line in final_content.lines() {
        println!("  {line}");
    }
    println!();

    // A save failure must not hide the content the user already has
    match super::open_history_store(&config).await {
        Ok(store) => match store.save(NewContentRecord::from_state(&state)).await {
            Ok(id) => println!("  Saved to history as #{id}"),
            Err(e) => eprintln!("  WARNING: content was generated but could not be saved: {e}"),
        },
        Err(e) => eprintln!("  WARNING: content was generated but history is unavailable: {e}"),
    }

    Ok(())
}
