use crate::config::load_config;
use crate::conversation::ConversationService;
use crate::notify::Notifier;
use crate::plan::MemoryPlanStore;
use crate::providers::strategy::ProviderFactory;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "aarya")]
#[command(about = "Conversational product-plan extraction and knowledge-base QA")]
pub struct Cli {
    /// Path to the config file (defaults to ~/.aarya/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the product-conversation service
    Serve {
        /// Override the listen port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run the knowledge-base QA service
    Qa {
        /// Override the listen port
        #[arg(long)]
        port: Option<u16>,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.gateway.port);
            let factory = ProviderFactory::new(&config);
            let providers = Arc::new(factory.build_tasks(&config.tasks)?);
            let notifier = Notifier::new(
                config.notifications.url.clone(),
                config.notifications.interval_secs,
            );
            let store = Arc::new(MemoryPlanStore::new());

            #[allow(unused_mut)]
            let mut service = ConversationService::new(providers, store, notifier);
            #[cfg(feature = "embeddings")]
            if config.cache.enabled {
                let embedder = Arc::new(crate::kb::Embedder::new()?);
                service = service.with_response_cache(Arc::new(
                    crate::conversation::ResponseCache::new(embedder, config.cache.threshold),
                ));
                tracing::info!("semantic response cache enabled");
            }

            crate::gateway::start(&config.gateway.host, port, Arc::new(service)).await
        }
        Commands::Qa { port } => {
            let port = port.unwrap_or(config.gateway.qa_port);
            run_qa(&config, port).await
        }
    }
}

#[cfg(feature = "embeddings")]
async fn run_qa(config: &crate::config::Config, port: u16) -> Result<()> {
    use crate::kb;

    let kb_config = &config.knowledge_base;
    if kb_config.document_path.is_empty() {
        anyhow::bail!("knowledgeBase.documentPath is not configured");
    }

    let index_path = match &kb_config.index_path {
        Some(path) => PathBuf::from(path),
        None => crate::utils::get_aarya_home()?.join("kb.db"),
    };

    let embedder = Arc::new(kb::Embedder::new()?);
    let index = Arc::new(kb::index::open_or_build(
        &index_path,
        std::path::Path::new(&kb_config.document_path),
        kb_config.chunk_size,
        kb_config.chunk_overlap,
        &embedder,
    )?);

    let factory = ProviderFactory::new(config);
    let provider = factory.create(&config.tasks.general)?;
    let qa = Arc::new(kb::QaService::new(
        index,
        embedder,
        provider,
        kb_config.top_k,
    ));

    crate::gateway::qa::start(&config.gateway.host, port, qa).await
}

#[cfg(not(feature = "embeddings"))]
async fn run_qa(_config: &crate::config::Config, _port: u16) -> Result<()> {
    anyhow::bail!("the qa service requires the 'embeddings' feature")
}
