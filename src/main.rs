use clap::Parser;
use clap::Subcommand;
use hajjrag::api::serve_api;
use hajjrag::config::AppConfig;
use hajjrag::llm::prompts;
use hajjrag::llm::GatewayClient;
use hajjrag::llm::IntentClassifier;
use hajjrag::models::ChatMessage;
use hajjrag::rag::ContextAssembler;
use hajjrag::rag::RagService;
use hajjrag::rag::NO_MATCH_MESSAGE;
use hajjrag::Result;
use tracing::info;
use tracing::warn;

#[derive(Parser)]
#[command(name = "hajjrag")]
#[command(about = "Hajj guidance assistant with keyword-based knowledge retrieval")]
#[command(version)]
struct Cli {
    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to (overrides [server] host)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to (overrides [server] port)
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable CORS even if the configuration disables it
        #[arg(long)]
        cors: bool,
    },
    /// Ask a question and answer it through the AI gateway
    Ask {
        /// The question to ask
        question: String,
        /// Skip knowledge retrieval and ask the model directly
        #[arg(long)]
        no_rag: bool,
    },
    /// Search the knowledge base
    Search {
        /// Search term
        query: String,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Classify the intent of a pilgrim message
    Classify {
        /// The message to classify
        message: String,
    },
    /// List the loaded knowledge corpus
    Knowledge,
    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        hajjrag::logging::init_logging_with_level("debug")?;
    } else {
        hajjrag::logging::init_logging()?;
    }

    // Load configuration
    let config = AppConfig::load()?;
    info!("Configuration loaded successfully");

    // Execute the requested command
    match cli.command {
        Commands::Serve { host, port, cors } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let cors = cors || config.cors_enabled();
            serve_api(&config, host, port, cors).await?;
        }
        Commands::Ask { question, no_rag } => {
            handle_ask_command(&config, question, no_rag).await?;
        }
        Commands::Search { query, limit } => {
            handle_search_command(&config, query, limit).await?;
        }
        Commands::Classify { message } => {
            handle_classify_command(&config, message).await?;
        }
        Commands::Knowledge => {
            handle_knowledge_command(&config).await?;
        }
        Commands::Config => {
            handle_config_command(&config)?;
        }
    }

    Ok(())
}

async fn handle_ask_command(config: &AppConfig, question: String, no_rag: bool) -> Result<()> {
    let gateway = GatewayClient::from_config(config)?;

    let mut sources = Vec::new();
    let user_prompt = if no_rag {
        question.clone()
    } else {
        let rag = RagService::from_config(config).await?;
        sources = match rag.search(&question).await {
            Ok(items) => items,
            Err(e) => {
                warn!("Knowledge retrieval failed, continuing without context: {}", e);
                Vec::new()
            }
        };
        let context = if sources.is_empty() {
            NO_MATCH_MESSAGE.to_string()
        } else {
            ContextAssembler::new().assemble(&sources)
        };
        prompts::build_ask_prompt(&question, &context)
    };

    println!("🕋 Asking {}...", gateway.model());
    println!();

    let messages = vec![
        ChatMessage::system(prompts::build_system_prompt(None)),
        ChatMessage::user(user_prompt),
    ];
    let answer = gateway.complete(&messages).await?;

    println!("{}", answer);

    if !sources.is_empty() {
        println!();
        println!("📚 Sources:");
        for item in &sources {
            println!("  - {} [{}]", item.title, item.category);
        }
    }

    Ok(())
}

async fn handle_search_command(
    config: &AppConfig,
    query: String,
    limit: Option<usize>,
) -> Result<()> {
    println!("🔍 Searching knowledge base for: \"{}\"", query);
    println!();

    let mut config = config.clone();
    if let Some(limit) = limit {
        config.retrieval.limit = limit;
    }

    let rag = RagService::from_config(&config).await?;
    let results = rag.search(&query).await?;

    println!("Found {} results:", results.len());
    for (i, item) in results.iter().enumerate() {
        println!();
        println!("  {}. {} [{}]", i + 1, item.title, item.category);
        println!("     {}", truncate_str(&item.content, 160));
    }

    Ok(())
}

async fn handle_classify_command(config: &AppConfig, message: String) -> Result<()> {
    println!("🧭 Classifying: \"{}\"", message);
    println!();

    let classifier = IntentClassifier::from_config(config);
    let classification = classifier.classify_intent(&message).await;

    println!("Intent scores:");
    for scored in &classification.labels {
        println!("  {:<20} {:.3}", scored.label, scored.score);
    }
    if let Some(top) = classification.top() {
        println!();
        println!("Top intent: {} ({:.3})", top.label, top.score);
    }

    Ok(())
}

async fn handle_knowledge_command(config: &AppConfig) -> Result<()> {
    let rag = RagService::from_config(config).await?;
    let items = rag.list_knowledge().await?;

    println!("📚 Knowledge base ({} items):", items.len());
    for item in &items {
        println!();
        println!("  {} [{}]", item.title, item.category);
        println!("  id: {} | keywords: {}", item.id, item.keywords.join(", "));
        println!("  {}", truncate_str(&item.content, 160));
    }

    Ok(())
}

fn handle_config_command(config: &AppConfig) -> Result<()> {
    println!("📋 HajjRAG Configuration:");
    println!();

    println!("🌐 Server:");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);
    println!("  CORS: {}", config.cors_enabled());
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Backtrace: {}", config.logging.backtrace);
    println!();

    println!("🔎 Retrieval:");
    println!("  Backend: {:?}", config.retrieval_backend());
    println!("  Limit: {}", config.retrieval_limit());
    println!(
        "  Weights: keyword={} title={} content={}",
        config.retrieval.keyword_weight,
        config.retrieval.title_weight,
        config.retrieval.content_weight
    );
    println!("  Min token length: {}", config.retrieval.min_token_len);
    println!("  Datastore limit: {}", config.datastore_limit());
    println!();

    println!("🗄️  Database:");
    match config.database_url() {
        Some(url) => println!("  URL: {}", mask_database_url(url)),
        None => println!("  URL: (not configured)"),
    }
    println!();

    println!("🤖 LLM Gateway:");
    println!("  Endpoint: {}", config.llm_endpoint());
    println!("  Model: {}", config.llm_model());
    println!(
        "  API key: {}",
        if config.llm_api_key().is_some() {
            "configured"
        } else {
            "not set"
        }
    );
    println!();

    println!("🏷️  Intent:");
    println!("  Endpoint: {}", config.intent.endpoint);
    println!("  Model: {}", config.intent.model);
    println!(
        "  API key: {}",
        if config.intent_api_key().is_some() {
            "configured"
        } else {
            "mock mode"
        }
    );

    Ok(())
}

/// Mask database URL for display (hide password)
fn mask_database_url(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        if let Some(host) = parsed.host_str() {
            format!(
                "{}://{}@{}:{}",
                parsed.scheme(),
                parsed.username(),
                host,
                parsed.port().unwrap_or(5432)
            )
        } else {
            "***masked***".to_string()
        }
    } else {
        "***invalid***".to_string()
    }
}

/// Truncated string with "..." suffix if truncated, otherwise the original string
fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}
