use wellness_engine::Config;
use wellness_journal_mcp::{WellnessMcpHandler, logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_level = logging::log_level_from_env();
    logging::init(&log_level);
    tracing::info!("wellness_journal_mcp: log filter: {}", log_level);

    let config = Config::from_env()?;
    let store = wellness_engine::store::from_config(&config);
    let handler = WellnessMcpHandler::from_config(store, &config);

    tracing::info!(
        backend = ?config.backend,
        store_dir = %config.store_dir.display(),
        sealed_by_default = config.access_key.is_some(),
        "wellness_journal_mcp: registered {} tools and {} prompts",
        handler.tool_count(),
        handler.prompt_count()
    );

    tracing::info!("wellness_journal_mcp: starting stdio MCP server...");

    use rmcp::serve_server;
    let transport = (tokio::io::stdin(), tokio::io::stdout());
    let server = serve_server(handler, transport).await?;

    tracing::info!("wellness_journal_mcp: service initialized as server");

    server.waiting().await?;

    Ok(())
}
