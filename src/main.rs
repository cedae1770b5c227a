use anyhow::{Context, Result};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use toolbridge::{
    bridge::catalog,
    cli::{output::Output, Cli, Commands},
    llm::LLMClient,
    mcp::{start_http_server, start_stdio_server},
    BridgeConfig, ConversationTurn, McpConnector, ToolBridge, TransportConnector,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match run(&cli, &output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, output: &Output) -> Result<()> {
    let config = BridgeConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config, cli.verbose);

    match cli.command() {
        Commands::Serve { stdio, bind } => {
            let client = config
                .search
                .client()
                .context("Search server needs a Tavily API key")?;
            if *stdio {
                start_stdio_server(client).await?;
            } else {
                start_http_server(client, *bind).await?;
            }
        }
        Commands::Tools => {
            let connector = connector(&config)?;
            list_tools(&connector, output).await?;
        }
        Commands::Ask { query } => {
            let bridge = bridge(&config)?;
            let reply = bridge.respond(&query.join(" ")).await;
            println!("{}", reply);
        }
        Commands::Chat => {
            let bridge = bridge(&config)?;
            output.banner(&config.mcp.target()?.to_string(), &config.llm.model);
            run_repl(&bridge, output).await?;
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout belongs to the REPL or the stdio MCP stream
fn init_tracing(config: &BridgeConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,toolbridge=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("warn,toolbridge={}", config.log_level)))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn connector(config: &BridgeConfig) -> Result<McpConnector> {
    Ok(McpConnector::new(config.mcp.target()?, config.mcp.timeout()))
}

fn bridge(config: &BridgeConfig) -> Result<ToolBridge> {
    let provider = config.llm.provider()?;
    let llm: Arc<dyn LLMClient> = Arc::from(provider.create_client()?);
    tracing::info!(provider = provider.name(), model = llm.model_name(), "Language model ready");
    Ok(ToolBridge::new(llm, Arc::new(connector(config)?)))
}

async fn list_tools(connector: &McpConnector, output: &Output) -> Result<()> {
    let catalog = catalog::load(connector)
        .await
        .with_context(|| format!("Could not connect to {}", connector.target()))?;

    if catalog.is_empty() {
        output.warning("The MCP server offers no tools");
        return Ok(());
    }

    output.header(&format!("Tools on {}", connector.target()));
    output.tools(&catalog);
    output.newline();
    Ok(())
}

async fn run_repl(bridge: &ToolBridge, output: &Output) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut history: Vec<ConversationTurn> = Vec::new();

    loop {
        output.prompt();
        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            output.newline();
            break;
        };

        let message = line.trim();
        match message {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                history.clear();
                output.info("Conversation cleared");
                continue;
            }
            _ => {}
        }

        let (reply, updated) = bridge.chat(message, history).await;
        history = updated;
        output.reply(&reply);
    }

    output.success(&format!("Goodbye ({} messages)", history.len()));
    Ok(())
}
