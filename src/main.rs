use clap::Parser;
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use std::time::Duration;

use selenium_mcp::config::Config;
use selenium_mcp::server::SeleniumMcpServer;

/// selenium-mcp: Browser automation over Selenium WebDriver
#[derive(Parser)]
#[command(name = "selenium-mcp", version, about)]
struct Cli {
    /// WebDriver endpoint to connect to (overrides WEBDRIVER_URL)
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Skip the startup reachability check of the WebDriver endpoint
    #[arg(long)]
    skip_probe: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(url) = cli.webdriver_url {
        config.webdriver_url = url;
    }

    // Log to stderr only — stdout is the MCP transport. Config already
    // layers SELENIUM_MCP_LOG over RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .init();

    if config.unbuffered {
        // Transport writes are flushed per message; the flag is accepted
        // so wrapper scripts don't have to special-case this server.
        tracing::debug!("Unbuffered output requested");
    }

    if !cli.skip_probe && !endpoint_reachable(&config.webdriver_url).await {
        anyhow::bail!(
            "WebDriver endpoint {} is not reachable. Start a driver (chromedriver, \
             geckodriver, or a Selenium server) or pass --skip-probe.",
            config.webdriver_url
        );
    }

    tracing::info!(
        "Starting selenium-mcp server (webdriver: {})",
        config.webdriver_url
    );

    let server = SeleniumMcpServer::new(&config);
    let service = server.clone().serve(stdio()).await?;

    // Wait for MCP service to finish OR a termination signal — whichever comes first
    tokio::select! {
        result = service.waiting() => { result?; }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received interrupt signal, shutting down");
        }
    }

    // Always close any browsers left open before exiting
    server.shutdown().await;

    tracing::info!("selenium-mcp server shut down");
    Ok(())
}

/// TCP-level probe of the WebDriver endpoint. A connect within the timeout is
/// enough; session negotiation happens later in `start_browser`.
async fn endpoint_reachable(webdriver_url: &str) -> bool {
    let Some(addr) = probe_addr(webdriver_url) else {
        tracing::warn!("Cannot parse host from {}, skipping probe", webdriver_url);
        return true;
    };
    matches!(
        tokio::time::timeout(Duration::from_secs(2), tokio::net::TcpStream::connect(&addr)).await,
        Ok(Ok(_))
    )
}

fn probe_addr(webdriver_url: &str) -> Option<String> {
    let (rest, default_port) = if let Some(rest) = webdriver_url.strip_prefix("http://") {
        (rest, 80)
    } else if let Some(rest) = webdriver_url.strip_prefix("https://") {
        (rest, 443)
    } else {
        return None;
    };
    let authority = rest.split('/').next()?;
    if authority.is_empty() {
        return None;
    }
    if authority.contains(':') {
        Some(authority.to_string())
    } else {
        Some(format!("{authority}:{default_port}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_addr_extracts_host_and_port() {
        assert_eq!(
            probe_addr("http://localhost:4444").as_deref(),
            Some("localhost:4444")
        );
        assert_eq!(
            probe_addr("http://127.0.0.1:9515/wd/hub").as_deref(),
            Some("127.0.0.1:9515")
        );
        assert_eq!(probe_addr("localhost:4444"), None);
    }

    #[test]
    fn probe_addr_defaults_to_scheme_port() {
        assert_eq!(
            probe_addr("http://grid.internal/wd/hub").as_deref(),
            Some("grid.internal:80")
        );
        assert_eq!(
            probe_addr("https://grid.internal/wd/hub").as_deref(),
            Some("grid.internal:443")
        );
        assert_eq!(
            probe_addr("https://grid.internal:4444").as_deref(),
            Some("grid.internal:4444")
        );
    }
}
