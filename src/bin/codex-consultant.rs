//! codex-consultant -- standalone MCP server wrapping the Codex CLI.
//!
//! Usage: codex-consultant [--workspace <path>] [--codex-bin <name>] [--timeout <secs>]

use codex_consultant::server::McpServerConfig;

fn main() -> anyhow::Result<()> {
    // Initialize tracing to stderr so it does not interfere with MCP stdio.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let workspace = flag_value("--workspace").unwrap_or_else(|| ".".to_owned());
    let workspace = std::path::Path::new(&workspace).canonicalize()?;

    let mut config = McpServerConfig {
        workspace,
        ..McpServerConfig::default()
    };
    if let Some(bin) = flag_value("--codex-bin") {
        config.codex_bin = bin;
    }
    if let Some(secs) = flag_value("--timeout") {
        config.exec_timeout_secs = secs.parse()?;
    }

    // Fail-fast precondition: refuse to serve if codex is not invocable.
    if let Err(e) = config.codex_client().verify() {
        eprintln!("Codex CLI validation failed: {e}");
        eprintln!(
            "Please ensure the '{}' command is installed and available in PATH",
            config.codex_bin
        );
        std::process::exit(1);
    }

    codex_consultant::run_mcp_server(config)
}

fn flag_value(flag: &str) -> Option<String> {
    std::env::args().skip_while(|a| a != flag).nth(1)
}
