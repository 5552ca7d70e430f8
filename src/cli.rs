use clap::Parser;
use std::path::PathBuf;

/// Chat backend for the portfolio site
#[derive(Parser, Debug, Clone)]
#[command(name = "portfolio-chat", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "PORTFOLIO_CONFIG", default_value = "portfolio.toml")]
    pub config: PathBuf,

    /// Address to bind
    #[arg(long, env = "PORTFOLIO_HOST")]
    pub host: Option<String>,

    #[arg(long, env = "PORTFOLIO_PORT")]
    pub port: Option<u16>,

    /// Completion model, overrides `llm.model`
    #[arg(short, long)]
    pub model: Option<String>,

    /// GitHub account the tools describe, overrides `github.username`
    #[arg(long)]
    pub github_username: Option<String>,
}
