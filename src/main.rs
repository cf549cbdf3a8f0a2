use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use linkr::connector::api::{Container, ContainerConfig, Router};
use linkr::Commands;

#[derive(Parser)]
#[command(name = "linkr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true, default_value = "~/.linkr")]
    data_dir: String,

    /// Answer prompts locally instead of calling the completion service
    #[arg(long, global = true)]
    mock_llm: bool,

    /// Keep history in memory only
    #[arg(long, global = true)]
    memory_storage: bool,

    /// Request timeout for outbound HTTP calls, in seconds
    #[arg(long, global = true, default_value = "60")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let data_dir = expand_tilde(&cli.data_dir);
    if !cli.memory_storage {
        std::fs::create_dir_all(&data_dir)?;
    }

    let container = Container::new(ContainerConfig {
        data_dir,
        mock_llm: cli.mock_llm,
        memory_storage: cli.memory_storage,
        timeout_secs: cli.timeout,
    })?;

    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}

fn expand_tilde(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            if path == "~" {
                return home.to_string_lossy().to_string();
            }
            return path.replacen("~", &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
