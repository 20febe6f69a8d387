//! Serve the repository browser over HTTP.

use std::net::SocketAddr;

use browse::BrowseService;
use camino::Utf8PathBuf;
use clap::Parser;
use eyre::WrapErr;
use repository::ConfigurationFile;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Storage and repository configuration file (TOML)
    #[arg(short, long)]
    config: Utf8PathBuf,

    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// URL prefix of links in HTML listings
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();

    let text = tokio::fs::read_to_string(&cli.config)
        .await
        .wrap_err_with(|| format!("reading {}", cli.config))?;
    let file: ConfigurationFile =
        toml_edit::de::from_str(&text).wrap_err_with(|| format!("parsing {}", cli.config))?;

    let mut builder = BrowseService::builder()
        .from_file(&file)
        .wrap_err("invalid configuration")?;
    if let Some(base_url) = cli.base_url {
        builder = builder.base_url(base_url);
    }
    let service = builder.build();

    let listener = tokio::net::TcpListener::bind(cli.listen)
        .await
        .wrap_err_with(|| format!("binding {}", cli.listen))?;
    tracing::info!("Repository browser listening on http://{}", cli.listen);
    tracing::info!("Try: curl http://{}/storages", cli.listen);

    axum::serve(listener, service.router()).await?;

    Ok(())
}
