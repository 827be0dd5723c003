//! Upload client: sends one file to an upload server

mod constants;
mod logger;
mod upload;

use clap::Parser;
use constants::{DEFAULT_SERVER_URL, ENV_SECRET};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "upload-client")]
#[command(about = "Upload a file to an upload server (like `curl -T FILE URL/NAME?SECRET`)")]
struct Cli {
    /// File to upload
    file: PathBuf,
    /// Server URL
    #[arg(short = 'S', long, default_value = DEFAULT_SERVER_URL)]
    server: String,
    /// Name to request on the server (default: the file's own name)
    #[arg(short, long)]
    name: Option<String>,
    /// Secret URL parameter the server requires (or UPLOAD_SECRET env var)
    #[arg(short, long)]
    secret: Option<String>,
    /// Send with POST instead of PUT
    #[arg(long)]
    post: bool,
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let cli = Cli::parse();
    let method = if cli.post {
        reqwest::Method::POST
    } else {
        reqwest::Method::PUT
    };

    let secret = cli
        .secret
        .or_else(|| std::env::var(ENV_SECRET).ok())
        .filter(|s| !s.is_empty());

    upload::upload_file(
        &cli.server,
        &cli.file,
        cli.name.as_deref(),
        secret.as_deref(),
        method,
    )?;

    Ok(())
}
