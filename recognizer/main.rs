/// ferrite-mlp recognizer
///
/// Serves a trained model over HTTP so a drawing canvas (or `curl`) can ask
/// which digit an image shows. Served by a synchronous tiny_http server.
///
/// Run with:
///   cargo run --bin recognizer --release -- --model trained_models/model.json.gz
///
/// Endpoints:
///   GET  /model      — layer sizes of the loaded network
///   POST /recognize  — image bytes or `{"pixels": [...]}`; `?invert=false`
///                      skips the dark-on-light to light-on-dark inversion

mod handlers;
mod routes;
mod util;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tiny_http::Server;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ferrite_mlp::Network;

#[derive(Parser, Debug)]
#[command(name = "recognizer")]
#[command(about = "HTTP digit recognition with a saved ferrite-mlp model")]
struct Args {
    /// Model written by `ferrite-mlp train`
    #[arg(long)]
    model: PathBuf,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:7878")]
    addr: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let network = Network::load_model(&args.model)
        .with_context(|| format!("loading model from {}", args.model.display()))?;
    let server = Server::http(&args.addr)
        .map_err(|e| anyhow!("failed to bind {}: {}", args.addr, e))?;

    info!(addr = %args.addr, layers = ?network.layer_sizes(), "recognizer listening");

    // Requests are handled one at a time; the network is only read.
    for request in server.incoming_requests() {
        routes::dispatch(request, &network);
    }
    Ok(())
}
