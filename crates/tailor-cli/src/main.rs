use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tailor_core::EdgeConfig;
use tailor_core::app::AppBuilder;
use tailor_core::delivery::DeliveryResponse;
use tailor_core::domain::{EdgeRequest, PlacementRequest};
use tailor_core::impls::{StaticPlacementMap, StubDecisioningClient};
use tailor_core::ports::PlacementResolver;

/// Runs one edge transaction (request phase, then response phase) and prints
/// the headers each phase would add.
#[derive(Debug, Parser)]
#[command(name = "tailor", version, about)]
struct Cli {
    /// JSON config file; missing fields use defaults.
    #[arg(long, env = "TAILOR_CONFIG")]
    config: Option<PathBuf>,

    /// Decisioning host, overrides `delivery.host`.
    #[arg(long, env = "TAILOR_HOST")]
    host: Option<String>,

    /// Decisioning tenant, overrides `delivery.client`.
    #[arg(long, env = "TAILOR_CLIENT")]
    client: Option<String>,

    /// Request path.
    #[arg(long, default_value = "/")]
    path: String,

    /// Raw query string, e.g. `mboxes=hero,footer`.
    #[arg(long)]
    query: Option<String>,

    /// Raw `Cookie` header sent by the browser.
    #[arg(long)]
    cookie: Option<String>,

    /// Answer from a local stub instead of calling the decisioning service.
    #[arg(long)]
    offline: bool,
}

impl Cli {
    fn edge_config(&self) -> Result<EdgeConfig> {
        let mut config = match &self.config {
            Some(path) => EdgeConfig::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => EdgeConfig::default(),
        };
        if let Some(host) = &self.host {
            config.delivery.host = host.clone();
        }
        if let Some(client) = &self.client {
            config.delivery.client = client.clone();
        }
        Ok(config)
    }

    fn edge_request(&self) -> EdgeRequest {
        let mut request = EdgeRequest::new(self.path.clone());
        if let Some(query) = &self.query {
            request = request.with_query(query.clone());
        }
        if let Some(cookie) = &self.cookie {
            request = request.with_header("Cookie", cookie.clone());
        }
        request
    }
}

/// オフライン用: 要求された配置ごとにダミーのコンテンツを返す
fn offline_response(placements: &PlacementRequest) -> Result<DeliveryResponse> {
    let mboxes: Vec<serde_json::Value> = placements
        .iter()
        .enumerate()
        .map(|(index, name)| {
            serde_json::json!({
                "index": index,
                "name": name,
                "options": [{ "content": format!("offline content for {name}"), "type": "html" }],
                "metrics": [{ "analytics": { "payload": { "tnta": format!("offline:{index}") } } }]
            })
        })
        .collect();

    let response = serde_json::from_value(serde_json::json!({
        "id": { "tntId": "offline.0_0" },
        "execute": { "mboxes": mboxes }
    }))?;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.edge_config()?;
    let request = cli.edge_request();

    let mut builder = AppBuilder::new(config.clone());
    if cli.offline {
        let placements = StaticPlacementMap::new(&config).resolve(&request);
        let stub = StubDecisioningClient::responding(offline_response(&placements)?);
        builder = builder.decisioning_client(Arc::new(stub));
    }
    let worker = builder.build()?;

    // (A) request phase
    let phase = worker.on_request(&request).await;
    println!("== forwarded to origin");
    for h in &phase.forward_headers {
        println!("{}: {}", h.name, h.value);
    }

    // (B) response phase
    println!("== added to client response");
    for h in worker.on_response(phase.state) {
        println!("{}: {}", h.name, h.value);
    }

    Ok(())
}
