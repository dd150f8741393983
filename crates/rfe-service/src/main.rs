//! RFE antibioprophylaxis gRPC Server binary.

use rfe_loader::LoadConfig;
use rfe_service::proto::{
    admin_service_server::AdminServiceServer,
    prophylaxis_service_server::ProphylaxisServiceServer,
};
use rfe_service::{DatasetHandle, RfeServer};
use tonic::transport::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 50052;
const DEFAULT_DATA_PATH: &str = "data";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Get data path from env or use default
    let data_path = std::env::var("RFE_DATA_PATH")
        .unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string());

    tracing::info!("Loading RFE document from: {}", data_path);

    // Load before accepting traffic; there is nothing to serve without it
    let handle = DatasetHandle::with_source(&data_path, LoadConfig::default());
    let count = handle.reload()?;

    let info = handle.query()?.info();
    tracing::info!(
        "Loaded {} records across {} specialties ({} v{})",
        count,
        info.specialty_count,
        info.source,
        info.version
    );

    let server = RfeServer::new(handle);

    // Get port from env or use default
    let port = std::env::var("RFE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let addr = format!("[::1]:{}", port).parse()?;
    tracing::info!("Starting RFE gRPC server on {}", addr);
    tracing::info!("Services available: ProphylaxisService, AdminService");

    Server::builder()
        .add_service(ProphylaxisServiceServer::new(server.clone()))
        .add_service(AdminServiceServer::new(server))
        .serve(addr)
        .await?;

    Ok(())
}
