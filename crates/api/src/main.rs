use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    siteledger_observability::init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let services = Arc::new(siteledger_api::app::services::build_services().await?);
    let app = siteledger_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
