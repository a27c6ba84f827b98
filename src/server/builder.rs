//! ServerBuilder for fluent API to build the relay server

use super::router::{build_health_routes, build_relay_routes};
use crate::config::RelayConfig;
use crate::relay::handlers::RelayState;
use crate::relay::webhook::{HttpWebhookClient, WebhookClient};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for the relay HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(RelayConfig::load()?)
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: RelayConfig,
    webhook_client: Option<Arc<dyn WebhookClient>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with default configuration
    pub fn new() -> Self {
        Self {
            config: RelayConfig::default(),
            webhook_client: None,
            custom_routes: Vec::new(),
        }
    }

    /// Set the relay configuration
    pub fn with_config(mut self, config: RelayConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a specific webhook client
    ///
    /// Without one, `build()` creates an [`HttpWebhookClient`] using the
    /// configured request timeout.
    pub fn with_webhook_client(mut self, client: impl WebhookClient + 'static) -> Self {
        self.webhook_client = Some(Arc::new(client));
        self
    }

    /// Add custom routes to the server
    ///
    /// # Example
    ///
    /// ```ignore
    /// let extra = Router::new().route("/version", get(version_handler));
    ///
    /// ServerBuilder::new()
    ///     .with_custom_routes(extra)
    ///     .build()?;
    /// ```
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the final router
    ///
    /// This generates:
    /// - Health check routes
    /// - The upload and save relay routes
    /// - Any custom routes
    ///
    /// wrapped in request tracing and permissive CORS.
    pub fn build(mut self) -> Result<Router> {
        let client: Arc<dyn WebhookClient> = match self.webhook_client.take() {
            Some(client) => client,
            None => Arc::new(HttpWebhookClient::new(self.config.request_timeout())?),
        };

        let state = RelayState {
            webhooks: Arc::new(self.config.webhooks.clone()),
            client,
            max_upload_bytes: self.config.max_upload_bytes,
        };

        let mut app = build_health_routes().merge(build_relay_routes(state));

        for custom_router in std::mem::take(&mut self.custom_routes) {
            app = app.merge(custom_router);
        }

        Ok(app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        ))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the configured address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.bind_addr.clone();
        self.config.log_summary();

        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WebhookConfig;

    #[test]
    fn test_builder_default() {
        let builder = ServerBuilder::default();
        assert!(builder.webhook_client.is_none());
        assert!(builder.custom_routes.is_empty());
        assert_eq!(builder.config, RelayConfig::default());
    }

    #[test]
    fn test_with_config_replaces_defaults() {
        let config = RelayConfig {
            webhooks: WebhookConfig {
                save_url: Some("http://hooks.local/save".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let builder = ServerBuilder::new().with_config(config.clone());
        assert_eq!(builder.config, config);
    }

    #[test]
    fn test_with_custom_routes_accumulates() {
        let builder = ServerBuilder::new()
            .with_custom_routes(Router::new())
            .with_custom_routes(Router::new());
        assert_eq!(builder.custom_routes.len(), 2);
    }

    #[tokio::test]
    async fn test_build_with_default_client() {
        let router = ServerBuilder::new().build();
        assert!(router.is_ok());
    }
}
