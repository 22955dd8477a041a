//! # Application State
//!
//! Shared state for the Axum application: the access gate, the gateway
//! client, the product catalog, and the per-subject session slots.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use store_core::{AccessGate, CartLedger, PipelineController, ProductCatalog};
use store_gateway::{GatewayClient, PaymentOrchestrator};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Base URL for callbacks
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// One browsing session's checkout state.
///
/// Exclusively owned by the session; all mutation funnels through the
/// ledger's operation set and the pipeline controller.
#[derive(Debug, Default)]
pub struct Session {
    pub ledger: CartLedger,
    pub pipeline: PipelineController,
    pub orchestrator: Option<PaymentOrchestrator>,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Access gate for protected route prefixes
    pub gate: AccessGate,
    /// Payment-gateway client
    pub gateway: Arc<GatewayClient>,
    /// Product catalog
    pub catalog: ProductCatalog,
    /// Application config
    pub config: AppConfig,
    /// Per-subject session slots
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl AppState {
    /// Create a new AppState from the environment
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let signing_secret = std::env::var("GATE_SIGNING_SECRET")
            .map_err(|_| anyhow::anyhow!("GATE_SIGNING_SECRET not set"))?;
        let gate = AccessGate::new(signing_secret);

        let catalog = load_product_catalog()?;

        let gateway = GatewayClient::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize gateway client: {}", e))?;

        Ok(Self {
            gate,
            gateway: Arc::new(gateway),
            catalog,
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Create an AppState from explicit parts (used by tests)
    pub fn with_parts(
        gate: AccessGate,
        gateway: GatewayClient,
        catalog: ProductCatalog,
        config: AppConfig,
    ) -> Self {
        Self {
            gate,
            gateway: Arc::new(gateway),
            catalog,
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Run `f` against the subject's session slot, creating it on first use.
    ///
    /// The lock serializes mutations, matching the one-event-at-a-time
    /// execution model; it is never held across an await point.
    pub fn with_session<R>(&self, subject: &str, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let session = sessions.entry(subject.to_string()).or_default();
        f(session)
    }

    /// Drop the subject's session slot entirely (sign-out)
    pub fn drop_session(&self, subject: &str) {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.remove(subject);
    }
}

/// Load product catalog from config file
fn load_product_catalog() -> anyhow::Result<ProductCatalog> {
    let config_paths = [
        "config/products.toml",
        "../config/products.toml",
        "../../config/products.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog = ProductCatalog::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {} products from {}", catalog.products.len(), path);
            return Ok(catalog);
        }
    }

    tracing::warn!("No product catalog found, using empty catalog");
    Ok(ProductCatalog::new())
}
