//! Wiring of a ready-to-use [`FleetService`] from configuration.

use fahrtenbuch_db_memory::{create_blob_store, create_storage};

use crate::config::{AppConfig, loader};
use crate::observability;
use crate::service::FleetService;

impl FleetService {
    /// Builds the service with the stores selected by `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        let storage = config.storage_config();
        let store = create_storage(&storage);
        let blobs = create_blob_store(&storage);
        tracing::info!(
            backend = store.backend_name(),
            blob_base_url = %storage.blob_base_url,
            "fleet service ready"
        );
        FleetService::new(store, blobs, config.access.clone())
    }
}

/// Process start-up: reads `.env`, loads and validates the configuration,
/// initializes tracing and builds the service.
pub fn bootstrap(config_path: Option<&str>) -> Result<(AppConfig, FleetService), String> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config = loader::load_config(config_path)?;
    observability::init_tracing_from_config(&config.logging);
    let service = FleetService::from_config(&config);
    Ok((config, service))
}
