use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::fetcher::ArchiveFetcher;
use crate::services::WeatherService;
use crate::storage::FileStore;

/// Running backend: the spawned HTTP server task
pub struct Application {
    pub server_handle: JoinHandle<Result<(), std::io::Error>>,
    pub local_addr: std::net::SocketAddr,
}

impl Application {
    /// Build the service graph and start serving
    ///
    /// Binds before spawning, so `local_addr` is valid on return (useful with
    /// port 0 in tests).
    pub async fn build(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Initializing application components");

        let fetcher = ArchiveFetcher::new(config.archive_url.clone(), config.request_timeout())?;
        let store = FileStore::new(&config.storage_dir);
        info!("Storing weather data under {}", store.root().display());

        let weather_service = WeatherService::new(fetcher, store);

        let app_state = AppState { weather_service };
        let app = create_router(app_state)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

        let addr = config.server_addr();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let local_addr = listener.local_addr()?;
        info!("Starting HTTP server on {}", local_addr);

        let server_handle = tokio::spawn(async move { axum::serve(listener, app).await });

        info!("Application initialized successfully");

        Ok(Self {
            server_handle,
            local_addr,
        })
    }

    /// Run until the server stops (which runs indefinitely unless error)
    pub async fn run_until_stopped(self) -> Result<(), Box<dyn std::error::Error>> {
        self.server_handle.await??;
        Ok(())
    }
}
