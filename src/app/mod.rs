use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    config::{AppConfig, ServeMode},
    gateway,
    queue::{self, DeletionQueue, DeletionWorker},
    web::{self, types::Redirects},
    ContactsClient, Error, Result,
};

// ###################################
// ->  Structs
// ###################################
/// The inbound transport the app was built for.
pub enum Transport {
    Server(TcpListener),
    Gateway,
}

pub struct App {
    pub app_state: AppState,
    pub transport: Transport,
    pub deletion_worker: DeletionWorker,
}

impl App {
    /// Builds the contacts client, spawns the deletion worker and, in server mode, binds the listener.
    /// Must be called from within a tokio runtime.
    pub async fn build_from_config(config: AppConfig) -> Result<Self> {
        let contacts_client = ContactsClient::new(
            &config.sendgrid.base_url,
            config.sendgrid.api_key.clone(),
            config.sendgrid.list_id.clone(),
            config.sendgrid.timeout(),
        )?;
        let redirects = Redirects::try_from(&config.redirect)?;

        let (deletion_queue, deletion_worker) =
            queue::spawn(contacts_client.clone(), config.queue.capacity);
        let app_state = AppState::new(contacts_client, deletion_queue, redirects);

        let transport = match config.mode {
            ServeMode::Server => {
                let addr = SocketAddr::from((config.net.host, config.net.app_port));
                let listener = TcpListener::bind(addr).await?;
                let addr = listener.local_addr()?;
                info!("{:<20} - {}", "Listening on:", addr);
                Transport::Server(listener)
            }
            ServeMode::Gateway => {
                info!("{:<20} - {}", "Serving:", "API Gateway invocations");
                Transport::Gateway
            }
        };

        Ok(App {
            app_state,
            transport,
            deletion_worker,
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        match &self.transport {
            Transport::Server(listener) => listener.local_addr().ok(),
            Transport::Gateway => None,
        }
    }

    /// Serves until the transport stops, then waits for the queued deletions to finish.
    pub async fn run(self) -> Result<()> {
        let App {
            app_state,
            transport,
            deletion_worker,
        } = self;

        match transport {
            Transport::Server(listener) => web::serve(listener, app_state).await?,
            Transport::Gateway => gateway::run(app_state)
                .await
                .map_err(|er| Error::Gateway(er.to_string()))?,
        }

        info!("{:<20} - {}", "Draining:", "queued contact deletions");
        deletion_worker.join().await?;

        Ok(())
    }
}

pub struct InternalState {
    pub contacts_client: ContactsClient,
    pub deletion_queue: DeletionQueue,
    pub redirects: Redirects,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(
        contacts_client: ContactsClient,
        deletion_queue: DeletionQueue,
        redirects: Redirects,
    ) -> Self {
        AppState(Arc::new(InternalState {
            contacts_client,
            deletion_queue,
            redirects,
        }))
    }
}
