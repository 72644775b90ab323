// file: src/datafaces/context.rs
// description: starts and stops the dataface a specification describes

use super::Direct;
use crate::config::DatafaceSpecification;
use crate::error::{Result, XchembkuError};
use crate::server::{self, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

struct RunningService {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<Result<()>>,
}

/// The serving side of a specification: always a [`Direct`], plus the http
/// service in front of it when the specification asks for one.
pub struct ServerContext {
    direct: Arc<Direct>,
    service: Option<RunningService>,
}

impl ServerContext {
    pub async fn start(specification: &DatafaceSpecification) -> Result<Self> {
        let direct = Arc::new(Direct::start(specification.direct_specification()).await?);

        let service = match specification {
            DatafaceSpecification::Direct(_) => None,
            DatafaceSpecification::Service(service) => {
                let bind = service.server.bind_address()?;
                let listener = TcpListener::bind(bind).await?;
                let local_addr = listener.local_addr()?;

                let (shutdown, signal) = oneshot::channel::<()>();
                let state = AppState::new(direct.clone());
                let task = tokio::spawn(server::serve(listener, state, async move {
                    let _ = signal.await;
                }));

                Some(RunningService {
                    local_addr,
                    shutdown,
                    task,
                })
            }
        };

        Ok(Self { direct, service })
    }

    /// Where the service actually listens; differs from the configured bind when that used port 0.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.service.as_ref().map(|s| s.local_addr)
    }

    pub fn base_url(&self) -> Option<String> {
        self.local_addr().map(|addr| format!("http://{}", addr))
    }

    pub async fn shutdown(self) -> Result<()> {
        if let Some(service) = self.service {
            if service.shutdown.send(()).is_err() {
                warn!("dataface service had already stopped");
            }
            service
                .task
                .await
                .map_err(|e| XchembkuError::Io(std::io::Error::other(e)))??;
            info!("dataface service on {} shut down", service.local_addr);
        }

        self.direct.disconnect().await;
        Ok(())
    }
}
