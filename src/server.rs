//! TCP accept loop: one task per connection.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{info, warn};
use tokio::net::TcpListener;

use crate::dispatcher::Connection;
use crate::records_service::RecordsHandle;
use crate::server_config::ServerConfig;
use crate::transport::tcp::TcpTransport;

pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
    records: RecordsHandle,
}

impl Server {
    pub async fn bind(config: ServerConfig, records: RecordsHandle) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(config.bind_addr()).await?;
        Ok(Self {
            listener,
            config,
            records,
        })
    }

    /// Actual bound address, useful when binding port 0.
    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the listener fails.
    pub async fn run(self) -> anyhow::Result<()> {
        info!(
            "server listening on {} (max_clients={})",
            self.local_addr()?,
            self.config.max_clients
        );
        let active = Arc::new(AtomicUsize::new(0));
        let mut next_id = 0u64;
        loop {
            let (stream, addr) = self.listener.accept().await?;
            next_id += 1;
            let client_id = next_id;
            let now_active = active.fetch_add(1, Ordering::SeqCst) + 1;
            info!("client {} connected from {} ({} active)", client_id, addr, now_active);
            if now_active > self.config.max_clients {
                warn!(
                    "{} clients exceed max_clients={}, accepting anyway",
                    now_active, self.config.max_clients
                );
            }

            let records = self.records.clone();
            let active = Arc::clone(&active);
            tokio::spawn(async move {
                let transport = TcpTransport::new(stream);
                let mut connection = Connection::new(Box::new(transport), records);
                if let Err(e) = connection.run().await {
                    warn!("client {} error: {:#}", client_id, e);
                }
                active.fetch_sub(1, Ordering::SeqCst);
                info!("client {} disconnected", client_id);
            });
        }
    }
}
