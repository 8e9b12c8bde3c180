use tokio::sync::mpsc;

use crate::transport::Transport;

/// One end of an in-process line channel.
pub struct InMemoryTransport {
    incoming: mpsc::UnboundedReceiver<String>,
    outgoing: mpsc::UnboundedSender<String>,
}

impl InMemoryTransport {
    /// Two connected ends: lines sent on one are received on the other.
    pub fn pair() -> (Self, Self) {
        let (tx1, rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        (
            Self {
                incoming: rx1,
                outgoing: tx2,
            },
            Self {
                incoming: rx2,
                outgoing: tx1,
            },
        )
    }
}

#[async_trait::async_trait]
impl Transport for InMemoryTransport {
    async fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.outgoing
            .send(line.to_string())
            .map_err(|_| anyhow::anyhow!("Channel closed"))
    }

    async fn recv_line(&mut self) -> anyhow::Result<Option<String>> {
        Ok(self.incoming.recv().await)
    }
}
