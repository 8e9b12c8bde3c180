/// Line-oriented byte stream carrying one protocol message per line.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send `line` followed by a line terminator.
    async fn send_line(&mut self, line: &str) -> anyhow::Result<()>;
    /// Next line without its terminator, or `None` once the peer has closed.
    async fn recv_line(&mut self) -> anyhow::Result<Option<String>>;
}

pub mod in_memory;
pub mod tcp;
