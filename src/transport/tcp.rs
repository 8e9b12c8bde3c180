use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use crate::codec::FrameError;
use crate::transport::Transport;

/// Default timeout for writes (30 seconds). Reads wait indefinitely.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum line length (64 KiB) to prevent excessive memory allocation.
pub const MAX_LINE_LEN: usize = 64 * 1024;

pub struct TcpTransport {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    timeout_duration: Duration,
    max_line_len: usize,
}

fn map_io_error(e: std::io::Error, op: &str) -> anyhow::Error {
    match e.kind() {
        std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::ConnectionReset => {
            anyhow::anyhow!("Connection closed by peer")
        }
        // Only line reads decode text.
        std::io::ErrorKind::InvalidData => FrameError::InvalidUtf8.into(),
        _ => anyhow::anyhow!("{} error: {}", op, e),
    }
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self::with_config(stream, DEFAULT_TIMEOUT, MAX_LINE_LEN)
    }

    pub fn with_config(stream: TcpStream, timeout_duration: Duration, max_line_len: usize) -> Self {
        let (read_half, writer) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer,
            timeout_duration,
            max_line_len,
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        let send_op = async {
            self.writer
                .write_all(line.as_bytes())
                .await
                .map_err(|e| map_io_error(e, "Write"))?;
            self.writer
                .write_all(b"\n")
                .await
                .map_err(|e| map_io_error(e, "Write"))?;
            self.writer.flush().await.map_err(|e| map_io_error(e, "Write"))?;
            anyhow::Ok(())
        };

        timeout(self.timeout_duration, send_op)
            .await
            .map_err(|_| anyhow::anyhow!("Send timeout after {:?}", self.timeout_duration))?
    }

    async fn recv_line(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        // One byte over the limit is enough to tell an oversized line apart.
        let limit = self.max_line_len as u64 + 2;
        let read = (&mut self.reader)
            .take(limit)
            .read_line(&mut line)
            .await
            .map_err(|e| map_io_error(e, "Read"))?;
        if read == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        if line.len() > self.max_line_len {
            return Err(FrameError::TooLong {
                len: line.len(),
                max: self.max_line_len,
            }
            .into());
        }
        Ok(Some(line))
    }
}
