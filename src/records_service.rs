//! Single writer for the shared records store.
//!
//! One task owns the [`RecordsStore`]; connections talk to it through a
//! cloneable [`RecordsHandle`]. Requests are handled one at a time, so a
//! load-modify-save for one game can never interleave with another.

use log::{debug, error};
use tokio::sync::{mpsc, oneshot};

use crate::records::{PlayerStats, PveOutcome, Records, RecordsStore};

const REQUEST_QUEUE: usize = 64;

enum RecordsRequest {
    Snapshot {
        reply: oneshot::Sender<anyhow::Result<Records>>,
    },
    RecordPve {
        player: String,
        outcome: PveOutcome,
        reply: oneshot::Sender<anyhow::Result<PlayerStats>>,
    },
}

#[derive(Clone)]
pub struct RecordsHandle {
    tx: mpsc::Sender<RecordsRequest>,
}

impl RecordsHandle {
    /// Start the writer task for `store`. Must be called inside a Tokio
    /// runtime. The task stops once every handle is dropped.
    pub fn spawn<S: RecordsStore + 'static>(store: S) -> Self {
        let (tx, rx) = mpsc::channel(REQUEST_QUEUE);
        tokio::spawn(run_writer(store, rx));
        Self { tx }
    }

    /// Current contents of the store.
    pub async fn snapshot(&self) -> anyhow::Result<Records> {
        let (reply, rx) = oneshot::channel();
        self.send(RecordsRequest::Snapshot { reply }).await?;
        rx.await
            .map_err(|_| anyhow::anyhow!("records writer dropped the request"))?
    }

    /// Apply a finished PVE game to `player` and persist it. Returns the
    /// player's updated stats.
    pub async fn record_pve(
        &self,
        player: &str,
        outcome: PveOutcome,
    ) -> anyhow::Result<PlayerStats> {
        let (reply, rx) = oneshot::channel();
        self.send(RecordsRequest::RecordPve {
            player: player.to_string(),
            outcome,
            reply,
        })
        .await?;
        rx.await
            .map_err(|_| anyhow::anyhow!("records writer dropped the request"))?
    }

    async fn send(&self, req: RecordsRequest) -> anyhow::Result<()> {
        self.tx
            .send(req)
            .await
            .map_err(|_| anyhow::anyhow!("records writer has stopped"))
    }
}

async fn run_writer<S: RecordsStore>(store: S, mut rx: mpsc::Receiver<RecordsRequest>) {
    while let Some(req) = rx.recv().await {
        match req {
            RecordsRequest::Snapshot { reply } => {
                let _ = reply.send(store.load().await);
            }
            RecordsRequest::RecordPve {
                player,
                outcome,
                reply,
            } => {
                let result = record_pve(&store, &player, &outcome).await;
                match &result {
                    Ok(stats) => debug!(
                        "records updated for {}: {} PVE wins, {} PVE losses",
                        player, stats.pve_wins, stats.pve_losses
                    ),
                    Err(e) => error!("records update for {} failed: {:#}", player, e),
                }
                let _ = reply.send(result);
            }
        }
    }
    debug!("records writer stopped");
}

async fn record_pve<S: RecordsStore>(
    store: &S,
    player: &str,
    outcome: &PveOutcome,
) -> anyhow::Result<PlayerStats> {
    let mut records = store.load().await?;
    let stats = records.ensure_player(player);
    stats.apply_pve_result(outcome);
    let updated = stats.clone();
    store.save(&records).await?;
    Ok(updated)
}
