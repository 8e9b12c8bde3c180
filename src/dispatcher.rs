//! Per-connection control loop.
//!
//! A [`Connection`] greets the client, then reads one line at a time, routes
//! the decoded message and writes the replies back in order. It owns the
//! connection's [`PveSession`]; the records store is reached only through the
//! injected [`RecordsHandle`].

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::codec::FrameError;
use crate::protocol::{
    Attacker, ClientMessage, GameStarted, InfoMessage, ProtocolError, ServerMessage, TurnMessage,
};
use crate::records_service::RecordsHandle;
use crate::session::PveSession;
use crate::settings::GameSettings;
use crate::transport::Transport;

pub const GREETING: &str =
    "Server ready. Commands: HELLO, NEW_GAME_PVE, ATTACK, GET_RECORDS, PING, SALIR";
pub const FAREWELL: &str = "Goodbye";

/// What the loop does after replying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Close,
}

pub struct Connection {
    transport: Box<dyn Transport>,
    records: RecordsHandle,
    player_name: Option<String>,
    session: Option<PveSession>,
    /// Seed for reproducible games; each new game uses the next value.
    session_seed: Option<u64>,
}

impl Connection {
    pub fn new(transport: Box<dyn Transport>, records: RecordsHandle) -> Self {
        Self {
            transport,
            records,
            player_name: None,
            session: None,
            session_seed: None,
        }
    }

    /// Drive the fleets and opponent moves of every game from `seed`.
    pub fn with_session_seed(mut self, seed: u64) -> Self {
        self.session_seed = Some(seed);
        self
    }

    /// Name given with HELLO, if any.
    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    pub fn session(&self) -> Option<&PveSession> {
        self.session.as_ref()
    }

    /// Serve the connection until the client exits or disconnects.
    ///
    /// A line that cannot be framed ends the connection with an error after
    /// telling the client why.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let records = self.records_message().await;
        self.send(&records).await?;
        self.send(&ServerMessage::info(GREETING)).await?;

        loop {
            let line = match self.transport.recv_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    if let Some(frame) = e.downcast_ref::<FrameError>() {
                        warn!("framing error, closing connection: {}", frame);
                        let _ = self.send(&ServerMessage::error(frame.to_string())).await;
                    }
                    return Err(e);
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let msg = match ClientMessage::parse_line(&line) {
                Ok(msg) => msg,
                Err(ProtocolError::Frame(e)) => {
                    warn!("framing error, closing connection: {}", e);
                    let _ = self.send(&ServerMessage::error(e.to_string())).await;
                    return Err(e.into());
                }
                Err(e) => {
                    debug!("rejected line {:?}: {}", line, e);
                    self.send(&ServerMessage::error(e.to_string())).await?;
                    continue;
                }
            };
            let (replies, flow) = self.handle(msg).await;
            for reply in &replies {
                self.send(reply).await?;
            }
            if flow == Flow::Close {
                break;
            }
        }
        if self.session.take().is_some() {
            debug!("abandoning unfinished game");
        }
        Ok(())
    }

    /// Route one decoded message and produce its replies in wire order.
    pub async fn handle(&mut self, msg: ClientMessage) -> (Vec<ServerMessage>, Flow) {
        match msg {
            ClientMessage::Hello(hello) => {
                info!("player identified as {}", hello.name);
                let reply = ServerMessage::info(format!("Welcome, {}", hello.name));
                self.player_name = Some(hello.name);
                (vec![reply], Flow::Continue)
            }
            ClientMessage::NewGamePve(request) => (self.new_game(request.settings), Flow::Continue),
            ClientMessage::Attack(request) => {
                (self.attack(&request.position).await, Flow::Continue)
            }
            ClientMessage::GetRecords => (vec![self.records_message().await], Flow::Continue),
            ClientMessage::Ping => (vec![ServerMessage::Pong], Flow::Continue),
            ClientMessage::Exit => (
                vec![ServerMessage::Bye(InfoMessage {
                    message: FAREWELL.to_string(),
                })],
                Flow::Close,
            ),
        }
    }

    fn new_game(&mut self, settings: GameSettings) -> Vec<ServerMessage> {
        let created = match self.session_seed.as_mut() {
            Some(seed) => {
                let rng = SmallRng::seed_from_u64(*seed);
                *seed = seed.wrapping_add(1);
                PveSession::with_rng(settings, rng)
            }
            None => PveSession::new(settings),
        };
        let session = match created {
            Ok(session) => session,
            Err(e) => return vec![ServerMessage::error(e.to_string())],
        };
        if self.session.is_some() {
            debug!("replacing unfinished game");
        }
        info!(
            "new PVE game for {} on a {}x{} board ({:?})",
            self.player_name.as_deref().unwrap_or("<anonymous>"),
            session.size(),
            session.size(),
            session.settings().difficulty
        );
        let started: GameStarted = session.game_started();
        self.session = Some(session);
        vec![
            ServerMessage::GameStarted(started),
            ServerMessage::Turn(TurnMessage {
                who: Attacker::Player,
            }),
        ]
    }

    async fn attack(&mut self, position: &str) -> Vec<ServerMessage> {
        let Some(session) = self.session.as_mut() else {
            return vec![ServerMessage::error("No active game. Send NEW_GAME_PVE first")];
        };
        let events = session.player_attack(position);
        debug!("attack {:?} produced {} messages", position, events.len());

        if let Some(outcome) = session.outcome() {
            self.session = None;
            info!(
                "game over for {}: {} after {} turns",
                self.player_name.as_deref().unwrap_or("<anonymous>"),
                if outcome.won { "won" } else { "lost" },
                outcome.turns
            );
            match self.player_name.as_deref() {
                Some(name) => {
                    if let Err(e) = self.records.record_pve(name, outcome).await {
                        warn!("could not save records for {}: {:#}", name, e);
                    }
                }
                None => warn!("no HELLO received, result not recorded"),
            }
        }
        events.into_iter().map(ServerMessage::from).collect()
    }

    async fn records_message(&self) -> ServerMessage {
        match self.records.snapshot().await {
            Ok(records) => ServerMessage::Records(records),
            Err(e) => {
                warn!("could not load records: {:#}", e);
                ServerMessage::error("Records are unavailable")
            }
        }
    }

    async fn send(&mut self, msg: &ServerMessage) -> anyhow::Result<()> {
        let line = msg.to_line()?;
        self.transport.send_line(&line).await
    }
}
