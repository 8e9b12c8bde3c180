//! Wire messages exchanged between the server and a remote client.
//!
//! Every message is one line framed by [`crate::codec`]: a tag, `:`, and a
//! compact JSON payload.

use core::fmt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::codec::{self, FrameError, SEPARATOR};
use crate::records::Records;
use crate::settings::GameSettings;
use crate::ship::ShipType;

pub const RECORDS: &str = "RECORDS";
pub const INFO: &str = "INFO";
pub const HELLO: &str = "HELLO";
pub const NEW_GAME_PVE: &str = "NEW_GAME_PVE";
pub const GAME_STARTED: &str = "GAME_STARTED";
pub const ATTACK: &str = "ATTACK";
pub const ATTACK_RESULT: &str = "ATTACK_RESULT";
pub const TURN: &str = "TURN";
pub const GAME_OVER: &str = "GAME_OVER";
pub const GET_RECORDS: &str = "GET_RECORDS";
pub const ERROR: &str = "ERROR";
pub const PING: &str = "PING";
pub const PONG: &str = "PONG";
pub const BYE: &str = "BYE";
/// Exit commands, matched case-insensitively.
pub const EXIT_COMMANDS: [&str; 2] = ["SALIR", "EXIT"];

/// Reason code sent when a fleet is wiped out.
pub const REASON_ALL_SHIPS_SUNK: &str = "ALL_SHIPS_SUNK";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attacker {
    #[serde(rename = "PLAYER")]
    Player,
    #[serde(rename = "AI", alias = "OPPONENT")]
    Opponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShotResult {
    Hit,
    Miss,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoMessage {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl ErrorMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hello {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGamePveRequest {
    #[serde(default)]
    pub settings: GameSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipPlacement {
    pub ship: ShipType,
    pub positions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStarted {
    pub board_size: usize,
    pub my_ships: Vec<ShipPlacement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRequest {
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackResult {
    pub by: Attacker,
    pub position: String,
    pub result: ShotResult,
    #[serde(default)]
    pub sunk: bool,
    #[serde(default)]
    pub sunk_ship: Option<ShipType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnMessage {
    pub who: Attacker,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOver {
    pub winner: Attacker,
    pub reason: String,
}

/// Payload for marker messages, serialized as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// Failure to turn an inbound line into a message.
#[derive(Debug)]
pub enum ProtocolError {
    /// The line is not `TYPE:payload`. Fatal for the connection.
    Frame(FrameError),
    /// The tag is known but its payload does not parse.
    Payload { tag: String, source: serde_json::Error },
    /// The tag is not part of the protocol.
    UnknownType(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Frame(e) => write!(f, "{}", e),
            ProtocolError::Payload { tag, source } => {
                write!(f, "Invalid {} payload: {}", tag, source)
            }
            ProtocolError::UnknownType(tag) => write!(f, "Unrecognized command: {}", tag),
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::Frame(e) => Some(e),
            ProtocolError::Payload { source, .. } => Some(source),
            ProtocolError::UnknownType(_) => None,
        }
    }
}

impl From<FrameError> for ProtocolError {
    fn from(err: FrameError) -> Self {
        ProtocolError::Frame(err)
    }
}

fn parse_payload<T: DeserializeOwned>(tag: &str, payload: &str) -> Result<T, ProtocolError> {
    serde_json::from_str(payload).map_err(|source| ProtocolError::Payload {
        tag: tag.to_string(),
        source,
    })
}

/// Unquoted raw text, or the string itself when it is a JSON string.
fn raw_text(payload: &str) -> String {
    serde_json::from_str::<String>(payload).unwrap_or_else(|_| payload.to_string())
}

fn is_exit(tag: &str) -> bool {
    EXIT_COMMANDS.iter().any(|c| c.eq_ignore_ascii_case(tag))
}

/// Messages sent by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    Hello(Hello),
    NewGamePve(NewGamePveRequest),
    Attack(AttackRequest),
    GetRecords,
    Ping,
    Exit,
}

impl ClientMessage {
    /// Parse one inbound line. Bare `PING` and exit commands are accepted
    /// without a separator.
    pub fn parse_line(line: &str) -> Result<Self, ProtocolError> {
        let bare = line.trim();
        if !bare.contains(SEPARATOR) {
            if is_exit(bare) {
                return Ok(ClientMessage::Exit);
            }
            if bare.eq_ignore_ascii_case(PING) {
                return Ok(ClientMessage::Ping);
            }
        }
        let (tag, payload) = codec::decode(line)?;
        Self::from_frame(&tag, &payload)
    }

    /// Build a message from an already-split frame.
    ///
    /// HELLO and ATTACK also take their value as plain text instead of a JSON
    /// object; an empty NEW_GAME_PVE payload means default settings.
    pub fn from_frame(tag: &str, payload: &str) -> Result<Self, ProtocolError> {
        let upper = tag.to_ascii_uppercase();
        match upper.as_str() {
            HELLO => {
                let hello = match serde_json::from_str::<Hello>(payload) {
                    Ok(hello) => hello,
                    Err(source) => {
                        let name = raw_text(payload);
                        if name.trim().is_empty() || name.trim_start().starts_with('{') {
                            return Err(ProtocolError::Payload {
                                tag: upper.clone(),
                                source,
                            });
                        }
                        Hello {
                            name: name.trim().to_string(),
                        }
                    }
                };
                Ok(ClientMessage::Hello(hello))
            }
            NEW_GAME_PVE if payload.is_empty() => {
                Ok(ClientMessage::NewGamePve(NewGamePveRequest::default()))
            }
            NEW_GAME_PVE => Ok(ClientMessage::NewGamePve(parse_payload(&upper, payload)?)),
            ATTACK => {
                let request = match serde_json::from_str::<AttackRequest>(payload) {
                    Ok(request) => request,
                    Err(source) => {
                        let position = raw_text(payload);
                        if position.trim_start().starts_with('{') {
                            return Err(ProtocolError::Payload {
                                tag: upper.clone(),
                                source,
                            });
                        }
                        AttackRequest { position }
                    }
                };
                Ok(ClientMessage::Attack(request))
            }
            GET_RECORDS => Ok(ClientMessage::GetRecords),
            PING => Ok(ClientMessage::Ping),
            t if is_exit(t) => Ok(ClientMessage::Exit),
            _ => Err(ProtocolError::UnknownType(tag.to_string())),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ClientMessage::Hello(_) => HELLO,
            ClientMessage::NewGamePve(_) => NEW_GAME_PVE,
            ClientMessage::Attack(_) => ATTACK,
            ClientMessage::GetRecords => GET_RECORDS,
            ClientMessage::Ping => PING,
            ClientMessage::Exit => EXIT_COMMANDS[0],
        }
    }

    /// Encode as a single line (without terminator).
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let payload = match self {
            ClientMessage::Hello(m) => serde_json::to_string(m)?,
            ClientMessage::NewGamePve(m) => serde_json::to_string(m)?,
            ClientMessage::Attack(m) => serde_json::to_string(m)?,
            ClientMessage::GetRecords | ClientMessage::Ping | ClientMessage::Exit => {
                serde_json::to_string(&Empty {})?
            }
        };
        Ok(codec::encode(self.tag(), &payload))
    }
}

/// Messages sent by the server.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    Records(Records),
    Info(InfoMessage),
    GameStarted(GameStarted),
    AttackResult(AttackResult),
    Turn(TurnMessage),
    GameOver(GameOver),
    Error(ErrorMessage),
    Pong,
    Bye(InfoMessage),
}

impl ServerMessage {
    pub fn info(message: impl Into<String>) -> Self {
        ServerMessage::Info(InfoMessage {
            message: message.into(),
        })
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error(ErrorMessage::new(message))
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ServerMessage::Records(_) => RECORDS,
            ServerMessage::Info(_) => INFO,
            ServerMessage::GameStarted(_) => GAME_STARTED,
            ServerMessage::AttackResult(_) => ATTACK_RESULT,
            ServerMessage::Turn(_) => TURN,
            ServerMessage::GameOver(_) => GAME_OVER,
            ServerMessage::Error(_) => ERROR,
            ServerMessage::Pong => PONG,
            ServerMessage::Bye(_) => BYE,
        }
    }

    /// Encode as a single line (without terminator).
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let payload = match self {
            ServerMessage::Records(m) => serde_json::to_string(m)?,
            ServerMessage::Info(m) | ServerMessage::Bye(m) => serde_json::to_string(m)?,
            ServerMessage::GameStarted(m) => serde_json::to_string(m)?,
            ServerMessage::AttackResult(m) => serde_json::to_string(m)?,
            ServerMessage::Turn(m) => serde_json::to_string(m)?,
            ServerMessage::GameOver(m) => serde_json::to_string(m)?,
            ServerMessage::Error(m) => serde_json::to_string(m)?,
            ServerMessage::Pong => serde_json::to_string(&Empty {})?,
        };
        Ok(codec::encode(self.tag(), &payload))
    }

    /// Parse one line received from a server.
    pub fn parse_line(line: &str) -> Result<Self, ProtocolError> {
        let (tag, payload) = codec::decode(line)?;
        Self::from_frame(&tag, &payload)
    }

    /// Client-side decoding. INFO, ERROR and BYE are informational: when their
    /// payload is not the expected JSON object the raw text is kept.
    pub fn from_frame(tag: &str, payload: &str) -> Result<Self, ProtocolError> {
        let text = |payload: &str| {
            serde_json::from_str::<InfoMessage>(payload)
                .map(|m| m.message)
                .unwrap_or_else(|_| raw_text(payload))
        };
        match tag {
            RECORDS => Ok(ServerMessage::Records(parse_payload(tag, payload)?)),
            INFO => Ok(ServerMessage::info(text(payload))),
            GAME_STARTED => Ok(ServerMessage::GameStarted(parse_payload(tag, payload)?)),
            ATTACK_RESULT => Ok(ServerMessage::AttackResult(parse_payload(tag, payload)?)),
            TURN => Ok(ServerMessage::Turn(parse_payload(tag, payload)?)),
            GAME_OVER => Ok(ServerMessage::GameOver(parse_payload(tag, payload)?)),
            ERROR => Ok(ServerMessage::error(text(payload))),
            PONG => Ok(ServerMessage::Pong),
            BYE => Ok(ServerMessage::Bye(InfoMessage {
                message: text(payload),
            })),
            _ => Err(ProtocolError::UnknownType(tag.to_string())),
        }
    }
}
