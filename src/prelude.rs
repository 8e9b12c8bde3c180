//! Commonly used types and utilities for ease of import.

pub use crate::{
    Board, Connection, GameSettings, PveSession, RecordsHandle, Server, ServerConfig, ShipType,
};

pub use crate::protocol::{Attacker, ClientMessage, ServerMessage};

pub use crate::transport::{in_memory::InMemoryTransport, tcp::TcpTransport, Transport};
