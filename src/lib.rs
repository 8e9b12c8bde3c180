mod board;
pub mod codec;
mod common;
mod config;
pub mod dispatcher;
mod logging;
mod position;
pub mod prelude;
pub mod protocol;
mod records;
mod records_service;
pub mod server;
mod server_config;
mod session;
mod settings;
mod ship;
pub mod transport;

pub use board::*;
pub use codec::{decode, encode, FrameError, SEPARATOR};
pub use common::*;
pub use config::*;
pub use dispatcher::{Connection, Flow};
pub use logging::init_logging;
pub use position::*;
pub use protocol::{ClientMessage, ProtocolError, ServerMessage};
pub use records::*;
pub use records_service::RecordsHandle;
pub use server::Server;
pub use server_config::*;
pub use session::*;
pub use settings::*;
pub use ship::*;
pub use transport::tcp::TcpTransport;
