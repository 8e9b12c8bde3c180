use std::path::PathBuf;

use battleship_server::{
    init_logging, protocol, JsonFileStore, RecordsHandle, Server, ServerConfig, ServerMessage,
};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the game server.
    Serve {
        #[arg(long, help = "Properties file with server.host, server.port and max.clients")]
        config: Option<PathBuf>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        #[arg(long, help = "Reported only; connections are never refused")]
        max_clients: Option<usize>,
        #[arg(long, help = "Path of the records file (default data/records.json)")]
        records: Option<PathBuf>,
    },
    /// Connect to a server and relay lines typed on stdin.
    Client {
        #[arg(long, default_value = "127.0.0.1:5000")]
        connect: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            max_clients,
            records,
        } => {
            let mut server_config = match config {
                Some(path) => ServerConfig::load_properties(&path)?,
                None => ServerConfig::default(),
            };
            if let Some(host) = host {
                server_config.host = host;
            }
            if let Some(port) = port {
                server_config.port = port;
            }
            if let Some(max_clients) = max_clients {
                server_config.max_clients = max_clients;
            }
            if let Some(records) = records {
                server_config.records_path = records;
            }

            let store = JsonFileStore::new(server_config.records_path.clone());
            let records = RecordsHandle::spawn(store);
            let server = Server::bind(server_config, records).await?;

            tokio::select! {
                result = server.run() => result?,
                _ = tokio::signal::ctrl_c() => {
                    println!("Received Ctrl+C, shutting down...");
                }
            }
        }
        Commands::Client { connect } => run_client(&connect).await?,
    }
    Ok(())
}

/// Print every server line and forward stdin lines until the server says
/// BYE or closes the connection.
async fn run_client(addr: &str) -> anyhow::Result<()> {
    let stream = TcpStream::connect(addr).await?;
    println!("Connected to {}", addr);
    let (read_half, mut write_half) = stream.into_split();

    let mut reader_task = tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        while let Some(line) = lines.next_line().await? {
            match ServerMessage::parse_line(&line) {
                Ok(ServerMessage::Info(info)) => println!("Server: {}", info.message),
                Ok(ServerMessage::Error(err)) => println!("Server error: {}", err.message),
                Ok(ServerMessage::Bye(bye)) => {
                    println!("Server: {}", bye.message);
                    break;
                }
                Ok(msg) => println!("Server [{}]: {}", msg.tag(), line),
                Err(_) => println!("Server: {}", line),
            }
        }
        anyhow::Ok(())
    });

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            finished = &mut reader_task => {
                finished??;
                break;
            }
            line = stdin.next_line() => {
                let Some(line) = line? else {
                    let exit = format!("{}\n", protocol::EXIT_COMMANDS[0]);
                    write_half.write_all(exit.as_bytes()).await?;
                    // Wait for BYE before leaving.
                    (&mut reader_task).await??;
                    break;
                };
                write_half.write_all(line.as_bytes()).await?;
                write_half.write_all(b"\n").await?;
            }
        }
    }
    Ok(())
}
