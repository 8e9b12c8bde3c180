use battleship_server::protocol::{self, Attacker, ClientMessage, ServerMessage};
use battleship_server::transport::{in_memory::InMemoryTransport, Transport};
use battleship_server::{
    protocol::NewGamePveRequest, Connection, GameSettings, MemoryStore, Position, RecordsHandle,
    DEFAULT_BOARD_SIZE,
};
use rand::seq::SliceRandom;
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

async fn send(transport: &mut InMemoryTransport, msg: ClientMessage) -> anyhow::Result<()> {
    transport.send_line(&msg.to_line()?).await
}

async fn recv(transport: &mut InMemoryTransport) -> anyhow::Result<ServerMessage> {
    let line = transport
        .recv_line()
        .await?
        .ok_or_else(|| anyhow::anyhow!("server closed the connection"))?;
    Ok(ServerMessage::parse_line(&line)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <seed> [board-size]", args[0]);
        std::process::exit(1);
    }
    let seed: u64 = args[1].parse()?;
    let size: usize = match args.get(2) {
        Some(s) => s.parse()?,
        None => DEFAULT_BOARD_SIZE,
    };

    let records = RecordsHandle::spawn(MemoryStore::default());
    let (server_end, mut client) = InMemoryTransport::pair();
    let server = tokio::spawn(async move {
        let mut connection =
            Connection::new(Box::new(server_end), records).with_session_seed(seed);
        connection.run().await
    });

    // RECORDS and INFO greeting.
    recv(&mut client).await?;
    recv(&mut client).await?;

    let hello = protocol::Hello {
        name: "sim".into(),
    };
    send(&mut client, ClientMessage::Hello(hello)).await?;
    recv(&mut client).await?;
    send(
        &mut client,
        ClientMessage::NewGamePve(NewGamePveRequest {
            settings: GameSettings::with_board_size(size),
        }),
    )
    .await?;
    match recv(&mut client).await? {
        ServerMessage::GameStarted(_) => {}
        ServerMessage::Error(e) => anyhow::bail!("could not start: {}", e.message),
        other => anyhow::bail!("unexpected reply: {:?}", other),
    }
    recv(&mut client).await?;

    let mut targets: Vec<Position> = (0..size)
        .flat_map(|r| (0..size).map(move |c| Position::new(r, c)))
        .collect();
    targets.shuffle(&mut SmallRng::seed_from_u64(seed.wrapping_add(1)));

    let mut player_shots = 0usize;
    let mut player_hits = 0usize;
    let mut opponent_moves = 0usize;
    let mut winner = None;
    'game: for target in targets {
        send(
            &mut client,
            ClientMessage::Attack(protocol::AttackRequest {
                position: target.to_string(),
            }),
        )
        .await?;
        player_shots += 1;
        loop {
            match recv(&mut client).await? {
                ServerMessage::AttackResult(res) if res.by == Attacker::Player => {
                    if res.result == protocol::ShotResult::Hit {
                        player_hits += 1;
                    }
                }
                ServerMessage::AttackResult(_) => opponent_moves += 1,
                ServerMessage::Turn(_) => break,
                ServerMessage::GameOver(over) => {
                    winner = Some(over.winner);
                    break 'game;
                }
                other => anyhow::bail!("unexpected reply: {:?}", other),
            }
        }
    }

    send(&mut client, ClientMessage::GetRecords).await?;
    let stats = match recv(&mut client).await? {
        ServerMessage::Records(records) => records.get("sim").cloned(),
        _ => None,
    };
    send(&mut client, ClientMessage::Exit).await?;
    recv(&mut client).await?;
    server.await??;

    let result = json!({
        "seed": seed,
        "boardSize": size,
        "winner": winner.map(|w| format!("{:?}", w)),
        "playerShots": player_shots,
        "playerHits": player_hits,
        "opponentMoves": opponent_moves,
        "recordedAccuracy": stats.map(|s| s.accuracy()),
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
