use std::process::{Command, Stdio};

use battleship_server::{MemoryStore, RecordsHandle, Server, ServerConfig};

#[test]
fn serve_help_lists_flags() {
    let output = Command::new(env!("CARGO_BIN_EXE_battleship_server"))
        .args(["serve", "--help"])
        .output()
        .expect("failed to run server binary");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("non utf8 output");
    assert!(stdout.contains("--port"));
    assert!(stdout.contains("--records"));
}

#[tokio::test(flavor = "multi_thread")]
async fn client_exits_with_bye_when_stdin_closes() -> anyhow::Result<()> {
    let config = ServerConfig {
        port: 0,
        ..ServerConfig::default()
    };
    let server = Server::bind(config, RecordsHandle::spawn(MemoryStore::default())).await?;
    let addr = server.local_addr()?;
    tokio::spawn(server.run());

    let output = tokio::task::spawn_blocking(move || {
        Command::new(env!("CARGO_BIN_EXE_battleship_server"))
            .args(["client", "--connect", &addr.to_string()])
            .stdin(Stdio::null())
            .output()
    })
    .await??;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Server ready"));
    assert!(stdout.contains("Goodbye"));
    Ok(())
}
