use battleship_server::{
    JsonFileStore, MemoryStore, PlayerStats, PveOutcome, Records, RecordsHandle, RecordsStore,
};

const WIN_IN_FIVE: PveOutcome = PveOutcome {
    won: true,
    shots: 12,
    hits: 7,
    turns: 5,
};

const LOSS: PveOutcome = PveOutcome {
    won: false,
    shots: 20,
    hits: 3,
    turns: 20,
};

fn temp_records_path(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "battleship_records_{}_{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir.join("nested").join("records.json")
}

#[test]
fn test_win_then_loss_updates_streaks() {
    let mut stats = PlayerStats::default();
    stats.apply_pve_result(&WIN_IN_FIVE);
    assert_eq!(stats.pve_wins, 1);
    assert_eq!(stats.best_win_streak, 1);
    assert_eq!(stats.current_win_streak, 1);
    assert_eq!(stats.fastest_win_turns, Some(5));
    assert_eq!(stats.shots, 12);
    assert_eq!(stats.hits, 7);

    stats.apply_pve_result(&LOSS);
    assert_eq!(stats.pve_losses, 1);
    assert_eq!(stats.current_win_streak, 0);
    assert_eq!(stats.best_win_streak, 1);
    assert_eq!(stats.fastest_win_turns, Some(5));
    assert_eq!(stats.shots, 32);
}

#[test]
fn test_fastest_win_keeps_minimum() {
    let mut stats = PlayerStats::default();
    stats.apply_pve_result(&WIN_IN_FIVE);
    stats.apply_pve_result(&PveOutcome {
        turns: 9,
        ..WIN_IN_FIVE
    });
    stats.apply_pve_result(&PveOutcome {
        turns: 3,
        ..WIN_IN_FIVE
    });
    assert_eq!(stats.fastest_win_turns, Some(3));
    assert_eq!(stats.best_win_streak, 3);
}

#[test]
fn test_accuracy() {
    assert_eq!(PlayerStats::default().accuracy(), 0.0);
    let stats = PlayerStats {
        shots: 4,
        hits: 1,
        ..PlayerStats::default()
    };
    assert_eq!(stats.accuracy(), 0.25);
}

#[test]
fn test_records_json_shape() {
    let mut records = Records::default();
    records.ensure_player("ana").apply_pve_result(&WIN_IN_FIVE);
    let value = serde_json::to_value(&records).unwrap();
    let ana = &value["players"]["ana"];
    assert_eq!(ana["pveWins"], 1);
    assert_eq!(ana["bestWinStreak"], 1);
    assert_eq!(ana["fastestWinTurns"], 5);
    assert_eq!(ana["pvpWins"], 0);

    // missing fields fall back to defaults
    let parsed: Records = serde_json::from_str(r#"{"players":{"bob":{"pveWins":2}}}"#).unwrap();
    assert_eq!(parsed.get("bob").unwrap().pve_wins, 2);
    assert_eq!(parsed.get("bob").unwrap().fastest_win_turns, None);
}

#[tokio::test]
async fn test_json_store_missing_file_is_empty() -> anyhow::Result<()> {
    let path = temp_records_path("missing");
    let store = JsonFileStore::new(&path);
    assert_eq!(store.load().await?, Records::default());
    Ok(())
}

#[tokio::test]
async fn test_json_store_persists_across_instances() -> anyhow::Result<()> {
    let path = temp_records_path("persist");
    let mut records = Records::default();
    records.ensure_player("ana").apply_pve_result(&WIN_IN_FIVE);
    JsonFileStore::new(&path).save(&records).await?;

    let reloaded = JsonFileStore::new(&path).load().await?;
    assert_eq!(reloaded, records);
    assert!(!path.with_file_name("records.json.tmp").exists());
    Ok(())
}

#[tokio::test]
async fn test_json_store_rejects_corrupt_file() -> anyhow::Result<()> {
    let path = temp_records_path("corrupt");
    std::fs::create_dir_all(path.parent().unwrap())?;
    std::fs::write(&path, "{ not json")?;
    assert!(JsonFileStore::new(&path).load().await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_handle_records_and_snapshots() -> anyhow::Result<()> {
    let handle = RecordsHandle::spawn(MemoryStore::default());
    let stats = handle.record_pve("ana", WIN_IN_FIVE).await?;
    assert_eq!(stats.pve_wins, 1);
    let stats = handle.record_pve("ana", LOSS).await?;
    assert_eq!(stats.current_win_streak, 0);

    let snapshot = handle.snapshot().await?;
    assert_eq!(snapshot.get("ana"), Some(&stats));
    assert_eq!(snapshot.get("bob"), None);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_updates_are_not_lost() -> anyhow::Result<()> {
    let path = temp_records_path("concurrent");
    let handle = RecordsHandle::spawn(JsonFileStore::new(&path));

    let mut tasks = Vec::new();
    for i in 0..20 {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            let name = if i % 2 == 0 { "ana" } else { "bob" };
            handle.record_pve(name, WIN_IN_FIVE).await
        }));
    }
    for task in tasks {
        task.await??;
    }

    let on_disk = JsonFileStore::new(&path).load().await?;
    assert_eq!(on_disk.get("ana").unwrap().pve_wins, 10);
    assert_eq!(on_disk.get("bob").unwrap().pve_wins, 10);
    Ok(())
}
