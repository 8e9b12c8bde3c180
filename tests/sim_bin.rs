use std::process::Command;

#[test]
fn sim_binary_smoke() {
    let output = Command::new(env!("CARGO_BIN_EXE_sim"))
        .args(["1", "10"])
        .output()
        .expect("failed to run sim binary");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("non utf8 output");
    let v: serde_json::Value = serde_json::from_str(stdout.trim()).expect("invalid json");
    assert!(v["winner"].is_string());
    assert_eq!(v["boardSize"], 10);
    assert!(v["recordedAccuracy"].is_number());
}

#[test]
fn sim_binary_rejects_bad_size() {
    let output = Command::new(env!("CARGO_BIN_EXE_sim"))
        .args(["1", "4"])
        .output()
        .expect("failed to run sim binary");
    assert!(!output.status.success());
}
