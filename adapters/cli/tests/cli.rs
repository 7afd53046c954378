use std::{env, fs, process::Command};

const BIN: &str = env!("CARGO_BIN_EXE_los-gemini");

fn los_gemini() -> Command {
    let mut command = Command::new(BIN);
    let _ = command.env_remove("GEMINI_API_KEY").env("RUST_LOG", "off");
    command
}

#[test]
fn offline_run_with_default_script_succeeds() {
    let status = los_gemini()
        .args(["--frames", "600", "--grid-size", "4"])
        .status()
        .expect("failed to run los-gemini");
    assert!(status.success());
}

#[test]
fn dump_city_writes_the_layout() {
    let path = env::temp_dir().join(format!("los-gemini-city-{}.json", std::process::id()));
    let status = los_gemini()
        .args(["--frames", "0", "--seed", "7", "--grid-size", "5", "--dump-city"])
        .arg(&path)
        .status()
        .expect("failed to run los-gemini");
    assert!(status.success());

    let text = fs::read_to_string(&path).expect("dump exists");
    let json: serde_json::Value = serde_json::from_str(&text).expect("dump is JSON");
    assert_eq!(json["seed"], 7);
    assert_eq!(json["grid_size"], 5);
    assert_eq!(json["layout"]["landmarks"].as_array().map(Vec::len), Some(7));
    let _ = fs::remove_file(&path);
}

#[test]
fn malformed_script_is_rejected() {
    let output = los_gemini()
        .args(["--frames", "1", "--script", "10:moonwalk"])
        .output()
        .expect("failed to run los-gemini");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("moonwalk"), "stderr was: {stderr}");
}
