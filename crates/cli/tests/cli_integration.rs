use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::tempdir;

const BIN: &str = env!("CARGO_BIN_EXE_xhash");

fn run(args: &[&str]) -> std::process::Output {
    Command::new(BIN)
        .args(args)
        .env_remove("XELIS_HASH_ENGINE")
        .output()
        .expect("run xhash")
}

fn stdout(out: &std::process::Output) -> String {
    String::from_utf8(out.stdout.clone()).unwrap()
}

#[test]
fn hash_text_matches_library() {
    let out = run(&["hash", "Hello, XELIS!"]);
    assert!(out.status.success());
    let expected = xelis_hash_corelib::hash_text("Hello, XELIS!").unwrap();
    assert_eq!(stdout(&out).trim(), expected);
    assert_eq!(expected.len(), 64);
}

#[test]
fn hash_hex_and_file_inputs_agree() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("input.bin");
    fs::write(&path, b"XELIS").unwrap();

    let from_text = run(&["hash", "XELIS"]);
    let from_hex = run(&["hash", "--hex", "58454c4953"]);
    let from_file = run(&["hash", "--file", path.to_str().unwrap()]);
    assert!(from_text.status.success());
    assert_eq!(stdout(&from_text), stdout(&from_hex));
    assert_eq!(stdout(&from_text), stdout(&from_file));
}

#[test]
fn hash_rejects_two_inputs() {
    let out = run(&["hash", "XELIS", "--hex", "00"]);
    assert!(!out.status.success());
}

#[test]
fn iter_chains_and_zero_echoes() {
    let out = run(&["iter", "3", "XELIS"]);
    assert!(out.status.success());
    let expected = xelis_hash_corelib::hash_iterated(b"XELIS", 3).unwrap();
    assert_eq!(stdout(&out).trim(), xelis_hash_corelib::bytes_to_hex(&expected));

    let zero = run(&["iter", "0", "XELIS"]);
    assert_eq!(stdout(&zero).trim(), "58454c4953");
}

#[test]
fn batch_from_stdin_is_line_aligned() {
    let mut child = Command::new(BIN)
        .arg("batch")
        .env_remove("XELIS_HASH_ENGINE")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn batch");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"XELIS\nBlockchain\nWASM\nRust\n")
        .unwrap();
    let out = child.wait_with_output().unwrap();
    assert!(out.status.success());

    let lines: Vec<String> = stdout(&out).lines().map(str::to_owned).collect();
    assert_eq!(lines.len(), 4);
    for (line, word) in lines.iter().zip(["XELIS", "Blockchain", "WASM", "Rust"]) {
        assert_eq!(line, &xelis_hash_corelib::hash_text(word).unwrap());
    }
}

#[test]
fn batch_file_accepts_non_utf8_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("raw.bin");
    fs::write(&path, b"\xff\xfe\x00\nplain\r\n").unwrap();
    let out = run(&["batch", "--file", path.to_str().unwrap()]);
    assert!(out.status.success());

    let expected = xelis_hash_corelib::hash_batch(&[&b"\xff\xfe\x00"[..], &b"plain"[..]]).unwrap();
    let lines: Vec<&str> = std::str::from_utf8(&out.stdout).unwrap().lines().collect();
    assert_eq!(lines, [expected[0].to_hex(), expected[1].to_hex()]);
}

#[test]
fn batch_hex_file_reports_bad_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lines.txt");
    fs::write(&path, "00ff\nnot-hex\n").unwrap();
    let out = run(&["batch", "--hex", "--file", path.to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("line 2"));
}

#[test]
fn verify_exit_codes() {
    let a = xelis_hash_corelib::hash_text("a").unwrap();
    let b = xelis_hash_corelib::hash_text("b").unwrap();

    assert_eq!(run(&["verify", &a, &a.to_uppercase()]).status.code(), Some(0));
    assert_eq!(run(&["verify", &a, &b]).status.code(), Some(1));
    assert_eq!(run(&["verify", "abc", &a]).status.code(), Some(2));
}

#[test]
fn meta_outputs_json() {
    let out = run(&["meta", "XELIS"]);
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_str(&stdout(&out)).expect("json");
    assert_eq!(v["input_length"], serde_json::json!(5));
    assert_eq!(v["hash_length"], serde_json::json!(32));
    assert_eq!(v["hash_bytes"].as_array().map(Vec::len), Some(32));
    assert_eq!(
        v["hash_hex"],
        serde_json::json!(xelis_hash_corelib::hash_text("XELIS").unwrap())
    );
}

#[test]
fn size_and_engines() {
    assert_eq!(stdout(&run(&["size"])).trim(), "32");

    let engines = stdout(&run(&["engines"]));
    assert!(engines.contains("scratchpad"));
    assert!(engines.contains("blake3"));
    assert!(engines.contains("keccak256"));
    assert!(engines.contains("(default)"));
}

#[test]
fn engine_flag_and_config_file_select_engine() {
    let via_flag = run(&["--engine", "blake3", "hash", "XELIS"]);
    assert!(via_flag.status.success());
    assert_eq!(stdout(&via_flag).trim(), blake3::hash(b"XELIS").to_hex().as_str());

    let dir = tempdir().unwrap();
    let cfg = dir.path().join("xhash.toml");
    fs::write(&cfg, "engine = \"blake3\"\n").unwrap();
    let via_config = run(&["--config", cfg.to_str().unwrap(), "hash", "XELIS"]);
    assert_eq!(stdout(&via_config), stdout(&via_flag));
}

#[test]
fn unknown_engine_fails() {
    let out = run(&["--engine", "nope", "hash", "XELIS"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("nope"));
}
