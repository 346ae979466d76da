use std::fs;
use std::path::PathBuf;
use std::process::Output;

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("cmatch_cli_test_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

const GRAMMAR: &str = r#"version: "1.0"
commands:
  - name: greet
    description: say hello
    arguments:
      - kind: constant
        text: hello
        insensitive: true
      - kind: switch
        name: loud
      - kind: flag
        name: times
        type: integer
        default: 1
      - kind: variable
        name: who
        default: world
  - name: set
    arguments:
      - kind: constant
        text: set
      - kind: switch
        name: v
      - kind: variable
        name: key
      - kind: variable
        name: ratio
        type: float
        default: 0.5
  - name: echo
    arguments:
      - kind: variadic
        name: words
"#;

fn write_grammar(dir: &TempDir, yaml: &str) -> PathBuf {
    let path = dir.join("grammar.yaml");
    fs::write(&path, yaml).expect("failed to write grammar");
    path
}

fn cmatch(grammar: &PathBuf, options: &[&str], tokens: &[&str]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_cmatch"))
        .arg("--grammar")
        .arg(grammar)
        .args(options)
        .arg("--")
        .args(tokens)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run cmatch")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[test]
fn match_reports_every_matching_command() {
    let dir = TempDir::new("match_all");
    let grammar = write_grammar(&dir, GRAMMAR);

    let output = cmatch(&grammar, &[], &["HELLO", "--loud", "bob"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json = stdout_json(&output);
    let matches = json["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0]["command"], "greet");
    assert_eq!(matches[0]["values"], serde_json::json!([true, 1, "bob"]));
    assert_eq!(matches[1]["command"], "echo");
    assert_eq!(matches[1]["values"], serde_json::json!(["HELLO", "--loud", "bob"]));
    assert!(json.get("closest").is_none());
}

#[test]
fn first_stops_after_one_match() {
    let dir = TempDir::new("match_first");
    let grammar = write_grammar(&dir, GRAMMAR);

    let output = cmatch(&grammar, &["--first"], &["hello"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    let matches = json["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["index"], 0);
    assert_eq!(matches[0]["values"], serde_json::json!([false, 1, "world"]));
}

#[test]
fn bool_switch_leaves_positional_value() {
    let dir = TempDir::new("switch_positional");
    let grammar = write_grammar(&dir, GRAMMAR);

    let output = cmatch(&grammar, &["--first"], &["set", "-v", "key", "0.25"]);
    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output)["matches"][0]["values"],
        serde_json::json!([true, "key", 0.25])
    );
}

#[test]
fn no_match_reports_closest_command() {
    let dir = TempDir::new("no_match");
    let yaml = GRAMMAR.split("  - name: echo").next().unwrap();
    let grammar = write_grammar(&dir, yaml);

    let output = cmatch(&grammar, &[], &["set", "-v"]);
    assert_eq!(output.status.code(), Some(2));

    let json = stdout_json(&output);
    assert!(json["matches"].as_array().unwrap().is_empty());
    assert_eq!(json["closest"]["command"], "set");
    assert_eq!(json["closest"]["consumed"], 2);
    assert_eq!(json["closest"]["error"], "argument not found");
}

// ---------------------------------------------------------------------------
// Check and usage
// ---------------------------------------------------------------------------

#[test]
fn check_reports_every_command() {
    let dir = TempDir::new("check");
    let grammar = write_grammar(&dir, GRAMMAR);

    let output = cmatch(&grammar, &["--check"], &["set", "k", "x"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["matched"], false);
    assert_eq!(entries[0]["consumed"], 0);
    assert_eq!(entries[1]["command"], "set");
    assert_eq!(entries[1]["matched"], false);
    assert_eq!(entries[1]["consumed"], 2);
    assert_eq!(entries[2]["matched"], true);
    assert_eq!(entries[2]["consumed"], 3);
}

#[test]
fn usage_lists_synopses() {
    let dir = TempDir::new("usage");
    let grammar = write_grammar(&dir, GRAMMAR);

    let output = cmatch(&grammar, &["--usage"], &[]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("say hello:\t> hello [--loud] [--times] [who]"));
    assert!(stdout.contains("set:\t> set [-v] <key> [ratio]"));
    assert!(stdout.contains("echo:\t> [words...]"));
}

#[test]
fn bundled_demo_grammar_compiles() {
    let grammar = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/grammars/demo.yaml"));

    let output = cmatch(&grammar, &[], &["sum", "a", "ff"]);
    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output)["matches"][0]["values"],
        serde_json::json!([10, 255])
    );
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn invalid_grammar_names_the_command() {
    let dir = TempDir::new("invalid");
    let grammar = write_grammar(
        &dir,
        r#"version: "1.0"
commands:
  - name: broken
    arguments:
      - kind: variable
        name: "not a name"
"#,
    );

    let output = cmatch(&grammar, &[], &["x"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("command 'broken'"), "stderr: {stderr}");
}

#[test]
fn missing_grammar_file_fails() {
    let dir = TempDir::new("missing");
    let output = cmatch(&dir.join("nope.yaml"), &[], &["x"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load grammar"));
}
