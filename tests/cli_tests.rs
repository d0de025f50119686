use clap::Parser;
use form_session::cli::commands::{
    cmd_clear, cmd_reset, cmd_set, cmd_submit, cmd_verify, open_store, parse_value, resolve_form,
};
use form_session::cli::config::{AppConfig, Cli, Commands, FormArgs, load_config, log_level};
use form_session::identity::storage_key::derive_key;
use serde_json::json;

const SCHEMA: &str = r#"
tableId: tblOrders
viewId: viwForm
fields:
  - id: customer
    required: true
  - id: note
  - id: total
    isComputed: true
view:
  name: New order
  columnMeta:
    customer:
      required: true
"#;

struct Workspace {
    _dir: tempfile::TempDir,
    schema: String,
    store: String,
}

fn workspace() -> Workspace {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("schema.yaml");
    std::fs::write(&schema, SCHEMA).unwrap();
    let store = dir.path().join("drafts.json");
    Workspace {
        schema: schema.display().to_string(),
        store: store.display().to_string(),
        _dir: dir,
    }
}

fn form_args(ws: &Workspace) -> FormArgs {
    FormArgs {
        schema: Some(ws.schema.clone()),
        ..FormArgs::default()
    }
}

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_key() {
    let cli = Cli::parse_from(["form-session", "key", "--table", "t1", "--view", "v1"]);
    match cli.command {
        Commands::Key { table, view } => {
            assert_eq!(table.as_deref(), Some("t1"));
            assert_eq!(view.as_deref(), Some("v1"));
        }
        _ => panic!("Expected Key command"),
    }
    assert_eq!(cli.verbose, 0);
}

#[test]
fn cli_parse_set_with_globals() {
    let cli = Cli::parse_from([
        "form-session",
        "-vv",
        "--store",
        "drafts.json",
        "set",
        "--schema",
        "form.yaml",
        "--field",
        "customer",
        "--value",
        "\"ACME\"",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.store.as_deref(), Some("drafts.json"));
    match cli.command {
        Commands::Set { form, field, value } => {
            assert_eq!(form.schema.as_deref(), Some("form.yaml"));
            assert_eq!(form.table, None);
            assert_eq!(field, "customer");
            assert_eq!(value, "\"ACME\"");
        }
        _ => panic!("Expected Set command"),
    }
}

#[test]
fn cli_parse_submit_endpoint() {
    let cli = Cli::parse_from([
        "form-session",
        "submit",
        "--table",
        "t",
        "--view",
        "v",
        "--endpoint",
        "http://localhost:9000/forms",
    ]);
    match cli.command {
        Commands::Submit { form, endpoint } => {
            assert_eq!(form.table.as_deref(), Some("t"));
            assert_eq!(endpoint.as_deref(), Some("http://localhost:9000/forms"));
        }
        _ => panic!("Expected Submit command"),
    }
}

#[test]
fn cli_requires_field_for_set() {
    let result = Cli::try_parse_from(["form-session", "set", "--value", "1"]);
    assert!(result.is_err());
}

#[test]
fn verbosity_maps_to_log_levels() {
    assert_eq!(log_level(0), log::LevelFilter::Warn);
    assert_eq!(log_level(1), log::LevelFilter::Info);
    assert_eq!(log_level(2), log::LevelFilter::Debug);
    assert_eq!(log_level(7), log::LevelFilter::Trace);
}

// ============================================================================
// Config loading
// ============================================================================

#[test]
fn missing_config_gives_defaults() {
    let config = load_config(Some("/definitely/not/here.yaml"));
    assert_eq!(config.store.path, ".form-drafts.json");
    assert_eq!(config.store.medium_key, "formDrafts");
    assert_eq!(config.timing.debounce_ms, 0);
    assert_eq!(config.timing.settle_delay_ms, 500);
    assert_eq!(config.notify.duration_ms, 2000);
    assert!(config.submit.endpoint.is_none());
    assert!(config.trace.path.is_none());
}

#[test]
fn partial_config_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("form-session.yaml");
    std::fs::write(
        &path,
        "timing:\n  settle_delay_ms: 1000\nnotify:\n  success_title: Thanks!\n",
    )
    .unwrap();

    let config = load_config(path.to_str());
    assert_eq!(config.timing.settle_delay_ms, 1000);
    assert_eq!(config.timing.debounce_ms, 0);
    assert_eq!(config.notify.success_title, "Thanks!");
    assert_eq!(config.notify.error_title, "Submission failed");
    assert_eq!(config.session_options().timing.settle_delay_ms, 1000);
}

#[test]
fn malformed_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "timing: [unclosed").unwrap();

    let config = load_config(path.to_str());
    assert_eq!(config.timing.settle_delay_ms, 500);
}

// ============================================================================
// Helpers
// ============================================================================

#[test]
fn parse_value_prefers_json() {
    assert_eq!(parse_value("42"), json!(42));
    assert_eq!(parse_value("true"), json!(true));
    assert_eq!(parse_value("null"), json!(null));
    assert_eq!(parse_value("[\"a\"]"), json!(["a"]));
    assert_eq!(parse_value("plain text"), json!("plain text"));
}

#[test]
fn flags_override_schema_identity() {
    let ws = workspace();
    let mut args = form_args(&ws);
    args.view = Some("viwOther".into());

    let schema = resolve_form(&args).unwrap();
    assert_eq!(schema.table_id.as_deref(), Some("tblOrders"));
    assert_eq!(schema.view_id.as_deref(), Some("viwOther"));
}

#[test]
fn unreadable_schema_is_an_error() {
    let args = FormArgs {
        schema: Some("/no/such/schema.yaml".into()),
        ..FormArgs::default()
    };
    assert!(resolve_form(&args).is_err());
}

// ============================================================================
// Command flow against a file-backed store
// ============================================================================

#[test]
fn set_verify_submit_cycle() {
    let ws = workspace();
    let config = AppConfig::default();
    let args = form_args(&ws);
    let store = Some(ws.store.as_str());
    let key = derive_key(Some("tblOrders"), Some("viwForm"));

    assert!(!cmd_verify(&config, store, &args).unwrap(), "customer missing");
    assert!(!cmd_submit(&config, store, &args, None, 0).unwrap());

    cmd_set(&config, store, &args, "note", "call first").unwrap();
    cmd_set(&config, store, &args, "customer", "\"ACME\"").unwrap();
    let saved = open_store(&config, store).entry(&key);
    assert_eq!(saved.get("customer"), Some(&json!("ACME")));
    assert_eq!(saved.get("note"), Some(&json!("call first")));

    assert!(cmd_set(&config, store, &args, "total", "10").is_err(), "computed field");

    assert!(cmd_verify(&config, store, &args).unwrap());
    assert!(cmd_submit(&config, store, &args, None, 0).unwrap());
    assert!(open_store(&config, store).entry(&key).is_empty(), "cleared after submit");
}

#[test]
fn clear_and_reset_commands() {
    let ws = workspace();
    let config = AppConfig::default();
    let args = form_args(&ws);
    let store = Some(ws.store.as_str());
    let key = derive_key(Some("tblOrders"), Some("viwForm"));

    cmd_set(&config, store, &args, "customer", "ACME").unwrap();
    cmd_set(&config, store, &args, "note", "n").unwrap();

    cmd_clear(&config, store, &args, "note").unwrap();
    let saved = open_store(&config, store).entry(&key);
    assert_eq!(saved.len(), 1);

    cmd_reset(&config, store, &args).unwrap();
    assert!(open_store(&config, store).entry(&key).is_empty());
}

#[test]
fn other_forms_survive_reset() {
    let ws = workspace();
    let config = AppConfig::default();
    let store = Some(ws.store.as_str());
    let args = form_args(&ws);
    let mut other = form_args(&ws);
    other.view = Some("viwSecond".into());

    cmd_set(&config, store, &args, "customer", "one").unwrap();
    cmd_set(&config, store, &other, "customer", "two").unwrap();
    cmd_reset(&config, store, &args).unwrap();

    let saved = open_store(&config, store).entry(&derive_key(Some("tblOrders"), Some("viwSecond")));
    assert_eq!(saved.get("customer"), Some(&json!("two")));
}
