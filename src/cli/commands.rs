use serde_json::Value;

use crate::cli::config::{AppConfig, FormArgs};
use crate::draft::medium::FileMedium;
use crate::draft::store::DraftStore;
use crate::identity::storage_key::derive_key;
use crate::schema::field_model::FormSchema;
use crate::session::controller::FormSession;
use crate::session::notify::ConsoleNotifier;
use crate::session::session_model::{SubmitOutcome, UiEffect};
use crate::session::submit::{HttpSubmitter, StdoutSubmitter, Submitter};
use crate::trace::logger::TraceLogger;

pub type CliSession = FormSession<FileMedium, Box<dyn Submitter>, ConsoleNotifier>;

// ============================================================================
// Form resolution
// ============================================================================

/// Load the schema (if any) and apply `--table` / `--view` overrides.
pub fn resolve_form(form: &FormArgs) -> Result<FormSchema, Box<dyn std::error::Error>> {
    let mut schema = match &form.schema {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read schema '{}': {}", path, e))?;
            FormSchema::from_yaml(&content)
                .map_err(|e| format!("invalid schema '{}': {}", path, e))?
        }
        None => FormSchema::default(),
    };

    if form.table.is_some() {
        schema.table_id = form.table.clone();
    }
    if form.view.is_some() {
        schema.view_id = form.view.clone();
    }
    Ok(schema)
}

/// Parse a CLI value as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

pub fn open_store(config: &AppConfig, store_path: Option<&str>) -> DraftStore<FileMedium> {
    let path = store_path.unwrap_or(config.store.path.as_str());
    DraftStore::with_key(FileMedium::new(path), &config.store.medium_key)
}

fn open_session(
    config: &AppConfig,
    store_path: Option<&str>,
    schema: &FormSchema,
    submitter: Box<dyn Submitter>,
) -> CliSession {
    let session = FormSession::mount(
        open_store(config, store_path),
        submitter,
        ConsoleNotifier,
        schema.identity(),
        &schema.resolved_fields(),
        config.session_options(),
    );

    match &config.trace.path {
        Some(path) => session.with_tracer(TraceLogger::new(path)),
        None => session,
    }
}

fn print_effects(session: &mut CliSession, verbose: u8) {
    for effect in session.take_effects() {
        match effect {
            UiEffect::FocusField(id) => eprintln!("-> focus field '{}'", id),
            UiEffect::ScrollToTop if verbose > 0 => eprintln!("-> scroll to top"),
            UiEffect::SetInteractive(on) if verbose > 1 => {
                eprintln!("-> input {}", if on { "enabled" } else { "disabled" })
            }
            _ => {}
        }
    }
}

// ============================================================================
// key / show
// ============================================================================

pub fn cmd_key(table: Option<&str>, view: Option<&str>) {
    let key = derive_key(table, view);
    if key.is_placeholder() {
        eprintln!("(placeholder key: table or view id missing)");
    }
    println!("{}", key);
}

pub fn cmd_show(
    config: &AppConfig,
    store_path: Option<&str>,
    form: &FormArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let schema = resolve_form(form)?;
    let store = open_store(config, store_path);
    let draft = store.try_load()?.remove(&schema.identity().storage_key()).unwrap_or_default();

    println!("{}", serde_json::to_string_pretty(&draft)?);
    Ok(())
}

// ============================================================================
// set / clear
// ============================================================================

pub fn cmd_set(
    config: &AppConfig,
    store_path: Option<&str>,
    form: &FormArgs,
    field: &str,
    raw_value: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let schema = resolve_form(form)?;
    let mut session = open_session(config, store_path, &schema, Box::new(StdoutSubmitter));

    session.set_field(field, parse_value(raw_value))?;
    session.settle();
    session.dispose();
    Ok(())
}

pub fn cmd_clear(
    config: &AppConfig,
    store_path: Option<&str>,
    form: &FormArgs,
    field: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let schema = resolve_form(form)?;
    let mut session = open_session(config, store_path, &schema, Box::new(StdoutSubmitter));

    session.clear_field(field)?;
    session.settle();
    session.dispose();
    Ok(())
}

// ============================================================================
// verify / submit / reset
// ============================================================================

/// Returns whether every required field is filled.
pub fn cmd_verify(
    config: &AppConfig,
    store_path: Option<&str>,
    form: &FormArgs,
) -> Result<bool, Box<dyn std::error::Error>> {
    let schema = resolve_form(form)?;
    let mut session = open_session(config, store_path, &schema, Box::new(StdoutSubmitter));

    let verification = session.verify();
    if verification.ok {
        println!("ok");
    } else {
        let missing = session.errors().in_display_order(session.fields());
        println!("missing required: {}", missing.join(", "));
        if let Some(first) = &verification.first_failing {
            eprintln!("-> focus field '{}'", first);
        }
    }
    session.dispose();
    Ok(verification.ok)
}

/// Returns whether the draft was submitted.
pub fn cmd_submit(
    config: &AppConfig,
    store_path: Option<&str>,
    form: &FormArgs,
    endpoint: Option<&str>,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let schema = resolve_form(form)?;
    let submitter: Box<dyn Submitter> = match endpoint.or(config.submit.endpoint.as_deref()) {
        Some(url) => Box::new(HttpSubmitter::new(url)),
        None => Box::new(StdoutSubmitter),
    };
    let mut session = open_session(config, store_path, &schema, submitter);

    if verbose > 0 {
        eprintln!(
            "{} '{}' ({})",
            schema.view.options.submit_label_or_default(),
            schema.view.name,
            session.key()
        );
    }

    let outcome = session.submit()?;
    session.settle();
    print_effects(&mut session, verbose);
    session.dispose();

    match outcome {
        SubmitOutcome::Submitted { .. } => Ok(true),
        SubmitOutcome::Invalid { .. } => {
            let missing = session.errors().in_display_order(session.fields());
            println!("missing required: {}", missing.join(", "));
            Ok(false)
        }
        SubmitOutcome::Rejected(_) => Ok(false),
    }
}

pub fn cmd_reset(
    config: &AppConfig,
    store_path: Option<&str>,
    form: &FormArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let schema = resolve_form(form)?;
    let mut session = open_session(config, store_path, &schema, Box::new(StdoutSubmitter));

    session.reset()?;
    session.dispose();
    Ok(())
}
