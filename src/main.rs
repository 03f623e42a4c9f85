/*============================================================
  Synavera Project: bugsnag_notifier
  Module: bugsnag_notifier::main
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Entry point for `bugsnag-notify`. Reports a single error
    described on the command line, for shell scripts and
    deployment hooks that have no embedded notifier.

  Security / Safety Notes:
    Prefer BUGSNAG_API_KEY over --api-key so the key does not
    appear in process listings. Performs one HTTP(S) POST.

  Dependencies:
    clap for CLI parsing, chrono for session log naming.

  Operational Scope:
    Invoked by operators or CI jobs; exit codes follow
    NotifierError::exit_code.

  Revision History:
    2026-10-16 COD  Authored bugsnag-notify runtime.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Result-first error handling with deterministic exits
    - Structured logging following Synavera cadence
    - Configurable execution via CLI and config file
============================================================*/

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::Utc;
use clap::{ArgAction, Parser};
use serde_json::Value;

use bugsnag_notifier::{
    Client, Logger, MetaData, NotifierError, NotifierSettings, RawError, Result,
};

/// Command-line arguments for bugsnag-notify.
#[derive(Debug, Parser)]
#[command(
    name = "bugsnag-notify",
    version,
    about = "Report an error to Bugsnag from the command line"
)]
struct Cli {
    /// Override settings file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// API key (overrides settings and BUGSNAG_API_KEY).
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,
    /// Send over HTTPS.
    #[arg(long, action = ArgAction::SetTrue)]
    ssl: bool,
    #[arg(long, value_name = "STAGE")]
    release_stage: Option<String>,
    #[arg(long, value_name = "CONTEXT")]
    context: Option<String>,
    #[arg(long, value_name = "ID")]
    user_id: Option<String>,
    #[arg(long, value_name = "VERSION")]
    app_version: Option<String>,
    /// Error class reported for the event.
    #[arg(long, value_name = "CLASS")]
    error_class: String,
    /// Error message reported for the event.
    #[arg(long, value_name = "TEXT")]
    message: String,
    /// Source file of the error; reports a single-frame error.
    #[arg(long, value_name = "PATH")]
    file: Option<String>,
    /// Line within --file.
    #[arg(long, value_name = "N", requires = "file")]
    line: Option<u32>,
    /// Metadata entry; VALUE is parsed as JSON, else kept as a string.
    #[arg(long = "meta", value_name = "KEY=VALUE", action = ArgAction::Append)]
    meta: Vec<String>,
    /// Print the payload instead of sending it.
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,
    /// Session log file path.
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
    /// Enable verbose logging to stderr.
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("[bugsnag-notify] {}", err);
            err.exit_code()
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut settings = NotifierSettings::load_from_optional_path(cli.config.as_deref())?;
    if let Some(key) = cli.api_key.clone() {
        settings.api_key = Some(key);
    }
    if cli.ssl {
        settings.use_ssl = true;
    }

    let logger = Arc::new(Logger::new(cli.log.clone(), cli.verbose)?);
    logger.info(
        "INIT",
        format!("bugsnag-notify session {}", Utc::now().format("%Y-%m-%d_%H-%M-%S")),
    );

    let mut client = Client::from_settings(settings)?;
    client.set_logger(logger.clone());
    if let Some(stage) = cli.release_stage.clone() {
        client.set_release_stage(stage);
    }
    if let Some(context) = cli.context.clone() {
        client.set_context(context);
    }
    if let Some(user_id) = cli.user_id.clone() {
        client.set_user_id(user_id);
    }
    if let Some(version) = cli.app_version.clone() {
        client.set_app_version(version);
    }

    let meta_data = parse_meta(&cli.meta)?;
    let error = match &cli.file {
        Some(file) => RawError::structural(
            &cli.error_class,
            &cli.message,
            file,
            cli.line.unwrap_or(1),
        ),
        None => RawError::native(&cli.error_class, &cli.message, Vec::new()),
    };

    if cli.dry_run {
        let body = client.build_payload(error, meta_data)?;
        let rendered = String::from_utf8(body).map_err(|err| {
            NotifierError::Serialization(format!("Payload is not UTF-8: {err}"))
        })?;
        println!("{rendered}");
        logger.info("DRYRUN", "Payload printed; nothing sent");
    } else {
        client.notify(error, meta_data)?;
        logger.info("COMPLETE", format!("Reported {}", cli.error_class));
    }

    if let Some(hash_path) = logger.finalize()? {
        logger.debug("LOG", format!("Digest written to {}", hash_path.display()));
    }
    Ok(ExitCode::SUCCESS)
}

fn parse_meta(entries: &[String]) -> Result<MetaData> {
    let mut meta = MetaData::new();
    for entry in entries {
        let (key, raw) = entry.split_once('=').ok_or_else(|| {
            NotifierError::Config(format!("Metadata `{entry}` is not KEY=VALUE"))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(NotifierError::Config(format!(
                "Metadata `{entry}` has an empty key"
            )));
        }
        let value =
            serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        meta.insert(key.to_string(), value);
    }
    Ok(meta)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn meta_values_parse_as_json_or_string() {
        let meta = parse_meta(&[
            "request={\"path\":\"/pay\"}".to_string(),
            "host=web-1".to_string(),
            "retries=3".to_string(),
        ])
        .unwrap();
        assert_eq!(meta["request"], json!({"path": "/pay"}));
        assert_eq!(meta["host"], json!("web-1"));
        assert_eq!(meta["retries"], json!(3));
    }

    #[test]
    fn malformed_meta_is_rejected() {
        assert!(parse_meta(&["no-equals".to_string()]).is_err());
        assert!(parse_meta(&["=value".to_string()]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
