//! Line-oriented driver over the document API.
//!
//! # Responsibility
//! - Read one command per stdin line and print the response envelope.
//! - Resolve logging configuration from the environment once per process.
//!
//! Commands:
//! `create <json>`, `get <id> [media-type]`, `update <id> <json>`,
//! `delete <id>`, `ping`, `version`.

use docstore_api::{ApiResponse, DocumentApi, STATUS_BAD_REQUEST, STATUS_OK};
use docstore_core::{default_log_level, init_logging, DocumentRepository};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::OnceLock;

const LOG_LEVEL_ENV: &str = "DOCSTORE_LOG_LEVEL";
const LOG_DIR_ENV: &str = "DOCSTORE_LOG_DIR";
const DEFAULT_LOG_DIR_NAME: &str = "docstore-logs";

static LOG_CONFIG: OnceLock<LogConfig> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
struct LogConfig {
    level: String,
    dir: PathBuf,
}

fn main() {
    let config = resolve_log_config();
    let dir = config.dir.to_string_lossy();
    if let Err(err) = init_logging(&config.level, &dir) {
        eprintln!("docstore: file logging disabled: {err}");
    }

    let api = DocumentApi::in_memory();
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("docstore: failed to read stdin: {err}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = run_command(&api, line.trim());
        if writeln!(stdout, "{}", render(&response)).is_err() {
            break;
        }
    }
}

fn resolve_log_config() -> &'static LogConfig {
    LOG_CONFIG.get_or_init(|| LogConfig {
        level: env_or(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
        dir: env_or(LOG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME)),
    })
}

fn env_or(name: &str) -> Option<String> {
    let raw = std::env::var(name).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn run_command<R: DocumentRepository>(api: &DocumentApi<R>, line: &str) -> ApiResponse {
    let (command, rest) = split_word(line);
    match command {
        "create" => api.create_document(rest),
        "get" => {
            let (id, accept) = split_word(rest);
            let accept = (!accept.is_empty()).then_some(accept);
            api.get_document(id, accept)
        }
        "update" => {
            let (id, body) = split_word(rest);
            api.update_document(id, body)
        }
        "delete" => api.delete_document(rest),
        "ping" => text_response(docstore_core::ping()),
        "version" => text_response(docstore_core::core_version()),
        other => ApiResponse {
            status: STATUS_BAD_REQUEST,
            content_type: Some("text/plain"),
            body: format!("unknown command `{other}`"),
        },
    }
}

fn text_response(body: &str) -> ApiResponse {
    ApiResponse {
        status: STATUS_OK,
        content_type: Some("text/plain"),
        body: body.to_string(),
    }
}

/// Splits off the first whitespace-delimited word.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn render(response: &ApiResponse) -> String {
    format!(
        "{} {} {}",
        response.status,
        response.content_type.unwrap_or("-"),
        response.body
    )
    .trim_end()
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::{render, run_command, split_word};
    use docstore_api::DocumentApi;

    #[test]
    fn split_word_separates_command_from_arguments() {
        assert_eq!(split_word("get  doc-1  application/xml"), ("get", "doc-1  application/xml"));
        assert_eq!(split_word("ping"), ("ping", ""));
    }

    #[test]
    fn commands_drive_full_document_lifecycle() {
        let api = DocumentApi::in_memory();

        let created = run_command(&api, r#"create {"id":"doc-1","tags":["a"],"data":{"k":1}}"#);
        assert_eq!(created.status, 201);

        let xml = run_command(&api, "get doc-1 application/xml");
        assert_eq!(
            render(&xml),
            r#"200 application/xml <document><id>doc-1</id><tags><tag>a</tag></tags><data>{"k":1}</data></document>"#
        );

        let updated = run_command(&api, r#"update doc-1 {"data":[1]}"#);
        assert_eq!(updated.status, 200);

        assert_eq!(render(&run_command(&api, "delete doc-1")), "204 -");
        assert_eq!(run_command(&api, "get doc-1").status, 404);
    }

    #[test]
    fn unknown_command_is_rejected() {
        let api = DocumentApi::in_memory();
        let response = run_command(&api, "explode now");
        assert_eq!(response.status, 400);
        assert!(response.body.contains("explode"));
    }
}
