use std::fs;
use std::io;
use std::path::Path;

use fastapi_output::RichOutput;
use serde::Serialize;
use serde_json::{Value, json};
use sqlmodel_console::OutputMode as SqlModelOutputMode;
use tracing_subscriber::EnvFilter;

use crate::error::{BootstrapError, Result};

/// Installs the stderr log subscriber; `RUST_LOG` overrides the `warn` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Output environment of this run: rich status lines for people, or a single
/// JSON line per command for tools.
#[derive(Debug, Clone, Serialize)]
pub struct OutputIntegration {
    pub fastapi_mode: String,
    pub fastapi_agent: bool,
    pub fastapi_ci: bool,
    pub fastapi_tty: bool,
    pub sqlmodel_mode: String,
    pub sqlmodel_agent: bool,
}

impl OutputIntegration {
    #[must_use]
    pub fn detect() -> Self {
        let fastapi_detection = fastapi_output::detect_environment();
        let fastapi_mode = fastapi_output::OutputMode::auto();
        let sqlmodel_mode = SqlModelOutputMode::detect();
        Self {
            fastapi_mode: fastapi_mode.as_str().to_string(),
            fastapi_agent: fastapi_detection.is_agent,
            fastapi_ci: fastapi_detection.is_ci,
            fastapi_tty: fastapi_detection.is_tty,
            sqlmodel_mode: sqlmodel_mode.as_str().to_string(),
            sqlmodel_agent: SqlModelOutputMode::is_agent_environment(),
        }
    }

    #[must_use]
    pub fn should_emit_json(&self) -> bool {
        self.sqlmodel_mode == "json"
    }

    /// Status lines go nowhere in JSON mode.
    #[must_use]
    pub fn status(&self) -> StatusLine {
        StatusLine {
            rich: (!self.should_emit_json()).then(RichOutput::auto),
        }
    }

    /// Machine summary for a successful `command`; `fields` must be an object.
    #[must_use]
    pub fn summary(&self, command: &str, fields: Value) -> Value {
        let mut summary = json!({
            "command": command,
            "status": "ok",
            "integration": self,
        });
        if let (Value::Object(target), Value::Object(extra)) = (&mut summary, fields) {
            target.extend(extra);
        }
        summary
    }

    pub fn emit_summary(&self, command: &str, fields: Value) {
        if self.should_emit_json() {
            println!("{}", self.summary(command, fields));
        }
    }

    pub fn report_error(&self, error: &BootstrapError) {
        if self.should_emit_json() {
            eprintln!(
                "{}",
                json!({
                    "status": "error",
                    "error": error.to_string(),
                    "exit_code": error.exit_code(),
                    "integration": self,
                })
            );
        } else {
            eprintln!("{error}");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct StatusLine {
    rich: Option<RichOutput>,
}

impl StatusLine {
    pub fn say(&self, tone: Tone, message: &str) {
        let Some(rich) = &self.rich else {
            return;
        };
        match tone {
            Tone::Info => rich.info(message),
            Tone::Success => rich.success(message),
            Tone::Warning => rich.warning(message),
        }
    }
}

pub fn write_string(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;
    use tempfile::tempdir;

    use super::{OutputIntegration, write_string};

    fn integration(sqlmodel_mode: &str) -> OutputIntegration {
        OutputIntegration {
            fastapi_mode: "plain".to_string(),
            fastapi_agent: true,
            fastapi_ci: false,
            fastapi_tty: false,
            sqlmodel_mode: sqlmodel_mode.to_string(),
            sqlmodel_agent: true,
        }
    }

    #[test]
    fn status_lines_are_disabled_in_json_mode() {
        assert!(integration("json").status().rich.is_none());
        assert!(integration("plain").status().rich.is_some());
    }

    #[test]
    fn summary_merges_command_fields() {
        let summary = integration("json").summary(
            "inject",
            json!({ "output": "dist/index.html", "markers": ["head"] }),
        );
        assert_eq!(summary["command"], "inject");
        assert_eq!(summary["status"], "ok");
        assert_eq!(summary["output"], "dist/index.html");
        assert_eq!(summary["markers"][0], "head");
        assert_eq!(summary["integration"]["sqlmodel_mode"], "json");
    }

    #[test]
    fn write_string_creates_parent_directories() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("dist/nested/index.html");
        write_string(&path, "<html></html>").expect("write");
        assert_eq!(fs::read_to_string(&path).expect("read"), "<html></html>");
    }
}
