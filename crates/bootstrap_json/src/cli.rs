use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::json;

use crate::config::{BootstrapConfig, SourceArgs};
use crate::context::BootstrapContext;
use crate::document::BootstrapEnvelope;
use crate::error::{BootstrapError, Result};
use crate::inject::{inject, marker_slots};
use crate::render::Slot;
use crate::source::source_for;
use crate::util::{OutputIntegration, Tone, write_string};

#[derive(Debug, Parser)]
#[command(
    name = "bootstrap_json",
    about = "Render application-shell HTML fragments from a backend bootstrap document",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch bootstrap.json and save the response.
    Fetch(FetchArgs),

    /// Print the fragment for one slot.
    Render(RenderArgs),

    /// Fill every content-for marker in a template.
    Inject(InjectArgs),

    /// Print slot names in render order.
    #[command(name = "list-slots")]
    ListSlots,
}

#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Write the response here instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(long)]
    pub slot: String,
}

#[derive(Debug, Clone, Args)]
pub struct InjectArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(long)]
    pub template: PathBuf,

    /// Defaults to overwriting the template.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let integration = OutputIntegration::detect();
    run_with_integration(cli, &integration)
}

fn run_with_integration(cli: Cli, integration: &OutputIntegration) -> Result<()> {
    match cli.command {
        Commands::Fetch(args) => run_fetch(args, integration),
        Commands::Render(args) => run_render(args, integration),
        Commands::Inject(args) => run_inject(args, integration),
        Commands::ListSlots => {
            for slot in Slot::ALL {
                println!("{slot}");
            }
            Ok(())
        }
    }
}

fn load_context(source: SourceArgs, integration: &OutputIntegration) -> Result<BootstrapContext> {
    let config = BootstrapConfig::resolve(source)?;
    let source = source_for(&config)?;

    integration.status().say(
        Tone::Info,
        &format!("loading bootstrap from {}", source.describe()),
    );
    let context = BootstrapContext::new();
    context.fetch(source.as_ref())?;
    Ok(context)
}

fn run_fetch(args: FetchArgs, integration: &OutputIntegration) -> Result<()> {
    let status = integration.status();
    let config = BootstrapConfig::resolve(args.source)?;
    let source = source_for(&config)?;

    status.say(Tone::Info, &format!("fetching {}", source.describe()));
    let raw = source.load_raw()?;
    let envelope: BootstrapEnvelope = serde_json::from_value(raw.clone())?;
    if envelope.bootstrap.is_none() {
        return Err(BootstrapError::MissingBootstrap {
            source_name: source.describe(),
        });
    }

    let pretty = serde_json::to_string_pretty(&raw)?;
    match &args.output {
        Some(path) => {
            write_string(path, &pretty)?;
            status.say(
                Tone::Success,
                &format!("bootstrap saved: {}", path.display()),
            );
            integration.emit_summary(
                "fetch",
                json!({
                    "source": source.describe(),
                    "output": path.display().to_string(),
                }),
            );
        }
        None => println!("{pretty}"),
    }
    Ok(())
}

fn run_render(args: RenderArgs, integration: &OutputIntegration) -> Result<()> {
    let context = load_context(args.source, integration)?;
    let fragment = context.content_for(&args.slot);

    if fragment.is_none() {
        integration
            .status()
            .say(Tone::Warning, &format!("unknown slot: {}", args.slot));
    }

    if integration.should_emit_json() {
        integration.emit_summary(
            "render",
            json!({ "slot": args.slot, "fragment": fragment }),
        );
    } else if let Some(fragment) = fragment {
        println!("{fragment}");
    }
    Ok(())
}

fn run_inject(args: InjectArgs, integration: &OutputIntegration) -> Result<()> {
    let status = integration.status();

    if !args.template.exists() {
        return Err(BootstrapError::MissingPath {
            path: args.template,
        });
    }
    let template = fs::read_to_string(&args.template)?;
    let context = load_context(args.source, integration)?;

    let slots = marker_slots(&template);
    for name in slots.iter().filter(|name| Slot::parse(name).is_none()) {
        status.say(
            Tone::Warning,
            &format!("template references unknown slot: {name}"),
        );
    }

    let output = args.output.unwrap_or_else(|| args.template.clone());
    write_string(&output, &inject(&template, &context))?;
    status.say(
        Tone::Success,
        &format!(
            "injected {} marker(s) into {}",
            slots.len(),
            output.display()
        ),
    );

    integration.emit_summary(
        "inject",
        json!({
            "template": args.template.display().to_string(),
            "output": output.display().to_string(),
            "markers": slots,
        }),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use tempfile::tempdir;

    use super::{
        Cli, Commands, FetchArgs, InjectArgs, RenderArgs, run_fetch, run_inject, run_render,
        run_with_integration,
    };
    use crate::config::SourceArgs;
    use crate::error::BootstrapError;
    use crate::util::OutputIntegration;

    fn plain() -> OutputIntegration {
        OutputIntegration {
            fastapi_mode: "plain".to_string(),
            fastapi_agent: false,
            fastapi_ci: false,
            fastapi_tty: false,
            sqlmodel_mode: "plain".to_string(),
            sqlmodel_agent: false,
        }
    }

    fn file_source(path: &Path) -> SourceArgs {
        SourceArgs {
            proxy: None,
            bootstrap_file: Some(path.to_path_buf()),
            timeout_seconds: None,
        }
    }

    fn write_fixture(dir: &Path) -> PathBuf {
        let path = dir.join("bootstrap.json");
        fs::write(
            &path,
            r#"{"bootstrap":{"html_lang":"en","csrf_token":"t0k","plugin_js":["/plugin.js"]}}"#,
        )
        .expect("write fixture");
        path
    }

    #[test]
    fn list_slots_command_dispatches_successfully() {
        let result = run_with_integration(
            Cli {
                command: Commands::ListSlots,
            },
            &plain(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn fetch_command_saves_raw_response() {
        let temp = tempdir().expect("tempdir");
        let fixture = write_fixture(temp.path());
        let output = temp.path().join("saved/bootstrap.json");

        run_fetch(
            FetchArgs {
                source: file_source(&fixture),
                output: Some(output.clone()),
            },
            &plain(),
        )
        .expect("fetch");

        let saved: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).expect("read")).expect("parse");
        assert_eq!(saved["bootstrap"]["csrf_token"], "t0k");
    }

    #[test]
    fn render_command_accepts_unknown_slot_without_error() {
        let temp = tempdir().expect("tempdir");
        let fixture = write_fixture(temp.path());

        run_render(
            RenderArgs {
                source: file_source(&fixture),
                slot: "sidebar".to_string(),
            },
            &plain(),
        )
        .expect("unknown slot renders nothing");
    }

    #[test]
    fn inject_command_writes_filled_template() {
        let temp = tempdir().expect("tempdir");
        let fixture = write_fixture(temp.path());
        let template = temp.path().join("index.html");
        fs::write(
            &template,
            "<html>\n{{content-for \"head-tag\"}}\n{{content-for \"head\"}}\n</head>\n</html>\n",
        )
        .expect("write template");
        let output = temp.path().join("dist/index.html");

        run_inject(
            InjectArgs {
                source: file_source(&fixture),
                template: template.clone(),
                output: Some(output.clone()),
            },
            &plain(),
        )
        .expect("inject");

        let html = fs::read_to_string(&output).expect("read output");
        assert!(html.starts_with("<html>\n<head lang=\"en\">\n"));
        assert!(html.contains("<meta name=\"csrf-token\" content=\"t0k\">"));
        assert!(html.contains("<script src=\"/plugin.js\"></script>"));
        assert!(!html.contains("content-for"));
        assert!(
            fs::read_to_string(&template)
                .expect("read template")
                .contains("content-for"),
            "template must stay untouched when --output is given"
        );
    }

    #[test]
    fn inject_command_fails_for_missing_template() {
        let temp = tempdir().expect("tempdir");
        let fixture = write_fixture(temp.path());
        let missing = temp.path().join("nope.html");

        match run_inject(
            InjectArgs {
                source: file_source(&fixture),
                template: missing.clone(),
                output: None,
            },
            &plain(),
        )
        .expect_err("missing template")
        {
            BootstrapError::MissingPath { path } => assert_eq!(path, missing),
            other => panic!("expected MissingPath, got {other}"),
        }
    }
}
