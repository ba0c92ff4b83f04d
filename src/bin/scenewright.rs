use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use scenewright::{
    ApplyResponse, EngineConfig, EntryKind, FsStorage, SceneEngine, SceneResult, Template,
    TemplateSource,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scenewright", version)]
struct Cli {
    /// Engine config JSON. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Scene document path (overrides the config).
    #[arg(long, global = true)]
    scene: Option<PathBuf>,

    /// History JSON path (overrides the config).
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a source file for syntax errors without touching the scene.
    Validate(ValidateArgs),
    /// Replace the scene's mutable region with the contents of a file.
    Apply(ApplyArgs),
    /// List or apply templates.
    Template {
        #[command(subcommand)]
        cmd: TemplateCommand,
    },
    /// Restore the previous history entry.
    Undo,
    /// Restore the next history entry.
    Redo,
    /// Print the history as JSON.
    History,
    /// Write a fresh scene from the configured boilerplate.
    Init(InitArgs),
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Source file to check.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Check a whole module instead of scene body code.
    #[arg(long)]
    document: bool,
}

#[derive(Args, Debug)]
struct ApplyArgs {
    /// File holding the new region code.
    #[arg(long)]
    code: PathBuf,

    /// History description (recorded as a manual entry when set).
    #[arg(long)]
    description: Option<String>,
}

#[derive(Subcommand, Debug)]
enum TemplateCommand {
    /// Print template summaries as JSON.
    List {
        /// Only templates carrying this tag.
        #[arg(long)]
        tag: Option<String>,
    },
    /// Expand a template into the scene.
    Apply(TemplateApplyArgs),
}

#[derive(Args, Debug)]
struct TemplateApplyArgs {
    #[command(flatten)]
    source: TemplateChoice,

    /// Variable values as a JSON object.
    #[arg(long)]
    vars: Option<String>,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct TemplateChoice {
    /// Registered template id.
    #[arg(long)]
    id: Option<String>,

    /// Template JSON file.
    #[arg(long)]
    inline: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InitArgs {
    /// Overwrite an existing scene.
    #[arg(long)]
    force: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(&cli)?;

    match cli.cmd {
        Command::Validate(args) => cmd_validate(&args),
        Command::Apply(args) => cmd_apply(config, args),
        Command::Template {
            cmd: TemplateCommand::List { tag },
        } => {
            let engine = SceneEngine::open_fs(config)?;
            print_json(&engine.list_templates(tag.as_deref()))
        }
        Command::Template {
            cmd: TemplateCommand::Apply(args),
        } => cmd_template_apply(config, args),
        Command::Undo => {
            let engine = SceneEngine::open_fs(config)?;
            match engine.undo()? {
                Some(entry) => print_json(&entry),
                None => {
                    eprintln!("nothing to undo");
                    Ok(())
                }
            }
        }
        Command::Redo => {
            let engine = SceneEngine::open_fs(config)?;
            match engine.redo()? {
                Some(entry) => print_json(&entry),
                None => {
                    eprintln!("nothing to redo");
                    Ok(())
                }
            }
        }
        Command::History => {
            let engine = SceneEngine::open_fs(config)?;
            print_json(&engine.history())
        }
        Command::Init(args) => {
            if SceneEngine::init_scene(&config, &FsStorage, args.force)? {
                eprintln!("wrote {}", config.scene_path.display());
            } else {
                eprintln!(
                    "{} already exists (use --force to overwrite)",
                    config.scene_path.display()
                );
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    if let Some(scene) = &cli.scene {
        config.scene_path = scene.clone();
    }
    if let Some(history) = &cli.history {
        config.history_path = Some(history.clone());
    }
    config.validate()?;
    Ok(config)
}

fn read_text(path: &Path, what: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {what} '{}'", path.display()))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the wire response; a rejected change also makes the process fail.
fn report<T>(result: SceneResult<T>) -> anyhow::Result<()> {
    let response = ApplyResponse::from(result);
    println!("{}", serde_json::to_string(&response)?);
    match response {
        ApplyResponse::Success { .. } => Ok(()),
        ApplyResponse::Error { error } => Err(anyhow::anyhow!(error)),
    }
}

fn cmd_validate(args: &ValidateArgs) -> anyhow::Result<()> {
    let source = read_text(&args.in_path, "source")?;
    let validation = if args.document {
        scenewright::validate_document(&source)
    } else {
        scenewright::validate(&source)
    };
    print_json(&validation)?;
    if !validation.ok {
        anyhow::bail!("'{}' has syntax errors", args.in_path.display());
    }
    Ok(())
}

fn cmd_apply(config: EngineConfig, args: ApplyArgs) -> anyhow::Result<()> {
    let code = read_text(&args.code, "code")?;
    let engine = SceneEngine::open(
        config,
        scenewright::TemplateRegistry::new(),
        Arc::new(FsStorage),
    )?;
    let result = match args.description {
        Some(description) => engine.apply_code_as(&code, EntryKind::Manual, description),
        None => engine.apply_code(&code),
    };
    report(result)
}

fn cmd_template_apply(config: EngineConfig, args: TemplateApplyArgs) -> anyhow::Result<()> {
    let values = match &args.vars {
        Some(json) => {
            let value: serde_json::Value =
                serde_json::from_str(json).context("parse --vars JSON")?;
            Some(scenewright::values_from_json(value).map_err(anyhow::Error::msg)?)
        }
        None => None,
    };

    let source = match (args.source.id, args.source.inline) {
        (Some(id), _) => TemplateSource::Id(id),
        (None, Some(path)) => {
            let text = read_text(&path, "template")?;
            let template: Template = serde_json::from_str(&text)
                .with_context(|| format!("parse template '{}'", path.display()))?;
            TemplateSource::from(template)
        }
        (None, None) => anyhow::bail!("either --id or --inline is required"),
    };

    let engine = SceneEngine::open_fs(config)?;
    report(engine.apply_template(source, values.as_ref()))
}
