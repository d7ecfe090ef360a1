//! CLI entrypoint for toolgate
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod chat;
mod commands;
mod logging;
mod render;

use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use commands::{Cli, Command};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use toolgate_application::{
    RunTurnError, RunTurnInput, RunTurnUseCase, ToolExecutorPort, ToolSchemaPort,
};
use toolgate_domain::tool::{
    entities::ToolCall,
    extraction::{Extraction, extract_tool_call},
    value_objects::ToolResult,
};
use toolgate_infrastructure::{
    BoundedReader, ConfigLoader, FileConfig, JsonSchemaToolConverter, OllamaGateway, PathGuard,
    SandboxError, SnippetRunner, SnippetScreen, ToolRegistry, default_registry,
    locate_interpreter,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let _log_guard = logging::init(cli.verbose, &config.logging)?;

    info!("Starting toolgate");

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        println!();
        println!("{}", toml::to_string_pretty(&config)?);
        if cli.command.is_none() {
            return Ok(ExitCode::SUCCESS);
        }
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::from(2));
    };

    // === Dependency Injection ===
    let registry = Arc::new(build_registry(&config)?);

    match command {
        Command::Tools => {
            let schemas = JsonSchemaToolConverter.all_tools_schema(registry.tool_spec());
            println!("{}", serde_json::to_string_pretty(&schemas)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Call { tool, args } => {
            let args: serde_json::Value =
                serde_json::from_str(&args).context("--args must be valid JSON")?;
            let serde_json::Value::Object(args) = args else {
                bail!("--args must be a JSON object");
            };

            let call = ToolCall::new(tool).with_arguments(args);
            let result = registry.execute(&call).await;
            render::print_result(&result, cli.json)?;
            Ok(exit_code(&result))
        }
        Command::Extract { dispatch } => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read model text from stdin")?;

            let extraction = extract_tool_call(&text);
            let result = match (&extraction, dispatch) {
                (Extraction::Call(call), true) => Some(registry.execute(call).await),
                _ => None,
            };
            render::print_extraction(&extraction, result.as_ref(), cli.json)?;
            Ok(result.as_ref().map(exit_code).unwrap_or(ExitCode::SUCCESS))
        }
        Command::Ask { message } => {
            let use_case = build_use_case(&config, registry)?;

            let token = CancellationToken::new();
            let cancel = token.clone();
            let watcher = tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            });
            let outcome = use_case
                .execute_cancellable(RunTurnInput::new(message), token)
                .await;
            watcher.abort();

            match outcome {
                Ok(output) => {
                    render::print_turn(&output, cli.json)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(RunTurnError::Cancelled) => {
                    eprintln!("{}", "Cancelled".yellow());
                    Ok(ExitCode::from(130))
                }
            }
        }
        Command::Chat => {
            let use_case = build_use_case(&config, registry)?;
            chat::run(&use_case, &config.model.name, cli.json).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load configuration files and apply command-line overrides
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    if !cli.roots.is_empty() {
        config.sandbox.allowed_roots = cli.roots.clone();
    }
    if let Some(model) = &cli.model {
        config.model.name = model.clone();
    }
    if let Some(url) = &cli.backend_url {
        config.model.backend_url = url.clone();
    }
    if let Some(file) = &cli.log_file {
        config.logging.file = Some(file.clone());
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn build_registry(config: &FileConfig) -> Result<ToolRegistry> {
    let limits = config.execution_limits();

    let guard = Arc::new(PathGuard::new(&config.sandbox.allowed_roots));
    if guard.roots().is_empty() {
        warn!("No usable allowed roots; file tools will deny every path");
    }

    let reader = Arc::new(BoundedReader::new(
        Arc::clone(&guard),
        Arc::new(limits.clone()),
    ));
    let runner = build_runner(config, limits, &guard)
        .context("Failed to set up the code sandbox")?
        .map(Arc::new);

    Ok(default_registry(reader, runner)?)
}

/// `None` when the interpreter is not installed; run_python is then omitted.
fn build_runner(
    config: &FileConfig,
    limits: toolgate_domain::ExecutionLimits,
    guard: &PathGuard,
) -> Result<Option<SnippetRunner>, SandboxError> {
    let interpreter = match locate_interpreter(&config.sandbox.interpreter) {
        Ok(path) => path,
        Err(e) => {
            warn!(error = %e, "run_python disabled");
            return Ok(None);
        }
    };

    let screen = SnippetScreen::new(config.sandbox.denylist())?;
    let runner = SnippetRunner::new(
        interpreter,
        config.sandbox.scratch_dir(),
        limits,
        screen,
        guard,
    )?;
    Ok(Some(runner))
}

fn build_use_case(config: &FileConfig, registry: Arc<ToolRegistry>) -> Result<RunTurnUseCase> {
    let gateway = OllamaGateway::new(
        &config.model.backend_url,
        config.model.name.clone(),
        config.model.request_timeout(),
    )?;
    Ok(RunTurnUseCase::new(Arc::new(gateway), registry))
}

fn exit_code(result: &ToolResult) -> ExitCode {
    if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
