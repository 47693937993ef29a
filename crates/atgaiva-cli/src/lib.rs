pub mod cli_args;

use std::path::PathBuf;

use atgaiva_core::{
    ACCEPTED_MEDIA_TYPES, DeviceClass, DirectorySink, ExportArtifact, ExportError, ExportOutcome,
    ExportSink, FileConfig, FileSink, ImagePayload, LoggingDestination, RestorationController, RestoreError, SessionState,
    UploadSurface, build_instruction, init_logging, load_config, save_config,
};
use clap::Parser;
use cli_args::{Cli, Command, RestoreArgs, SecretCommand, normalize_model};
use rpassword::prompt_password;
use tracing::warn;

/// Whether the process was started with arguments meant for the command line.
pub fn should_run_cli_mode() -> bool {
    std::env::args_os().len() > 1
}

/// Parse the process arguments and run the requested command.
pub async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    if let Err(err) = init_logging(LoggingDestination::FileAndStderr) {
        eprintln!("Warning: structured logging unavailable: {err}");
    }
    dispatch(cli).await
}

pub async fn dispatch(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Restore(args) => run_restore(args).await,
        Command::Prompt(flags) => {
            let config = load_reporting_warnings();
            println!("{}", build_instruction(&flags.apply(config.restoration)));
            Ok(())
        }
        Command::Secret(cmd) => handle_secret_command(cmd),
    }
}

fn load_reporting_warnings() -> FileConfig {
    let load = load_config();
    for warning in load.warnings {
        eprintln!("Warning: {warning}");
    }
    load.config
}

async fn run_restore(args: RestoreArgs) -> Result<(), String> {
    let config = load_reporting_warnings();
    let options = args.options.apply(config.restoration);

    let original = read_image(&args)?;

    let mut gemini = config.gemini.clone();
    if let Some(model) = normalize_model(args.model.as_deref()) {
        gemini.model = model;
    }

    let mut sink = export_sink(&args, &config)?;

    if args.dry_run {
        println!("Input:       {}", args.input.display());
        println!("Media type:  {}", original.media_type());
        println!("Model:       {}", gemini.model);
        println!("Endpoint:    {}", gemini.endpoint);
        println!("Output:      {}", sink.describe());
        println!("Instruction: {}", build_instruction(&options));
        return Ok(());
    }

    let api_key = gemini
        .resolve_api_key()
        .map_err(|err| format!("Failed to read stored API key: {err}"))?
        .ok_or_else(|| RestoreError::MissingApiKey.to_string())?;

    let mut controller = RestorationController::new(gemini.client(api_key))
        .with_options(options)
        .with_locale(config.ui.locale);
    controller.select_image(original);

    eprintln!("{}", config.ui.locale.messages().restoring);
    controller.restore().await;

    let restored = match controller.state() {
        SessionState::Restored { restored, .. } => restored,
        SessionState::Failed { message, .. } => return Err(message.clone()),
        other => return Err(format!("Restoration ended in unexpected state '{}'", other.label())),
    };

    let outcome = atgaiva_core::export_result(restored, DeviceClass::current(), &mut sink)
        .map_err(|err| {
            warn!(error = %err, "Export failed");
            format!("{} ({err})", config.ui.locale.messages().download_failed)
        })?;

    match outcome {
        ExportOutcome::Saved(path) => println!("Saved restored image to {}", path.display()),
        ExportOutcome::Shared => println!("Restored image shared."),
    }
    Ok(())
}

/// Push the input through the upload surface, which only reports images.
fn read_image(args: &RestoreArgs) -> Result<ImagePayload, String> {
    let mut selected = None;
    let accepted = UploadSurface::new(|payload| selected = Some(payload))
        .select_path(&args.input)
        .map_err(|err| err.to_string())?;

    match selected {
        Some(payload) if accepted => Ok(payload),
        _ => Err(format!(
            "'{}' is not an image file (expected {}).",
            args.input.display(),
            ACCEPTED_MEDIA_TYPES.join(", ")
        )),
    }
}

/// Export target for a CLI run.
enum CliSink {
    File(FileSink),
    Directory(DirectorySink),
}

impl CliSink {
    fn describe(&self) -> String {
        match self {
            CliSink::File(sink) => sink.path().display().to_string(),
            CliSink::Directory(sink) => format!("{} (new file)", sink.directory().display()),
        }
    }
}

impl ExportSink for CliSink {
    fn save(&mut self, artifact: &ExportArtifact) -> Result<PathBuf, ExportError> {
        match self {
            CliSink::File(sink) => sink.save(artifact),
            CliSink::Directory(sink) => sink.save(artifact),
        }
    }
}

fn export_sink(args: &RestoreArgs, config: &FileConfig) -> Result<CliSink, String> {
    if let Some(output) = args.output.as_ref() {
        return Ok(CliSink::File(FileSink::new(output)));
    }
    let directory = match config.export.resolved_directory() {
        Some(dir) => dir,
        None => std::env::current_dir()
            .map_err(|err| format!("Failed to determine the current directory: {err}"))?,
    };
    Ok(CliSink::Directory(DirectorySink::new(directory)))
}

fn handle_secret_command(command: SecretCommand) -> Result<(), String> {
    let mut config = load_reporting_warnings();

    match command {
        SecretCommand::SetGeminiKey { key } => {
            let value = match key {
                Some(v) => v,
                None => prompt_password("Enter Gemini API key: ")
                    .map_err(|err| format!("Failed to read API key: {err}"))?,
            };
            config
                .gemini
                .set_api_key(&value)
                .map_err(|err| format!("{}", err))?;
            save_config(&config).map_err(|err| err.to_string())?;
            println!("Gemini API key saved securely.");
            Ok(())
        }
        SecretCommand::ClearGeminiKey => {
            config
                .gemini
                .clear_api_key()
                .map_err(|err| format!("{}", err))?;
            save_config(&config).map_err(|err| err.to_string())?;
            println!("Cleared saved Gemini API key.");
            Ok(())
        }
    }
}
