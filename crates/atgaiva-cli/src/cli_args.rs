use std::path::PathBuf;

use atgaiva_core::{RestorationOption, RestorationOptions};
use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

/// Top-level CLI entrypoint.
#[derive(Parser, Debug, Clone)]
#[command(name = "atgaiva", version, about = "Restore old photos with Gemini", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Supported subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Restore a photo and save the result.
    Restore(RestoreArgs),
    /// Print the instruction that would be sent to the model.
    Prompt(OptionFlags),
    /// Manage the stored Gemini API key.
    #[command(subcommand)]
    Secret(SecretCommand),
}

/// Secret management subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum SecretCommand {
    /// Store the Gemini API key in the OS keyring (prompts when KEY is omitted).
    SetGeminiKey {
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Remove the stored Gemini API key.
    ClearGeminiKey,
}

/// Arguments for a single restoration.
#[derive(Debug, Clone, Args)]
pub struct RestoreArgs {
    /// Photo to restore (JPEG, PNG or WebP).
    #[arg(value_name = "INPUT", value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    /// Where to write the restored PNG. Defaults to the export directory.
    #[arg(short, long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub options: OptionFlags,

    /// Override the Gemini model ID.
    #[arg(long, value_name = "ID")]
    pub model: Option<String>,

    /// Print what would happen without calling the model.
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,
}

/// Flags that switch individual restoration operations off.
#[derive(Debug, Clone, Copy, Args, Default, PartialEq, Eq)]
pub struct OptionFlags {
    /// Skip scratch, crease and tear removal.
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_fix_damage: bool,

    /// Skip sharpening and denoising.
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_enhance_details: bool,

    /// Keep the original colors.
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_colorize: bool,
}

impl OptionFlags {
    /// Start from `defaults` and switch off whatever was requested.
    pub fn apply(&self, defaults: RestorationOptions) -> RestorationOptions {
        let mut options = defaults;
        for (option, disabled) in [
            (RestorationOption::FixDamage, self.no_fix_damage),
            (RestorationOption::EnhanceDetails, self.no_enhance_details),
            (RestorationOption::Colorize, self.no_colorize),
        ] {
            if disabled {
                options.set(option, false);
            }
        }
        options
    }
}

/// Treat blank model overrides as absent.
pub fn normalize_model(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|model| !model.is_empty())
        .map(str::to_string)
}
