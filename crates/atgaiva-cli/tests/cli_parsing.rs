use std::fs;
use std::path::PathBuf;

use atgaiva_cli::cli_args::{Cli, Command, OptionFlags, SecretCommand, normalize_model};
use atgaiva_cli::dispatch;
use atgaiva_core::RestorationOptions;
use clap::Parser;
use tempfile::tempdir;

// Integration tests for argument parsing and the restore command's
// behaviour before any network traffic happens.

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("arguments parse")
}

#[test]
fn test_restore_defaults() {
    let cli = parse(&["atgaiva", "restore", "photo.jpg"]);
    let Command::Restore(args) = cli.command else {
        panic!("expected restore command");
    };
    assert_eq!(args.input, PathBuf::from("photo.jpg"));
    assert!(args.output.is_none());
    assert!(args.model.is_none());
    assert!(!args.dry_run);
    assert_eq!(args.options, OptionFlags::default());
}

#[test]
fn test_restore_with_all_flags() {
    let cli = parse(&[
        "atgaiva",
        "restore",
        "old.png",
        "--output",
        "out/new.png",
        "--no-colorize",
        "--no-fix-damage",
        "--model",
        "gemini-other",
        "--dry-run",
    ]);
    let Command::Restore(args) = cli.command else {
        panic!("expected restore command");
    };
    assert_eq!(args.output, Some(PathBuf::from("out/new.png")));
    assert!(args.options.no_colorize);
    assert!(args.options.no_fix_damage);
    assert!(!args.options.no_enhance_details);
    assert_eq!(args.model.as_deref(), Some("gemini-other"));
    assert!(args.dry_run);
}

#[test]
fn test_restore_requires_input() {
    assert!(Cli::try_parse_from(["atgaiva", "restore"]).is_err());
}

#[test]
fn test_subcommand_is_required() {
    assert!(Cli::try_parse_from(["atgaiva"]).is_err());
}

#[test]
fn test_secret_commands() {
    let cli = parse(&["atgaiva", "secret", "set-gemini-key", "abc123"]);
    assert!(matches!(
        cli.command,
        Command::Secret(SecretCommand::SetGeminiKey { key: Some(ref k) }) if k == "abc123"
    ));

    let cli = parse(&["atgaiva", "secret", "set-gemini-key"]);
    assert!(matches!(
        cli.command,
        Command::Secret(SecretCommand::SetGeminiKey { key: None })
    ));

    let cli = parse(&["atgaiva", "secret", "clear-gemini-key"]);
    assert!(matches!(
        cli.command,
        Command::Secret(SecretCommand::ClearGeminiKey)
    ));
}

#[test]
fn test_flags_only_switch_options_off() {
    let flags = OptionFlags {
        no_fix_damage: true,
        ..OptionFlags::default()
    };
    assert_eq!(
        flags.apply(RestorationOptions::default()),
        RestorationOptions {
            fix_damage: false,
            enhance_details: true,
            colorize: true,
        }
    );

    let configured = RestorationOptions {
        colorize: false,
        ..RestorationOptions::default()
    };
    assert!(!OptionFlags::default().apply(configured).colorize);
}

#[test]
fn test_blank_model_is_ignored() {
    assert_eq!(normalize_model(Some("  ")), None);
    assert_eq!(normalize_model(None), None);
    assert_eq!(
        normalize_model(Some(" gemini-x ")).as_deref(),
        Some("gemini-x")
    );
}

#[tokio::test]
async fn test_non_image_input_is_rejected() {
    let temp = tempdir().expect("tempdir");
    let input = temp.path().join("notes.txt");
    fs::write(&input, "not a photo").expect("write fixture");

    let cli = parse(&["atgaiva", "restore", input.to_str().unwrap(), "--dry-run"]);
    let err = dispatch(cli).await.unwrap_err();
    assert!(err.contains("is not an image file"), "{err}");
    assert!(err.contains("image/jpeg, image/png, image/webp"), "{err}");
}

#[tokio::test]
async fn test_missing_input_is_reported() {
    let temp = tempdir().expect("tempdir");
    let input = temp.path().join("missing.jpg");

    let cli = parse(&["atgaiva", "restore", input.to_str().unwrap(), "--dry-run"]);
    let err = dispatch(cli).await.unwrap_err();
    assert!(err.contains("failed to read"), "{err}");
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let temp = tempdir().expect("tempdir");
    let input = temp.path().join("photo.png");
    let output = temp.path().join("restored.png");
    fs::write(&input, [0x89, b'P', b'N', b'G']).expect("write fixture");

    let cli = parse(&[
        "atgaiva",
        "restore",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--dry-run",
    ]);
    dispatch(cli).await.expect("dry run succeeds");
    assert!(!output.exists());
}
