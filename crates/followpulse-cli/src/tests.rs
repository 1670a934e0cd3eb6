use chrono::{TimeZone, Utc};
use clap::Parser;
use followpulse_core::HistorySnapshot;

use super::*;
use crate::commands::{format_delta, format_snapshot};

#[test]
fn parses_resolve_command_and_normalizes_handle() {
    let cli = Cli::try_parse_from(["followpulse-cli", "resolve", "@Alice"])
        .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Resolve { handle }) => assert_eq!(handle.as_str(), "alice"),
        other => panic!("expected resolve, got {other:?}"),
    }
}

#[test]
fn parses_track_and_history_commands() {
    let cli = Cli::try_parse_from(["followpulse-cli", "track", "bob"]).expect("valid args");
    assert!(matches!(cli.command, Some(Commands::Track { .. })));

    let cli = Cli::try_parse_from(["followpulse-cli", "history", "bob"]).expect("valid args");
    assert!(matches!(cli.command, Some(Commands::History { .. })));
}

#[test]
fn rejects_invalid_handle() {
    assert!(Cli::try_parse_from(["followpulse-cli", "resolve", "not a handle"]).is_err());
    assert!(Cli::try_parse_from(["followpulse-cli", "track"]).is_err());
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["followpulse-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn delta_is_signed_and_first_record_has_none() {
    assert_eq!(format_delta(0, 325), "first record");
    assert_eq!(format_delta(325, 400), "+75 since last check");
    assert_eq!(format_delta(400, 390), "-10 since last check");
    assert_eq!(format_delta(400, 400), "+0 since last check");
}

#[test]
fn snapshot_line_uses_utc_seconds() {
    let snapshot = HistorySnapshot {
        followers: 325,
        timestamp: Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap(),
    };
    assert_eq!(format_snapshot(&snapshot), "2026-10-01T12:00:00Z  325");
}
