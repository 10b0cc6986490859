//! Tests for command line parsing

use crate::args::Args;
use crate::live::LiveConfig;
use clap::Parser;

#[test]
fn test_single_file_local() {
    let args = Args::try_parse_from(["duet", "notes.txt"]).unwrap();
    assert_eq!(args.files.len(), 1);
    assert_eq!(args.live_config(), LiveConfig::Off);
}

#[test]
fn test_two_files() {
    let args = Args::try_parse_from(["duet", "a.txt", "b.txt"]).unwrap();
    assert_eq!(args.files.len(), 2);
}

#[test]
fn test_three_files_rejected() {
    assert!(Args::try_parse_from(["duet", "a", "b", "c"]).is_err());
}

#[test]
fn test_no_files_rejected() {
    assert!(Args::try_parse_from(["duet"]).is_err());
    assert!(Args::try_parse_from(["duet", "--host", "4000"]).is_err());
}

#[test]
fn test_host_mode() {
    let args = Args::try_parse_from(["duet", "--host", "4000", "a.txt"]).unwrap();
    assert_eq!(args.live_config(), LiveConfig::Host(4000));
}

#[test]
fn test_join_mode() {
    let args = Args::try_parse_from(["duet", "--join", "10.0.0.5:4000", "a.txt"]).unwrap();
    assert_eq!(
        args.live_config(),
        LiveConfig::Join("10.0.0.5:4000".to_string())
    );
}

#[test]
fn test_host_and_join_are_exclusive() {
    assert!(
        Args::try_parse_from(["duet", "--host", "4000", "--join", "x:1", "a.txt"]).is_err()
    );
}
