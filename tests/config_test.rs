use clap::Parser;
use std::env;
use std::fs;
use tempfile::TempDir;

use claude_stats::cli::Args;
use claude_stats::utils::claude_paths;

#[test]
#[serial_test::serial]
fn test_config_dir_from_env() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("projects")).unwrap();
    // SAFETY: Test runs serially, no concurrent env access
    unsafe { env::set_var("CLAUDE_CONFIG_DIR", tmp.path().to_str().unwrap()) };

    let args = Args::try_parse_from(["claude-stats"]).unwrap();
    let paths = claude_paths(args.claude_config_dir.as_deref());
    assert_eq!(paths, vec![tmp.path().to_path_buf()]);

    unsafe { env::remove_var("CLAUDE_CONFIG_DIR") };
}

#[test]
#[serial_test::serial]
fn test_config_dir_list_skips_roots_without_projects() {
    let with = TempDir::new().unwrap();
    let without = TempDir::new().unwrap();
    fs::create_dir_all(with.path().join("projects")).unwrap();

    let list = format!(
        "{}, ,{}",
        without.path().display(),
        with.path().display()
    );
    let paths = claude_paths(Some(&list));
    assert_eq!(paths, vec![with.path().to_path_buf()]);
}

#[test]
#[serial_test::serial]
fn test_debug_flag_from_env() {
    // SAFETY: Test runs serially, no concurrent env access
    unsafe { env::set_var("CLAUDE_DEBUG", "true") };
    let args = Args::try_parse_from(["claude-stats", "--type", "hourly"]).unwrap();
    assert!(args.debug);
    unsafe { env::remove_var("CLAUDE_DEBUG") };
}
