use std::process;

use anyhow::Result;
use clap::{ArgMatches, Command};

const BIN_NAME: &str = "substitute-template-name";

fn main() -> Result<()> {
    let args = clap::command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("install").about("Install substitute-template-name binary locally"))
        .subcommand(
            Command::new("run")
                .about("Build and run substitute-template-name with arguments")
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .arg(clap::Arg::new("args")
                    .help("Arguments to pass to substitute-template-name")
                    .action(clap::ArgAction::Append)
                    .num_args(0..))
        )
        .subcommand(
            Command::new("test")
                .about("Test Operations")
                .subcommand(Command::new("all").about("Run all tests for the entire project"))
                .subcommand(Command::new("core").about("Run tests for substitutor-core"))
                .subcommand(Command::new("bin").about("Run tests for substitutor-bin"))
                .subcommand(Command::new("integration").about("Run CLI smoke tests"))
        )
        .get_matches();

    match args.subcommand() {
        Some(("install", _)) => install(),
        Some(("run", args)) => handle_run_command(args),
        Some(("test", args)) => handle_test_commands(args),
        Some((command, _)) => anyhow::bail!("Unexpected command: {command}"),
        None => anyhow::bail!("Expected subcommand"),
    }
}

fn install() -> Result<()> {
    println!("Installing {BIN_NAME}...");
    cargo(&["install", "--path", "crates/substitutor-bin"], "Failed to install")?;
    println!("✓ {BIN_NAME} installed successfully");
    Ok(())
}

fn handle_run_command(args: &ArgMatches) -> Result<()> {
    let run_args: Vec<String> = args.get_many::<String>("args")
        .map_or(Vec::new(), |vals| vals.cloned().collect());

    let status = process::Command::new("cargo")
        .args(["run", "--bin", BIN_NAME, "--"])
        .args(&run_args)
        .status()?;

    if !status.success() {
        anyhow::bail!("Failed to run {BIN_NAME}");
    }

    Ok(())
}

fn handle_test_commands(args: &ArgMatches) -> Result<()> {
    match args.subcommand() {
        Some(("all", _)) => test_all(),
        Some(("core", _)) => cargo(&["test", "--package", "substitutor-core"], "Core tests failed"),
        Some(("bin", _)) => cargo(&["test", "--package", "substitutor-bin"], "Binary tests failed"),
        Some(("integration", _)) => test_integration(),
        _ => {
            println!("Available test commands:");
            println!("  all          - Run all tests for the entire project");
            println!("  core         - Run tests for substitutor-core");
            println!("  bin          - Run tests for substitutor-bin");
            println!("  integration  - Run CLI smoke tests");
            Ok(())
        }
    }
}

fn test_all() -> Result<()> {
    let suites: [(&str, fn() -> Result<()>); 3] = [
        ("workspace", || cargo(&["test", "--workspace"], "Workspace tests failed")),
        ("documentation", || cargo(&["test", "--doc", "--package", "substitutor-core"], "Documentation tests failed")),
        ("integration", test_integration),
    ];

    let mut all_passed = true;
    for (name, suite) in suites {
        println!("🧪 Running {name} tests...");
        match suite() {
            Ok(()) => println!("✅ {name} tests passed\n"),
            Err(e) => {
                all_passed = false;
                println!("❌ {name} tests failed: {e:?}\n");
            }
        }
    }

    if !all_passed {
        anyhow::bail!("Test suite failed");
    }
    println!("🎉 All tests passed successfully!");
    Ok(())
}

fn test_integration() -> Result<()> {
    cargo(&["build", "--bin", BIN_NAME], "Failed to build binary")?;
    cargo(&["run", "--bin", BIN_NAME, "--", "--help"], "CLI help command failed")?;
    cargo(&["run", "--bin", BIN_NAME, "--", "--version"], "CLI version command failed")
}

fn cargo(args: &[&str], failure: &str) -> Result<()> {
    let status = process::Command::new("cargo").args(args).status()?;

    if !status.success() {
        anyhow::bail!("{failure}");
    }
    Ok(())
}
