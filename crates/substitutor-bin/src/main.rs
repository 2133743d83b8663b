mod cli;
mod diff;

use anyhow::Result;
use cli::Cli;
use substitutor_core::{GitTrackedFiles, SubstituteError, SubstituteOptions};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    setup_logging(&cli)?;

    let root = match cli.path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    if !root.exists() {
        anyhow::bail!("Project directory does not exist: {:?}", root);
    }

    if !root.is_dir() {
        anyhow::bail!("Project path must be a directory: {:?}", root);
    }

    let substitutor = substitutor_core::resolve_substitutor(
        &root,
        &cli.project_name,
        cli.current_project_name.as_deref(),
    )?;
    let options = SubstituteOptions { dry_run: cli.dry_run };

    info!(
        "Renaming project '{}' to '{}' in {:?}",
        substitutor.current().slug(),
        substitutor.new_identity().slug(),
        root
    );
    info!("Interactive mode: {}", cli.interactive);

    if cli.dry_run {
        warn!("Dry run mode - no changes will be made");
    }

    let result = if cli.interactive {
        let content_callback = |file_path: &std::path::Path, old_content: &str, new_content: &str| {
            diff::show_diff_and_confirm(file_path, old_content, new_content).map_err(review_error)
        };

        let path_callback = |old_path: &std::path::Path, new_path: &std::path::Path| {
            diff::show_path_change_and_confirm(old_path, new_path).map_err(review_error)
        };

        substitutor.run_interactive(&GitTrackedFiles, options, content_callback, path_callback)?
    } else {
        substitutor.run(&GitTrackedFiles, options)?
    };

    info!("  Files visited: {}", result.files_visited);
    info!("  Content changes: {}", result.content_changes);
    info!("  Paths renamed: {}", result.paths_renamed);

    Ok(())
}

fn review_error(error: anyhow::Error) -> SubstituteError {
    SubstituteError::Review {
        message: error.to_string(),
    }
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact()
        )
        .with(filter)
        .init();

    Ok(())
}
