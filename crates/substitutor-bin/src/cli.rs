use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "substitute-template-name")]
#[command(version)]
#[command(about = "Rename a project instantiated from the package template")]
#[command(long_about = "Rewrites every tracked file that mentions the current project name (slug, package name or display name) \
and moves files out of the current package directory, so a fresh copy of the template carries the new project's identity.")]
pub struct Cli {
    #[arg(help = "New project name, as a slug (e.g. 'my-app')")]
    pub project_name: String,

    #[arg(long, help = "Project directory (defaults to current directory)")]
    pub path: Option<PathBuf>,

    #[arg(long, help = "Current project name (defaults to the name in pyproject.toml)")]
    pub current_project_name: Option<String>,

    #[arg(long, help = "Perform a dry run without making changes")]
    pub dry_run: bool,

    #[arg(short, long, help = "Interactive mode - prompt for each change")]
    pub interactive: bool,

    #[arg(short, long)]
    pub verbose: bool,

    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
