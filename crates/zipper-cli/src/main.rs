//! zipper-cli - Command-line interface for zipper
//!
//! Archives the files of a directory that pass an include/exclude filter into
//! a ZIP file, optionally bounded by a compressed size budget.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use zipper_core::config::{parse_size, Config};
use zipper_core::{write_archive, FileSelector, FilterPatterns};

mod progress;

use progress::ProgressReporter;

/// zipper - filtered, size-bounded ZIP archiving
#[derive(Parser)]
#[command(name = "zipper")]
#[command(author, version, about = "Archive the files of a directory that pass a filter", long_about = None)]
struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show progress bar during operations
    #[arg(long, global = true)]
    progress: bool,

    /// Configuration file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Archive the selected files of a directory into a ZIP file
    Zip {
        /// Directory to scan
        base_dir: PathBuf,

        /// Output archive file
        #[arg(short, long)]
        output: PathBuf,

        /// Comma or newline separated glob patterns; prefix with ! to exclude
        #[arg(short, long)]
        filter: Option<String>,

        /// Compressed size limit, e.g. 500000, 10MB or 64KiB (0 = unlimited)
        #[arg(long, value_parser = parse_size_arg)]
        max_size: Option<u64>,

        /// Compression level (0-9, 0 = store)
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=9))]
        level: Option<u32>,
    },

    /// List the files a filter selects without archiving them
    List {
        /// Directory to scan
        base_dir: PathBuf,

        /// Comma or newline separated glob patterns; prefix with ! to exclude
        #[arg(short, long)]
        filter: Option<String>,

        /// Output format as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or initialize configuration
    Config {
        /// Show current configuration
        #[arg(long, conflicts_with_all = ["init", "path"])]
        show: bool,

        /// Write a default configuration file, replacing any existing one
        #[arg(long, conflicts_with_all = ["show", "path"])]
        init: bool,

        /// Show configuration file path
        #[arg(long, conflicts_with_all = ["show", "init"])]
        path: bool,
    },
}

fn parse_size_arg(value: &str) -> std::result::Result<u64, String> {
    parse_size(value).map_err(|e| e.to_string())
}

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let result = run();

    match result {
        Ok(_) => process::exit(0),
        Err(e) => {
            error!("Error: {:#}", e);
            if !tracing::dispatcher::has_been_set() {
                eprintln!("Error: {:#}", e);
            }

            let exit_code = map_error_to_exit_code(&e);
            process::exit(exit_code);
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Zip {
            base_dir,
            output,
            filter,
            max_size,
            level,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let filter = resolve_filter(filter.as_deref(), &config);

            let mut options = config.zip_options();
            if let Some(max_size) = max_size {
                options.max_zip_size = max_size;
            }
            if level.is_some() {
                options.compression_level = level;
            }

            info!("Zipping {:?} into {:?}", base_dir, output);

            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {:?}", parent))?;
            }
            let sink = File::create(&output)
                .with_context(|| format!("Failed to create {:?}", output))?;

            let selection = FileSelector::new(&base_dir, &filter)?.select();
            let own_name = relative_output_name(&base_dir, &output);
            let files: Vec<String> = selection
                .into_files()
                .into_iter()
                .filter(|file| Some(file) != own_name.as_ref())
                .collect();
            info!("Selected {} files", files.len());

            let reporter = ProgressReporter::new(cli.progress, files.len() as u64);
            let mut listener =
                |name: &str, compressed: u64| reporter.file_started(name, compressed);

            match write_archive(&base_dir, files.as_slice(), sink, &options, Some(&mut listener)) {
                Ok(_) => {
                    reporter.finish();
                    info!("Archive written to {:?}", output);
                }
                Err(e) => {
                    reporter.abandon();
                    if let Err(remove_err) = fs::remove_file(&output) {
                        warn!("Failed to remove {:?}: {}", output, remove_err);
                    }
                    return Err(e.into());
                }
            }
        }

        Commands::List {
            base_dir,
            filter,
            json,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let filter = resolve_filter(filter.as_deref(), &config);
            let selection = FileSelector::new(&base_dir, &filter)?.select();

            if json {
                println!("{}", serde_json::to_string_pretty(&selection)?);
            } else {
                for file in selection.files() {
                    println!("{}", file);
                }
            }

            info!("{} files selected", selection.len());
        }

        Commands::Config { show, init, path } => {
            if init {
                match cli.config {
                    Some(path) => {
                        Config::default().save_to(&path)?;
                        info!("Wrote default configuration to {:?}", path);
                    }
                    None => {
                        Config::default()
                            .save()
                            .map_err(|e| anyhow::anyhow!("Failed to save default config: {}", e))?;
                        info!("Wrote default configuration");
                    }
                }
            } else if path {
                let config_path = match cli.config {
                    Some(path) => path,
                    None => Config::config_path()
                        .map_err(|e| anyhow::anyhow!("Failed to get config path: {}", e))?,
                };
                println!("{}", config_path.display());
            } else if show {
                let config = load_config(cli.config.as_deref())?;
                println!("{}", toml::to_string_pretty(&config)?);
            } else {
                eprintln!("Please specify --show, --init or --path");
            }
        }
    }

    Ok(())
}

/// Explicit config file if given, else the default location (falling back
/// to defaults when it cannot be read)
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::load_from(path)?),
        None => Ok(Config::load_or_default()),
    }
}

/// Command-line filter if given, else the configured default
fn resolve_filter(filter: Option<&str>, config: &Config) -> FilterPatterns {
    match filter {
        Some(filter) => FilterPatterns::parse(Some(filter)),
        None => config.filter_patterns(),
    }
}

/// Name the output archive would have inside `base_dir`, so it is never
/// added to itself
fn relative_output_name(base_dir: &Path, output: &Path) -> Option<String> {
    let base_dir = base_dir.canonicalize().ok()?;
    let output = output.canonicalize().ok()?;
    let relative = output.strip_prefix(&base_dir).ok()?;
    let parts = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

/// Map errors to exit codes:
/// - 0: Success
/// - 1: General or configuration error
/// - 2: IO error
/// - 3: Invalid arguments
/// - 4: Size budget exceeded
/// - 5: No files to archive
fn map_error_to_exit_code(err: &anyhow::Error) -> i32 {
    if let Some(zipper_err) = err.downcast_ref::<zipper_core::Error>() {
        match zipper_err {
            zipper_core::Error::Io(_) => 2,
            zipper_core::Error::Zip(_) => 2,
            zipper_core::Error::Pattern(_) => 3,
            zipper_core::Error::Config(_) => 1,
            zipper_core::Error::BudgetExceeded { .. } => 4,
            zipper_core::Error::NoFilesToArchive => 5,
        }
    } else if err.is::<std::io::Error>() {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_relative_output_name_inside_base() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("out");
        fs::create_dir(&nested).unwrap();
        let output = nested.join("archive.zip");
        File::create(&output).unwrap();

        assert_eq!(
            relative_output_name(temp_dir.path(), &output).as_deref(),
            Some("out/archive.zip")
        );
    }

    #[test]
    fn test_relative_output_name_outside_base() {
        let base = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let output = other.path().join("archive.zip");
        File::create(&output).unwrap();

        assert_eq!(relative_output_name(base.path(), &output), None);
    }

    #[test]
    fn test_exit_codes() {
        let budget: anyhow::Error = zipper_core::Error::BudgetExceeded {
            file_name: "a".to_string(),
            bytes_so_far: 1,
            budget: 1,
        }
        .into();
        assert_eq!(map_error_to_exit_code(&budget), 4);

        let nothing: anyhow::Error = zipper_core::Error::NoFilesToArchive.into();
        assert_eq!(map_error_to_exit_code(&nothing), 5);

        let io: anyhow::Error = std::io::Error::new(std::io::ErrorKind::Other, "x").into();
        assert_eq!(map_error_to_exit_code(&io), 2);
    }

    #[test]
    fn test_resolve_filter_prefers_command_line() {
        let mut config = Config::default();
        config.filter.patterns = "*.md".to_string();

        assert_eq!(resolve_filter(None, &config).includes(), ["*.md"]);
        assert_eq!(resolve_filter(Some("*.rs"), &config).includes(), ["*.rs"]);
    }
}
