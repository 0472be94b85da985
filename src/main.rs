//! Command-line entry point for packaging the Qwen TTS service.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use qwen_tts_bundle::bundle::command::product_artifact_name;
use qwen_tts_bundle::bundle::{
    artifact_name, run_bundle, BuildCommand, BundleConfig, BundleError, ProcessExecutor,
};
use qwen_tts_bundle::platform::{host_machine_name, host_os_name, TargetTriple};

/// Package the Qwen TTS service into a single platform-specific executable
#[derive(Debug, Parser)]
#[command(name = "qwen-tts-bundle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the target triple and artifact name
    Target {
        /// OS name to resolve instead of the host's (e.g. darwin, linux, windows)
        #[arg(long)]
        os: Option<String>,

        /// Machine name to resolve instead of the host's (e.g. x86_64, arm64)
        #[arg(long)]
        machine: Option<String>,
    },

    /// Build the single-file executable
    Bundle {
        /// Bundle config file (JSON); missing keys use defaults
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Packaging tool executable
        #[arg(long)]
        tool: Option<String>,

        /// Service entry point
        #[arg(long)]
        entry_point: Option<PathBuf>,

        /// Output directory of the packaging tool
        #[arg(long)]
        dist_dir: Option<PathBuf>,

        /// Directory to run the packaging tool in
        #[arg(long)]
        work_dir: Option<PathBuf>,

        /// Print the command line without running it
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Target { os, machine } => {
            print_target(os, machine);
            Ok(())
        }
        Commands::Bundle {
            config,
            tool,
            entry_point,
            dist_dir,
            work_dir,
            dry_run,
        } => load_config(config, tool, entry_point, dist_dir, work_dir)
            .and_then(|config| bundle(&config, dry_run)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn print_target(os: Option<String>, machine: Option<String>) {
    let os = os.unwrap_or_else(|| host_os_name().to_string());
    let machine = machine.unwrap_or_else(|| host_machine_name().to_string());
    let triple = TargetTriple::resolve(&os, &machine);

    println!("Target:   {triple}");
    println!("Artifact: {}", artifact_name(&triple));
    if !triple.is_fully_resolved() {
        println!("Note:     {os}/{machine} is not a recognized platform");
    }
}

fn load_config(
    path: Option<PathBuf>,
    tool: Option<String>,
    entry_point: Option<PathBuf>,
    dist_dir: Option<PathBuf>,
    work_dir: Option<PathBuf>,
) -> Result<BundleConfig, BundleError> {
    let mut config = match path {
        Some(path) => BundleConfig::from_json_file(&path)?,
        None => BundleConfig::default(),
    };

    if let Some(tool) = tool {
        config.tool = tool;
    }
    if let Some(entry_point) = entry_point {
        config.entry_point = entry_point;
    }
    if let Some(dist_dir) = dist_dir {
        config.dist_dir = dist_dir;
    }
    if work_dir.is_some() {
        config.work_dir = work_dir;
    }

    config.validate()?;
    Ok(config)
}

fn bundle(config: &BundleConfig, dry_run: bool) -> Result<(), BundleError> {
    let triple = TargetTriple::host();

    if dry_run {
        let name = product_artifact_name(&config.product, &triple);
        println!("{}", BuildCommand::new(config, &name));
        return Ok(());
    }

    let mut executor = match &config.work_dir {
        Some(dir) => ProcessExecutor::in_dir(dir),
        None => ProcessExecutor::new(),
    };
    if let Some(dir) = executor.work_dir() {
        log::info!("Running {} in {}", config.tool, dir.display());
    }
    run_bundle(config, &triple, &mut executor)?;
    Ok(())
}
