// Sun Oct 18 2026 - Alex

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use dll_proxy_generator::{
    build::BuildMode,
    config::Config,
    generator::ActionKind,
    lister::ListerKind,
    orchestrator::ProxyCoordinator,
    ui::{Banner, ConsoleObserver},
};
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version)]
#[command(about = "Generate proxy DLL sources that report when they are loaded", long_about = None)]
struct Args {
    /// A DLL, or a directory whose DLLs are all processed
    input: PathBuf,

    /// Directory receiving pch.h, the generated sources and compiled proxies
    output: PathBuf,

    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_parser = parse_lister)]
    lister: Option<ListerKind>,

    #[arg(long, value_parser = parse_action)]
    action: Option<ActionKind>,

    /// Text prefixed to every detection message
    #[arg(long)]
    tag: Option<String>,

    /// Generate sources only
    #[arg(long, conflicts_with = "build_command")]
    no_build: bool,

    /// Compiler used instead of MSVC; arguments may use {source}, {output}, {dir} and {stem}
    #[arg(long)]
    build_command: Option<String>,

    #[arg(long = "build-arg", requires = "build_command", allow_hyphen_values = true)]
    build_args: Vec<String>,

    /// Seconds allowed for each external tool invocation
    #[arg(long)]
    timeout: Option<u64>,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[arg(long)]
    no_banner: bool,
}

fn parse_lister(s: &str) -> Result<ListerKind, String> {
    ListerKind::parse(s).ok_or_else(|| format!("unknown lister '{}' (expected auto, dumpbin or pe)", s))
}

fn parse_action(s: &str) -> Result<ActionKind, String> {
    ActionKind::parse(s).ok_or_else(|| format!("unknown action '{}' (expected message-box or debug-string)", s))
}

fn level_from_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn build_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(lister) = args.lister {
        config = config.with_lister(lister);
    }
    if let Some(action) = args.action {
        config = config.with_action(action);
    }
    if let Some(tag) = &args.tag {
        config = config.with_message_tag(tag.clone());
    }
    if let Some(seconds) = args.timeout {
        config = config.with_timeout(seconds);
    }
    if let Some(program) = &args.build_command {
        let mut command = vec![program.clone()];
        command.extend(args.build_args.iter().cloned());
        config = config.with_build_command(command);
    }
    if args.no_build {
        config = config.with_build_mode(BuildMode::None);
    }

    Ok(config)
}

fn run(args: &Args) -> Result<bool> {
    let config = build_config(args)?;
    let coordinator = ProxyCoordinator::from_config(config).context("Invalid configuration")?;

    let mut console = ConsoleObserver::new().with_verbose(args.verbose > 0);
    console.info(&format!(
        "Listing exports with {}, building with {}",
        coordinator.lister_name(),
        coordinator.builder_name()
    ));

    let start_time = Instant::now();
    let report = coordinator
        .run(&args.input, &args.output, &mut console)
        .with_context(|| format!("Failed to process {}", args.input.display()))?;

    console.print_summary(&report);
    console.info(&format!("Finished in {:.2}s", start_time.elapsed().as_secs_f64()));

    if report.discovered == 0 {
        console.warning(&format!("No libraries found in {}", args.input.display()));
    }
    Ok(report.any_succeeded())
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(level_from_verbosity(args.verbose))
        .parse_env("RUST_LOG")
        .init();

    if !args.no_banner {
        Banner::default_banner().print();
        println!();
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            ConsoleObserver::new().error(&format!("{:#}", e));
            ExitCode::from(2)
        }
    }
}
