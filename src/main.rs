use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use ltfix::checker::client::LanguageToolClient;
use ltfix::cli::output::{self, OutputFormat};
use ltfix::server::ServerHandle;
use ltfix::{checker, Config};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "ltfix")]
#[command(version, about = "Grammar and spell fixing backed by a local LanguageTool server", long_about = None)]
struct Cli {
    /// Files to check
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Apply the top suggestion for every issue and write files in place
    #[arg(short, long)]
    fix: bool,

    /// Interactive mode for selecting corrections
    #[arg(short, long, requires = "fix")]
    interactive: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if issues are found
    #[arg(long)]
    no_fail: bool,

    /// Language to check against (e.g., en-US, de-DE)
    #[arg(short, long)]
    language: Option<String>,

    /// Base URL of the LanguageTool server
    #[arg(long, value_name = "URL")]
    server_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Rule to disable (repeatable)
    #[arg(long = "disable-rule", value_name = "RULE")]
    disabled_rules: Vec<String>,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Launch a local server before checking and stop it on exit
    #[arg(long)]
    start_server: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// List languages supported by the server
    Languages,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "ltfix", &mut io::stdout());
        return Ok(());
    }

    // Load configuration
    let mut config = Config::load(
        cli.language.clone(),
        cli.server_url.clone(),
        cli.timeout,
        cli.disabled_rules.clone(),
    )?;
    if cli.start_server {
        config.server.autostart = true;
    }

    // Spawn the server before anything talks to it. The handle's Drop kills
    // the child whenever main returns, error path included.
    let mut server = None;
    if config.server.autostart {
        let mut handle = ServerHandle::start(&config.server)?;
        config.server_url = handle.url();
        handle.wait_until_ready(Duration::from_secs(config.server.startup_timeout_secs))?;
        server = Some(handle);
    }

    // Handle subcommands
    if let Some(command) = cli.command {
        return handle_command(command, &config, !cli.no_color);
    }

    // Validate input files
    if cli.files.is_empty() {
        anyhow::bail!("No files specified. Use --help for usage information.");
    }

    // Initialize checker
    let checker = checker::GrammarChecker::new(&config)?;

    // Process files
    let mut total_issues = 0;
    let mut total_fixed = 0;

    for file_path in &cli.files {
        if !file_path.exists() {
            eprintln!("Error: File not found: {}", file_path.display());
            continue;
        }

        let outcome = if cli.fix {
            if cli.interactive {
                checker.fix_interactive(file_path, !cli.no_color)
            } else {
                checker.fix_auto(file_path, !cli.no_color)
            }
        } else {
            checker.check(file_path, !cli.no_color, &cli.format)
        };

        // An unreadable or undecodable file fails that file only; the
        // remaining files are still checked.
        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                eprintln!("Error: {:#}", err);
                continue;
            }
        };

        total_issues += result.issue_count;
        total_fixed += result.fixed_count;
    }

    // Print summary
    if cli.fix {
        output::print_fix_summary(total_fixed, &cli.files, !cli.no_color);
    } else {
        output::print_check_summary(total_issues, &cli.files, !cli.no_color);
    }

    // process::exit skips destructors; reap the child first.
    drop(server);

    // Exit with appropriate code
    if total_issues > 0 && !cli.no_fail && !cli.fix {
        std::process::exit(1);
    }

    Ok(())
}

fn handle_command(command: Commands, config: &Config, colored: bool) -> Result<()> {
    match command {
        Commands::Languages => {
            let client = LanguageToolClient::new(
                &config.server_url,
                Duration::from_secs(config.timeout_secs),
            )?;
            match client.languages() {
                Ok(languages) => output::print_languages(&languages, colored),
                Err(err) => output::print_check_failure(&err, colored),
            }
        }
    }
    Ok(())
}
