pub mod args;
pub mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Korean public statistics toolkit
#[derive(Parser, Debug)]
#[command(
    name = "insightforge",
    about = "Collect, convert, analyze, and serve Korean regional statistics",
    version,
    author,
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for summaries
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect the national region tree (시도/시군구/읍면동)
    #[command(alias = "r")]
    Regions(args::RegionsArgs),

    /// Collect multiyear census statistics per emdong
    #[command(alias = "s")]
    Stats(args::StatsArgs),

    /// Collect one census year with full region context
    Comprehensive(args::ComprehensiveArgs),

    /// Collect news articles for politicians
    #[command(alias = "n")]
    News(args::NewsArgs),

    /// Classify collected news into issue categories
    #[command(alias = "a")]
    Analyze(args::AnalyzeArgs),

    /// Convert registry and election CSV exports
    Convert(args::ConvertArgs),

    /// Join SGIS and registry region codes by address
    Mapping(args::MappingArgs),

    /// Serve the data directory as a JSON API
    Serve(args::ServeArgs),

    /// Watch a running collection's progress
    Monitor(args::MonitorArgs),

    /// Check configuration, data files, and API connectivity
    Doctor(args::DoctorArgs),

    /// Manage configuration
    #[command(alias = "c")]
    Config(args::ConfigArgs),

    /// Show version information
    Version,

    /// Generate shell completion scripts
    Completions {
        /// The shell to generate completions for (detected from $SHELL if omitted)
        #[arg(value_enum)]
        shell: Option<Shell>,
    },
}

impl Cli {
    /// Generate shell completion scripts
    fn generate_completions(shell: Shell) {
        use clap::CommandFactory;
        use clap_complete::generate;
        use std::io;

        let mut cmd = Self::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut io::stdout());
    }

    /// Run the CLI application
    pub async fn run() -> crate::error::Result<()> {
        let cli = Self::parse();

        // Set up logging
        if cli.verbose {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
                .init();
        } else {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .init();
        }

        let result = match cli.command {
            Commands::Regions(args) => commands::regions::execute(args, cli.format).await,
            Commands::Stats(args) => commands::stats::execute(args).await,
            Commands::Comprehensive(args) => commands::comprehensive::execute(args).await,
            Commands::News(args) => commands::news::execute(args).await,
            Commands::Analyze(args) => commands::analyze::execute(args, cli.format).await,
            Commands::Convert(args) => commands::convert::execute(args).await,
            Commands::Mapping(args) => commands::mapping::execute(args).await,
            Commands::Serve(args) => commands::serve::execute(args).await,
            Commands::Monitor(args) => commands::monitor::execute(args).await,
            Commands::Doctor(args) => commands::doctor::execute(args).await,
            Commands::Config(args) => commands::config::execute(args).await,
            Commands::Version => {
                commands::version::execute();
                Ok(())
            }
            Commands::Completions { shell } => {
                match shell.or_else(Shell::from_env) {
                    Some(shell) => Self::generate_completions(shell),
                    None => {
                        eprintln!("Unable to detect current shell.");
                        eprintln!("Please specify a shell:");
                        eprintln!("  insightforge completions bash");
                        eprintln!("  insightforge completions zsh");
                        eprintln!("  insightforge completions fish");
                    }
                }
                Ok(())
            }
        };

        // Handle errors with better messaging
        match result {
            Ok(()) => Ok(()),
            Err(e) => {
                use crate::error::ForgeError;
                match &e {
                    ForgeError::NoSgisCredentials => {
                        eprintln!("Error: SGIS credentials are not configured.");
                        eprintln!("\nRequest a key at https://sgis.kostat.go.kr and run:");
                        eprintln!("  insightforge config set sgis.service_id YOUR_SERVICE_ID");
                        eprintln!("  insightforge config set sgis.security_key YOUR_SECURITY_KEY");
                    }
                    ForgeError::NoNaverCredentials => {
                        eprintln!("Error: Naver API credentials are not configured.");
                        eprintln!("\nRegister an application at https://developers.naver.com and run:");
                        eprintln!("  insightforge config set naver.client_id YOUR_CLIENT_ID");
                        eprintln!("  insightforge config set naver.client_secret YOUR_CLIENT_SECRET");
                    }
                    ForgeError::ApiError {
                        code,
                        message,
                        hint,
                    } => {
                        eprintln!("Error: {}", message);
                        if cli.verbose {
                            eprintln!("Code: {}", code);
                        }
                        if let Some(hint) = hint {
                            eprintln!("\nHint: {}", hint);
                        }
                    }
                    ForgeError::Network(err) => {
                        eprintln!("Network error: {}", err);
                        eprintln!("\nPlease check your internet connection and try again.");
                    }
                    ForgeError::NotFound(msg) => {
                        eprintln!("Error: {}", msg);
                    }
                    _ => {
                        eprintln!("Error: {}", e);
                    }
                }
                Err(e)
            }
        }
    }
}
