use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Region tree collection arguments
#[derive(Args, Debug)]
pub struct RegionsArgs {
    /// Output file
    #[arg(short, long, default_value = "data/sgis_national_regions.json")]
    pub output: PathBuf,

    /// Delay between API calls in milliseconds
    #[arg(long, default_value = "500")]
    pub call_delay: u64,
}

/// Multiyear statistics collection arguments
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Statistics profile: core (household/house/company) or enhanced
    /// (population basics + age/sex pyramid)
    #[arg(short = 'p', long, default_value = "core")]
    pub profile: String,

    /// Census years to collect (defaults to 2015-2023)
    #[arg(short = 'y', long, value_delimiter = ',')]
    pub years: Option<Vec<String>>,

    /// Parallel workers
    #[arg(short = 'w', long, default_value = "8")]
    pub workers: usize,

    /// Save after this many regions
    #[arg(long, default_value = "100")]
    pub save_every: usize,

    /// Collected region tree file
    #[arg(short = 'r', long, default_value = "data/sgis_national_regions.json")]
    pub regions: PathBuf,

    /// Output file (defaults to a per-profile name under data/)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// One-year comprehensive statistics arguments
#[derive(Args, Debug)]
pub struct ComprehensiveArgs {
    /// Census year
    #[arg(short = 'y', long, default_value = "2023")]
    pub year: String,

    /// Parallel workers
    #[arg(short = 'w', long, default_value = "8")]
    pub workers: usize,

    /// Collected region tree file
    #[arg(short = 'r', long, default_value = "data/sgis_national_regions.json")]
    pub regions: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "data/sgis_comprehensive_stats.json")]
    pub output: PathBuf,
}

/// News collection arguments
#[derive(Args, Debug)]
pub struct NewsArgs {
    #[command(subcommand)]
    pub command: NewsCommand,
}

#[derive(Subcommand, Debug)]
pub enum NewsCommand {
    /// Collect news for national assembly members
    Assembly {
        /// Assembly roster file (converted from election rosters)
        #[arg(long, default_value = "data/assembly_by_region.json")]
        roster: PathBuf,

        /// Output file
        #[arg(short, long, default_value = "data/assembly_member_news.json")]
        output: PathBuf,

        /// Articles requested per member
        #[arg(long, default_value = "50")]
        per_member: u32,

        /// Query suffix appended to each member name
        #[arg(long, default_value = "국정감사")]
        suffix: String,
    },

    /// Collect news for local politicians from a converted election round
    Local {
        /// Converted elections file
        #[arg(long, default_value = "data/all_elections_data.json")]
        elections: PathBuf,

        /// Local election round
        #[arg(long, default_value = "8")]
        round: String,

        /// Output file
        #[arg(short, long, default_value = "data/local_politicians_news.json")]
        output: PathBuf,

        /// Articles requested per member
        #[arg(long, default_value = "50")]
        per_member: u32,

        /// Query suffix appended to each member name
        #[arg(long, default_value = "의원")]
        suffix: String,
    },
}

/// News analysis arguments
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Collected news file
    #[arg(short, long, default_value = "data/assembly_member_news.json")]
    pub input: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "data/assembly_member_analysis.json")]
    pub output: PathBuf,
}

/// File conversion arguments
#[derive(Args, Debug)]
pub struct ConvertArgs {
    #[command(subcommand)]
    pub command: ConvertCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConvertCommand {
    /// Convert a registry CSV export into a population snapshot
    JuminSnapshot {
        /// Registry CSV export
        input: PathBuf,

        /// Output file
        #[arg(short, long, default_value = "data/jumin_population_latest.json")]
        output: PathBuf,
    },

    /// Merge monthly registry CSV exports into per-region time series
    JuminMonthly {
        /// Registry CSV exports, oldest to newest
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Ignore months before this year
        #[arg(long, default_value = "2022")]
        min_year: u16,

        /// Output file
        #[arg(short, long, default_value = "data/jumin_monthly_population.json")]
        output: PathBuf,
    },

    /// Aggregate yearly population and change figures from registry CSVs
    JuminYearly {
        /// Population CSV exports
        #[arg(long, value_delimiter = ',', required = true)]
        population: Vec<PathBuf>,

        /// Population-change CSV exports
        #[arg(long, value_delimiter = ',')]
        change: Vec<PathBuf>,

        /// Output file
        #[arg(short, long, default_value = "data/jumin_yearly_population.json")]
        output: PathBuf,
    },

    /// Extract the latest month's population changes from a registry export
    JuminGrowth {
        /// Registry change CSV export
        input: PathBuf,

        /// Output file
        #[arg(short, long, default_value = "data/jumin_growth_latest.json")]
        output: PathBuf,
    },

    /// Convert election roster CSV directories
    Elections {
        /// Directory of metropolitan council rosters
        #[arg(long)]
        si_dir: PathBuf,

        /// Directory of borough council rosters
        #[arg(long)]
        gu_dir: PathBuf,

        /// Directory of national assembly rosters
        #[arg(long)]
        national_dir: PathBuf,

        /// Output file
        #[arg(short, long, default_value = "data/all_elections_data.json")]
        output: PathBuf,
    },
}

/// Code mapping arguments
#[derive(Args, Debug)]
pub struct MappingArgs {
    /// Comprehensive SGIS statistics file
    #[arg(long, default_value = "data/sgis_comprehensive_stats.json")]
    pub sgis: PathBuf,

    /// Registry population snapshot
    #[arg(long, default_value = "data/jumin_population_latest.json")]
    pub jumin: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "data/code_mapping.json")]
    pub output: PathBuf,
}

/// HTTP serving arguments
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind address
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Bind port
    #[arg(short, long, default_value = "8000")]
    pub port: u16,

    /// Data directory to serve
    #[arg(short, long, default_value = "data")]
    pub data_dir: PathBuf,
}

/// Collection monitor arguments
#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Collection output file to watch
    #[arg(short, long, default_value = "data/sgis_enhanced_multiyear_stats.json")]
    pub output: PathBuf,

    /// Collected region tree file (for the per-year target count)
    #[arg(short = 'r', long, default_value = "data/sgis_national_regions.json")]
    pub regions: PathBuf,

    /// Total years the collection covers
    #[arg(long, default_value = "9")]
    pub years: usize,

    /// Refresh every N seconds instead of printing once
    #[arg(short = 'w', long)]
    pub watch: Option<u64>,
}

/// Environment check arguments
#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Data directory to inspect
    #[arg(short, long, default_value = "data")]
    pub data_dir: PathBuf,
}

/// Configuration command arguments
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., sgis.service_id)
        key: String,
        /// Value to set
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Show the configuration file path
    Path,

    /// Create the configuration file with defaults
    Init,
}
