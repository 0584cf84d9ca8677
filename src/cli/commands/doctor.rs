use crate::cli::args::DoctorArgs;
use crate::config::Config;
use crate::error::Result;
use crate::ops::doctor;

/// Check configuration, data files, and API connectivity
pub async fn execute(args: DoctorArgs) -> Result<()> {
    let config = Config::load().unwrap_or_default();
    doctor::run(&config, &args.data_dir).await?;
    Ok(())
}
