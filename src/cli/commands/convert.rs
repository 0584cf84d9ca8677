use colored::Colorize;

use crate::cli::args::{ConvertArgs, ConvertCommand};
use crate::convert::{elections, jumin};
use crate::error::Result;
use crate::progress::{messages, ProgressManager};

/// Convert registry and election CSV exports into the JSON files the serve
/// layer reads
pub async fn execute(args: ConvertArgs) -> Result<()> {
    match args.command {
        ConvertCommand::JuminSnapshot { input, output } => {
            let snapshot = jumin::convert_snapshot(&input, &output)?;
            println!(
                "{} {} 기준 {}개 지역",
                "✅".green(),
                snapshot.metadata.year_month,
                snapshot.metadata.total_regions
            );
            println!("저장: {}", output.display());
        }
        ConvertCommand::JuminMonthly {
            inputs,
            min_year,
            output,
        } => {
            let series = jumin::convert_monthly(&inputs, min_year, &output)?;
            println!(
                "{} {}개 지역, 기간 {}",
                "✅".green(),
                series.total_regions,
                series.period
            );
            println!("저장: {}", output.display());
        }
        ConvertCommand::JuminYearly {
            population,
            change,
            output,
        } => {
            let yearly = jumin::convert_yearly(&population, &change, &output)?;
            println!("{} {}개 연도", "✅".green(), yearly.len());
            println!("저장: {}", output.display());
        }
        ConvertCommand::JuminGrowth { input, output } => {
            let growth = jumin::convert_growth(&input, &output)?;
            println!(
                "{} {} 기준 {}개 지역 증감",
                "✅".green(),
                growth.metadata.year_month,
                growth.metadata.total_regions
            );
            println!("저장: {}", output.display());
        }
        ConvertCommand::Elections {
            si_dir,
            gu_dir,
            national_dir,
            output,
        } => {
            let progress = ProgressManager::new(false);
            let spinner = progress.create_spinner(messages::CONVERTING);
            let data = elections::convert_elections(&si_dir, &gu_dir, &national_dir, &output)?;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            println!(
                "{} 지방선거 {}회분, 국회의원 선거 {}대분",
                "✅".green(),
                data.local_elections.len(),
                data.national_elections.len()
            );
            println!("저장: {}", output.display());
        }
    }
    Ok(())
}
