use crate::analyze::analyze_news_file;
use crate::cli::args::AnalyzeArgs;
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::format_analysis_summary;

/// Classify collected news into issue categories and print a summary
pub async fn execute(args: AnalyzeArgs, format: OutputFormat) -> Result<()> {
    let analyzed = analyze_news_file(&args.input, &args.output)?;
    println!("{}", format_analysis_summary(&analyzed, format)?);
    println!("저장: {}", args.output.display());
    Ok(())
}
