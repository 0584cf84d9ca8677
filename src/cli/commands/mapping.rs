use colored::Colorize;

use crate::cli::args::MappingArgs;
use crate::convert::mapping::create_code_mapping;
use crate::error::Result;

/// Join SGIS emdong codes to registry codes by full address
pub async fn execute(args: MappingArgs) -> Result<()> {
    let mapping = create_code_mapping(&args.sgis, &args.jumin, &args.output)?;

    println!(
        "{} 매칭 {} / SGIS {} (주민등록 {})",
        "✅".green(),
        mapping.metadata.total_matched,
        mapping.metadata.sgis_codes,
        mapping.metadata.jumin_codes
    );
    if !mapping.metadata.unmatched_sgis.is_empty() {
        println!(
            "{} 미매칭 {}건 (출력 파일의 metadata.unmatched_sgis 참고)",
            "⚠️".yellow(),
            mapping.metadata.unmatched_sgis.len()
        );
    }
    println!("저장: {}", args.output.display());
    Ok(())
}
