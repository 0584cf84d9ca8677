use crate::cli::args::{ConfigArgs, ConfigCommand};
use crate::config::Config;
use crate::error::Result;

/// Execute config command
pub async fn execute(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("✅ Configuration updated: {} = {}", key, mask_value(&value));
            Ok(())
        }
        ConfigCommand::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}: {}", key, mask_value(&value));
                }
                None => {
                    println!("Configuration key '{}' not found", key);
                }
            }
            Ok(())
        }
        ConfigCommand::Path => {
            let path = Config::config_file_path()?;
            println!("Configuration file: {}", path.display());
            Ok(())
        }
        ConfigCommand::Init => {
            Config::initialize()?;
            println!("✅ Configuration initialized");
            println!();
            println!("To set your API credentials, run:");
            println!("  insightforge config set sgis.service_id YOUR_SERVICE_ID");
            println!("  insightforge config set sgis.security_key YOUR_SECURITY_KEY");
            println!("  insightforge config set naver.client_id YOUR_CLIENT_ID");
            println!("  insightforge config set naver.client_secret YOUR_CLIENT_SECRET");
            println!();
            println!("SGIS keys: https://sgis.kostat.go.kr | Naver keys: https://developers.naver.com");
            Ok(())
        }
    }
}

/// Mask sensitive values for display
fn mask_value(value: &str) -> String {
    if value.chars().count() > 10 {
        let prefix: String = value.chars().take(10).collect();
        format!("{}...({} characters)", prefix, value.chars().count())
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_value() {
        assert_eq!(mask_value("short"), "short");
        assert_eq!(
            mask_value("abcdefghijklmnop"),
            "abcdefghij...(16 characters)"
        );
        // Multibyte values truncate on character boundaries
        assert_eq!(
            mask_value("가나다라마바사아자차카타"),
            "가나다라마바사아자차...(12 characters)"
        );
    }
}
