use clap::Args;
use decimator::DecimationOptions;
use eyre::{Result, WrapErr};

#[derive(Args, Debug, Clone)]
pub struct DecimationArgs {
    /// Decimation options file (JSON, e.g. {"enabled":true,"algorithm":"min-max"})
    #[clap(long)]
    pub config: Option<String>,

    /// Decimation algorithm [default: min-max]
    #[clap(long, env = "DECIMATOR_ALGORITHM")]
    pub algorithm: Option<String>,

    /// Enable or disable decimation [default: true, or the config file's value]
    #[clap(long, action = clap::ArgAction::Set)]
    pub enabled: Option<bool>,

    /// Available pixel columns to decimate for
    #[clap(long, default_value_t = 1600)]
    pub width: usize,
}

impl DecimationArgs {
    /// Options from the config file, if any, with flags layered on top.
    pub async fn load(&self) -> Result<DecimationOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let raw = tokio::fs::read(path)
                    .await
                    .wrap_err_with(|| format!("reading {}", path))?;
                serde_json::from_slice(&raw).wrap_err_with(|| format!("parsing {}", path))?
            }
            None => DecimationOptions {
                enabled: true,
                ..Default::default()
            },
        };
        if let Some(algorithm) = &self.algorithm {
            options.algorithm = algorithm.clone();
        }
        if let Some(enabled) = self.enabled {
            options.enabled = enabled;
        }
        if self.width == 0 {
            eyre::bail!("--width must be greater than zero");
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> DecimationArgs {
        DecimationArgs {
            config: None,
            algorithm: None,
            enabled: None,
            width: 800,
        }
    }

    #[tokio::test]
    async fn defaults_enable_min_max() {
        let options = args().load().await.unwrap();
        assert!(options.enabled);
        assert_eq!(options.algorithm, "min-max");
    }

    #[tokio::test]
    async fn flags_override() {
        let options = DecimationArgs {
            algorithm: Some("lttb".to_string()),
            enabled: Some(false),
            ..args()
        }
        .load()
        .await
        .unwrap();
        assert!(!options.enabled);
        assert_eq!(options.algorithm, "lttb");
    }

    #[tokio::test]
    async fn config_file_is_read() {
        let path = std::env::temp_dir().join(format!("decimator-options-{}.json", std::process::id()));
        tokio::fs::write(&path, br#"{"algorithm":"min-max"}"#).await.unwrap();
        let options = DecimationArgs {
            config: Some(path.to_string_lossy().into_owned()),
            ..args()
        }
        .load()
        .await
        .unwrap();
        tokio::fs::remove_file(&path).await.unwrap();
        // The file leaves `enabled` at its default.
        assert!(!options.enabled);
    }

    #[tokio::test]
    async fn zero_width_rejected() {
        let err = DecimationArgs { width: 0, ..args() }.load().await;
        assert!(err.is_err());
    }
}
