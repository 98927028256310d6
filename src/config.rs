use std::{env, ffi::OsStr};

fn ensure_var<K: AsRef<OsStr>>(key: K) -> anyhow::Result<String> {
    env::var(&key).map_err(|e| anyhow::anyhow!("{}: {:?}", e, key.as_ref()))
}

/// Everything the service reads from the environment, validated once at
/// startup and shared with the handlers through an `Extension`.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub assets_bucket: String,
    pub assets_region: String,
    pub stripe_secret_key: String,
    pub cleanup_service_url: String,
    pub cleanup_webhook_secret: Option<String>,
    pub default_currency: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: ensure_var("DATABASE_URL")?,
            assets_bucket: ensure_var("ASSETS_BUCKET")?,
            assets_region: ensure_var("ASSETS_REGION")?,
            stripe_secret_key: ensure_var("STRIPE_SECRET_KEY")?,
            cleanup_service_url: ensure_var("AUDIO_CLEANUP_URL")?,
            cleanup_webhook_secret: env::var("AUDIO_CLEANUP_WEBHOOK_SECRET")
                .ok()
                .filter(|value| !value.is_empty()),
            default_currency: env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "mad".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test owns the process environment; splitting it up would race
    // under the parallel test runner.
    #[test]
    fn from_env_reads_every_value() {
        env::set_var("DATABASE_URL", "postgres://localhost/ucpmaroc");
        env::set_var("ASSETS_BUCKET", "ucpmaroc-assets");
        env::set_var("ASSETS_REGION", "eu-west-3");
        env::remove_var("STRIPE_SECRET_KEY");
        env::set_var("AUDIO_CLEANUP_URL", "https://cleanup.example.com/jobs");
        env::remove_var("AUDIO_CLEANUP_WEBHOOK_SECRET");
        env::remove_var("PAYMENT_CURRENCY");

        assert!(Config::from_env().is_err());

        env::set_var("STRIPE_SECRET_KEY", "sk_test_123");

        let config = Config::from_env().unwrap();
        assert_eq!(config.assets_bucket, "ucpmaroc-assets");
        assert_eq!(config.cleanup_webhook_secret, None);
        assert_eq!(config.default_currency, "mad");
    }
}
