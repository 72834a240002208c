// Create configuration structure for:
// - Provider endpoint URL / API key (from environment variables)
// - Server listening address/port
// - Fetch retry and cache settings
// - Dataset and model artifact paths

use crate::cache::RetryPolicy;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub provider_api_url: String,
    pub provider_api_key: String,
    /// Requests per second against the provider; None disables limiting.
    pub provider_rate_limit: Option<u32>,
    pub provider_timeout_secs: u64,
    pub start_block: u64,
    pub end_block: u64,
    pub fetch_max_attempts: usize,
    pub fetch_base_delay_ms: u64,
    pub cache_dir: PathBuf,
    pub cache_max_capacity: u64,
    pub dataset_path: PathBuf,
    pub model_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .unwrap_or(5000);
        let provider_api_url = env::var("ETHERSCAN_API_URL")
            .unwrap_or_else(|_| "https://api.etherscan.io/api".to_string());
        let provider_api_key = env::var("ETHERSCAN_API_KEY").unwrap_or_default();
        let provider_rate_limit = env::var("PROVIDER_RATE_LIMIT")
            .map(|v| v.parse().ok())
            .unwrap_or(None);
        let provider_timeout_secs = env::var("PROVIDER_TIMEOUT_SECS")
            .map(|v| v.parse().unwrap_or(30))
            .unwrap_or(30);
        let start_block = env::var("START_BLOCK")
            .map(|v| v.parse().unwrap_or(0))
            .unwrap_or(0);
        let end_block = env::var("END_BLOCK")
            .map(|v| v.parse().unwrap_or(99_999_999))
            .unwrap_or(99_999_999);
        let fetch_max_attempts = env::var("FETCH_MAX_ATTEMPTS")
            .map(|v| v.parse().unwrap_or(3))
            .unwrap_or(3);
        let fetch_base_delay_ms = env::var("FETCH_BASE_DELAY_MS")
            .map(|v| v.parse().unwrap_or(2000))
            .unwrap_or(2000);
        let cache_dir = env::var("CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("cache"));
        let cache_max_capacity = env::var("CACHE_MAX_CAPACITY")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()
            .unwrap_or(1000);
        let dataset_path = env::var("DATASET_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("transaction_dataset.csv"));
        let model_path = env::var("MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("fraud_model.json"));

        Self {
            server_host,
            server_port,
            provider_api_url,
            provider_api_key,
            provider_rate_limit,
            provider_timeout_secs,
            start_block,
            end_block,
            fetch_max_attempts,
            fetch_base_delay_ms,
            cache_dir,
            cache_max_capacity,
            dataset_path,
            model_path,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.fetch_max_attempts,
            base_delay: Duration::from_millis(self.fetch_base_delay_ms),
        }
    }
}
