use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VigilConfig {
    #[serde(default)]
    pub waits: WaitSettings,
    #[serde(default)]
    pub actions: ActionSettings,
    #[serde(default)]
    pub verification: VerificationSettings,
    #[serde(default)]
    pub storefront: StorefrontSettings,
    #[serde(default)]
    pub webdriver: WebDriverSettings,
    #[serde(default)]
    pub security: SecuritySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitSettings {
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,
    /// Budget for signals that may legitimately never appear (error banners).
    #[serde(default = "default_optional_timeout_ms")]
    pub optional_timeout_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Debounce before a wait on widgets known to need one.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_count_sync_timeout_ms")]
    pub count_sync_timeout_ms: u64,
}

impl WaitSettings {
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    pub fn optional_timeout(&self) -> Duration {
        Duration::from_millis(self.optional_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn count_sync_timeout(&self) -> Duration {
        Duration::from_millis(self.count_sync_timeout_ms)
    }
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            default_timeout_ms: default_timeout_ms(),
            optional_timeout_ms: default_optional_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            count_sync_timeout_ms: default_count_sync_timeout_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    20000
}

fn default_optional_timeout_ms() -> u64 {
    5000
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_settle_delay_ms() -> u64 {
    500
}

fn default_count_sync_timeout_ms() -> u64 {
    15000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionSettings {
    /// Total attempts (first try included) when the target goes stale.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_fallback_activation")]
    pub fallback_activation: bool,
}

impl Default for ActionSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            fallback_activation: default_fallback_activation(),
        }
    }
}

fn default_max_attempts() -> u32 {
    2
}

fn default_fallback_activation() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSettings {
    #[serde(default = "default_price_tolerance")]
    pub price_tolerance: f64,
    #[serde(default = "default_total_tolerance")]
    pub total_tolerance: f64,
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self {
            price_tolerance: default_price_tolerance(),
            total_tolerance: default_total_tolerance(),
        }
    }
}

fn default_price_tolerance() -> f64 {
    0.01
}

fn default_total_tolerance() -> f64 {
    0.02
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorefrontSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_ascending_category")]
    pub ascending_category: String,
    #[serde(default = "default_descending_category")]
    pub descending_category: String,
    #[serde(default = "default_min_max_category")]
    pub min_max_category: String,
    #[serde(default = "default_partial_search")]
    pub partial_search: String,
    #[serde(default = "default_full_search")]
    pub full_search: String,
    #[serde(default = "default_password")]
    pub password: String,
}

impl StorefrontSettings {
    /// Join a storefront-relative path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for StorefrontSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ascending_category: default_ascending_category(),
            descending_category: default_descending_category(),
            min_max_category: default_min_max_category(),
            partial_search: default_partial_search(),
            full_search: default_full_search(),
            password: default_password(),
        }
    }
}

fn default_base_url() -> String {
    "https://magento.softwaretestingboard.com/".to_string()
}

fn default_ascending_category() -> String {
    "gear/bags.html".to_string()
}

fn default_descending_category() -> String {
    "men/tops-men.html".to_string()
}

fn default_min_max_category() -> String {
    "women/tops-women.html".to_string()
}

fn default_partial_search() -> String {
    "bag".to_string()
}

fn default_full_search() -> String {
    "Wayfarer Messenger Bag".to_string()
}

fn default_password() -> String {
    "Password123!".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebDriverSettings {
    #[serde(default = "default_webdriver_url")]
    pub url: String,
    #[serde(default = "default_headless")]
    pub headless: bool,
    #[serde(default = "default_window_size")]
    pub window_size: String,
}

impl Default for WebDriverSettings {
    fn default() -> Self {
        Self {
            url: default_webdriver_url(),
            headless: default_headless(),
            window_size: default_window_size(),
        }
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_window_size() -> String {
    "1920,1080".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecuritySettings {
    #[serde(default = "default_sensitive_fields")]
    pub sensitive_fields: Vec<String>,
}

impl SecuritySettings {
    pub fn is_sensitive(&self, field: &str) -> bool {
        let field = field.to_lowercase();
        self.sensitive_fields
            .iter()
            .any(|s| field.contains(&s.to_lowercase()))
    }
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            sensitive_fields: default_sensitive_fields(),
        }
    }
}

fn default_sensitive_fields() -> Vec<String> {
    vec!["password".to_string(), "pass".to_string()]
}
