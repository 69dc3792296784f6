use fantoccini::{Client, ClientBuilder};
use serde_json::{Map, Value, json};
use tracing::info;
use vigil_common::DriverError;
use vigil_common::config::WebDriverSettings;

pub struct WebDriverClient {
    pub client: Client,
}

impl WebDriverClient {
    pub async fn connect(
        url: &str,
        capabilities: Option<Map<String, Value>>,
    ) -> Result<Self, DriverError> {
        let mut caps = Map::new();
        if let Some(user_caps) = capabilities {
            for (k, v) in user_caps {
                caps.insert(k, v);
            }
        }

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(url)
            .await
            .map_err(|e| {
                DriverError::Other(format!("Failed to connect to WebDriver at {}: {}", url, e))
            })?;

        info!("Connected to WebDriver at {}", url);
        Ok(Self { client })
    }

    /// Connect using the configured endpoint and browser options.
    pub async fn from_settings(settings: &WebDriverSettings) -> Result<Self, DriverError> {
        Self::connect(&settings.url, Some(chrome_capabilities(settings))).await
    }
}

/// Chrome capabilities for the configured window and headless mode.
pub fn chrome_capabilities(settings: &WebDriverSettings) -> Map<String, Value> {
    let mut args = vec![
        format!("--window-size={}", settings.window_size),
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-gpu".to_string(),
    ];
    if settings.headless {
        args.insert(0, "--headless=new".to_string());
    }

    let mut caps = Map::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}
