use crate::error_mapping::map_cmd_error;
use crate::webdriver::WebDriverClient;
use async_trait::async_trait;
use fantoccini::Client;
use fantoccini::elements::Element;
use tracing::{debug, info};
use vigil_common::{DriverError, Locator};
use vigil_engine::driver::Driver;

const FALLBACK_CLICK: &str = "arguments[0].click();";

/// A live browser session. Clones share the session.
#[derive(Clone)]
pub struct WebDriverDriver {
    client: Client,
}

impl WebDriverDriver {
    pub fn new(client: WebDriverClient) -> Self {
        Self {
            client: client.client,
        }
    }
}

fn by(locator: &Locator) -> fantoccini::Locator<'_> {
    match locator {
        Locator::Css(s) => fantoccini::Locator::Css(s),
        Locator::Id(s) => fantoccini::Locator::Id(s),
        Locator::LinkText(s) => fantoccini::Locator::LinkText(s),
        Locator::XPath(s) => fantoccini::Locator::XPath(s),
    }
}

#[async_trait]
impl Driver for WebDriverDriver {
    type Element = Element;

    async fn find_element(&self, locator: &Locator) -> Result<Element, DriverError> {
        self.client
            .find(by(locator))
            .await
            .map_err(|e| map_cmd_error(e, Some(locator)))
    }

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<Element>, DriverError> {
        self.client
            .find_all(by(locator))
            .await
            .map_err(|e| map_cmd_error(e, Some(locator)))
    }

    async fn find_within(
        &self,
        parent: &Element,
        locator: &Locator,
    ) -> Result<Element, DriverError> {
        parent
            .find(by(locator))
            .await
            .map_err(|e| map_cmd_error(e, Some(locator)))
    }

    async fn find_all_within(
        &self,
        parent: &Element,
        locator: &Locator,
    ) -> Result<Vec<Element>, DriverError> {
        parent
            .find_all(by(locator))
            .await
            .map_err(|e| map_cmd_error(e, Some(locator)))
    }

    async fn is_visible(&self, element: &Element) -> Result<bool, DriverError> {
        element
            .is_displayed()
            .await
            .map_err(|e| map_cmd_error(e, None))
    }

    async fn is_enabled(&self, element: &Element) -> Result<bool, DriverError> {
        element
            .is_enabled()
            .await
            .map_err(|e| map_cmd_error(e, None))
    }

    async fn text(&self, element: &Element) -> Result<String, DriverError> {
        element.text().await.map_err(|e| map_cmd_error(e, None))
    }

    async fn attribute(
        &self,
        element: &Element,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        element
            .attr(name)
            .await
            .map_err(|e| map_cmd_error(e, None))
    }

    async fn click(&self, element: &Element) -> Result<(), DriverError> {
        element.click().await.map_err(|e| map_cmd_error(e, None))
    }

    async fn clear(&self, element: &Element) -> Result<(), DriverError> {
        element.clear().await.map_err(|e| map_cmd_error(e, None))
    }

    async fn send_keys(&self, element: &Element, text: &str) -> Result<(), DriverError> {
        element
            .send_keys(text)
            .await
            .map_err(|e| map_cmd_error(e, None))
    }

    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        debug!("goto {}", url);
        self.client
            .goto(url)
            .await
            .map_err(|e| DriverError::Navigation(format!("{}: {}", url, e)))
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        self.client
            .current_url()
            .await
            .map(|u| u.to_string())
            .map_err(|e| map_cmd_error(e, None))
    }

    async fn activate_fallback(&self, element: &Element) -> Result<(), DriverError> {
        let arg = serde_json::to_value(element)
            .map_err(|e| DriverError::Other(format!("Cannot pass element to script: {}", e)))?;
        self.client
            .execute(FALLBACK_CLICK, vec![arg])
            .await
            .map(|_| ())
            .map_err(|e| map_cmd_error(e, None))
    }

    async fn quit(&self) -> Result<(), DriverError> {
        info!("Closing browser session");
        self.client
            .clone()
            .close()
            .await
            .map_err(|e| map_cmd_error(e, None))
    }
}
