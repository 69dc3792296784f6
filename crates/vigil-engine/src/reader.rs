//! Value readers with documented fallbacks.
//!
//! A value that is absent (element missing, detached, never visible) yields
//! the fallback: `""` for text, `0.0` for prices, `0` for counts, `None` for
//! attributes. Only unexpected driver failures are errors.

use crate::condition::Condition;
use crate::driver::{Driver, DriverError};
use crate::wait::{Deadline, WaitOutcome, Waiter};
use tracing::debug;
use vigil_common::Locator;
use vigil_common::parse::{parse_count, parse_price};

#[derive(Debug, Clone)]
pub struct Reader {
    waiter: Waiter,
}

impl Reader {
    pub fn new(waiter: Waiter) -> Self {
        Self { waiter }
    }

    /// Text of the first visible match, waiting up to the default deadline.
    pub async fn text<D: Driver>(
        &self,
        driver: &D,
        locator: &Locator,
    ) -> Result<String, DriverError> {
        self.text_before(driver, locator, self.waiter.default_deadline())
            .await
    }

    /// Text of an element that may legitimately never appear.
    pub async fn optional_text<D: Driver>(
        &self,
        driver: &D,
        locator: &Locator,
    ) -> Result<String, DriverError> {
        self.text_before(driver, locator, self.waiter.optional_deadline())
            .await
    }

    pub async fn text_before<D: Driver>(
        &self,
        driver: &D,
        locator: &Locator,
        deadline: Deadline,
    ) -> Result<String, DriverError> {
        let visible = Condition::visible(locator.clone());
        match self
            .waiter
            .await_condition(driver, &visible, deadline)
            .await
            .map_err(|e| e.into_driver_error())?
        {
            WaitOutcome::Met => {}
            WaitOutcome::TimedOut => {
                debug!("{} never became visible, reading as empty", locator);
                return Ok(String::new());
            }
        }
        let element = match driver.find_element(locator).await {
            Ok(e) => e,
            Err(e) if e.is_absence() => return Ok(String::new()),
            Err(e) => return Err(e),
        };
        self.element_text(driver, &element).await
    }

    /// Trimmed text of an already resolved element.
    pub async fn element_text<D: Driver>(
        &self,
        driver: &D,
        element: &D::Element,
    ) -> Result<String, DriverError> {
        match driver.text(element).await {
            Ok(t) => Ok(t.trim().to_string()),
            Err(e) if e.is_absence() => Ok(String::new()),
            Err(e) => Err(e),
        }
    }

    /// Text of the first match below `parent`, without waiting.
    pub async fn text_within<D: Driver>(
        &self,
        driver: &D,
        parent: &D::Element,
        locator: &Locator,
    ) -> Result<String, DriverError> {
        match driver.find_within(parent, locator).await {
            Ok(element) => self.element_text(driver, &element).await,
            Err(e) if e.is_absence() => Ok(String::new()),
            Err(e) => Err(e),
        }
    }

    pub async fn price<D: Driver>(
        &self,
        driver: &D,
        locator: &Locator,
    ) -> Result<f64, DriverError> {
        Ok(parse_price(&self.text(driver, locator).await?))
    }

    pub async fn count<D: Driver>(
        &self,
        driver: &D,
        locator: &Locator,
    ) -> Result<u32, DriverError> {
        let text = self.optional_text(driver, locator).await?;
        Ok(parse_count(&text).unwrap_or(0))
    }

    /// Attribute of the first match, without waiting.
    pub async fn attribute<D: Driver>(
        &self,
        driver: &D,
        locator: &Locator,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        let element = match driver.find_element(locator).await {
            Ok(e) => e,
            Err(e) if e.is_absence() => return Ok(None),
            Err(e) => return Err(e),
        };
        self.element_attribute(driver, &element, name).await
    }

    pub async fn element_attribute<D: Driver>(
        &self,
        driver: &D,
        element: &D::Element,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        match driver.attribute(element, name).await {
            Ok(v) => Ok(v),
            Err(e) if e.is_absence() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
