use async_trait::async_trait;
pub use vigil_common::DriverError;
use vigil_common::Locator;

/// The browser capabilities the engine consumes.
///
/// Implementations translate their native failures into the fixed
/// `DriverError` signal set: `NotFound` when nothing matches a locator,
/// `Stale` when a handle is no longer attached, `Intercepted` when a click
/// landed on something else. Anything else is `Other`.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Handle to a live element. It goes stale when the page re-renders;
    /// callers re-resolve from the locator instead of reusing old handles.
    type Element: Clone + Send + Sync;

    async fn find_element(&self, locator: &Locator) -> Result<Self::Element, DriverError>;

    /// All matches, possibly none.
    async fn find_elements(&self, locator: &Locator) -> Result<Vec<Self::Element>, DriverError>;

    async fn find_within(
        &self,
        parent: &Self::Element,
        locator: &Locator,
    ) -> Result<Self::Element, DriverError>;

    async fn find_all_within(
        &self,
        parent: &Self::Element,
        locator: &Locator,
    ) -> Result<Vec<Self::Element>, DriverError>;

    async fn is_visible(&self, element: &Self::Element) -> Result<bool, DriverError>;

    async fn is_enabled(&self, element: &Self::Element) -> Result<bool, DriverError>;

    async fn text(&self, element: &Self::Element) -> Result<String, DriverError>;

    async fn attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, DriverError>;

    async fn click(&self, element: &Self::Element) -> Result<(), DriverError>;

    async fn clear(&self, element: &Self::Element) -> Result<(), DriverError>;

    async fn send_keys(&self, element: &Self::Element, text: &str) -> Result<(), DriverError>;

    async fn navigate(&self, url: &str) -> Result<(), DriverError>;

    async fn current_url(&self) -> Result<String, DriverError>;

    /// Activate the element directly, bypassing whatever covers it.
    async fn activate_fallback(&self, element: &Self::Element) -> Result<(), DriverError>;

    /// End the browser session.
    async fn quit(&self) -> Result<(), DriverError>;
}

/// Current URL for error context. Never fails.
pub async fn last_known_url<D: Driver + ?Sized>(driver: &D) -> String {
    driver
        .current_url()
        .await
        .unwrap_or_else(|_| "unknown".to_string())
}
