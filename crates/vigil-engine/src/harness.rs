use crate::action::{ActionError, ActionExecutor, ActionKind};
use crate::business::detect_business_error;
use crate::condition::Evaluator;
use crate::driver::{Driver, DriverError};
use crate::page::{NavigationError, PageIdentity, PageVerifier, VerifiedPage};
use crate::reader::Reader;
use crate::wait::Waiter;
use tracing::info;
use vigil_common::config::VigilConfig;
use vigil_common::{ActionOutcome, BusinessError, Locator};

/// Everything a page object needs: the session plus the engine services,
/// all configured from one [`VigilConfig`].
pub struct Harness<D: Driver> {
    pub driver: D,
    pub config: VigilConfig,
    pub waiter: Waiter,
    pub actions: ActionExecutor,
    pub pages: PageVerifier,
    pub reader: Reader,
}

impl<D: Driver> Harness<D> {
    pub fn new(driver: D, config: VigilConfig) -> Self {
        let waiter = Waiter::new(config.waits.clone());
        let actions = ActionExecutor::new(
            waiter.clone(),
            &config.actions,
            config.security.clone(),
        );
        Self {
            driver,
            pages: PageVerifier::new(waiter.clone()),
            reader: Reader::new(waiter.clone()),
            actions,
            waiter,
            config,
        }
    }

    pub fn evaluator(&self) -> &Evaluator {
        self.waiter.evaluator()
    }

    pub async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        info!("Navigating to {}", url);
        self.driver.navigate(url).await
    }

    /// Navigate to a storefront-relative path.
    pub async fn open(&self, path: &str) -> Result<(), DriverError> {
        self.navigate(&self.config.storefront.url(path)).await
    }

    pub async fn enter(&self, identity: &PageIdentity) -> Result<VerifiedPage, NavigationError> {
        self.pages.enter(&self.driver, identity).await
    }

    pub async fn click(&self, target: &Locator) -> Result<(), ActionError> {
        self.actions
            .run(&self.driver, &ActionKind::Click, target)
            .await
    }

    /// Click without escalating, for callers that act on the outcome.
    pub async fn try_click(&self, target: &Locator) -> ActionOutcome {
        self.actions.click(&self.driver, target).await
    }

    pub async fn type_into(&self, target: &Locator, text: &str) -> Result<(), ActionError> {
        self.actions
            .run(&self.driver, &ActionKind::Type(text.to_string()), target)
            .await
    }

    pub async fn select(&self, target: &Locator, option: &str) -> Result<(), ActionError> {
        self.actions
            .run(&self.driver, &ActionKind::Select(option.to_string()), target)
            .await
    }

    pub async fn business_error(
        &self,
        banners: &[Locator],
    ) -> Result<Option<BusinessError>, DriverError> {
        detect_business_error(&self.waiter, &self.driver, banners).await
    }
}
