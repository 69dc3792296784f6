use crate::condition::{Condition, ConditionError};
use crate::driver::{Driver, last_known_url};
use crate::reader::Reader;
use crate::wait::{WaitOutcome, Waiter};
use thiserror::Error;
use tracing::{info, warn};
use vigil_common::Locator;

/// What makes a page recognizable.
///
/// `signals` must all hold. `excludes` are disambiguators: if any holds once
/// the signals are met, we are on a look-alike page. `probe` is the page the
/// application typically redirects to instead (for example the login form
/// after rejected credentials).
#[derive(Debug, Clone, PartialEq)]
pub struct PageIdentity {
    pub name: String,
    pub signals: Vec<Condition>,
    pub excludes: Vec<Condition>,
    pub title: Option<Locator>,
    pub error_banner: Option<Locator>,
    pub probe: Option<Box<PageIdentity>>,
}

impl PageIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signals: Vec::new(),
            excludes: Vec::new(),
            title: None,
            error_banner: None,
            probe: None,
        }
    }

    pub fn signal(mut self, condition: Condition) -> Self {
        self.signals.push(condition);
        self
    }

    pub fn excluding(mut self, condition: Condition) -> Self {
        self.excludes.push(condition);
        self
    }

    pub fn title(mut self, locator: Locator) -> Self {
        self.title = Some(locator);
        self
    }

    pub fn error_banner(mut self, locator: Locator) -> Self {
        self.error_banner = Some(locator);
        self
    }

    pub fn probe(mut self, alternate: PageIdentity) -> Self {
        self.probe = Some(Box::new(alternate));
        self
    }
}

/// Proof that a page's identity was verified.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedPage {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavigationError {
    #[error("Expected {expected} but {conflicting} also holds (url: {url})")]
    WrongPage {
        expected: String,
        conflicting: String,
        url: String,
    },
    #[error("Expected {expected} but landed on '{actual_title}': '{error_text}' (url: {url})")]
    RedirectedTo {
        expected: String,
        actual_title: String,
        error_text: String,
        url: String,
    },
    #[error("Timed out waiting for {expected} (last url: {url})")]
    Timeout { expected: String, url: String },
    #[error("Could not verify {expected} (url: {url}): {source}")]
    Unexpected {
        expected: String,
        url: String,
        source: ConditionError,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum EntryState {
    Verifying,
    Entered(VerifiedPage),
    Failed(NavigationError),
}

/// Verifies that the browser is on the expected page before anything else
/// is done with it.
#[derive(Debug, Clone)]
pub struct PageVerifier {
    waiter: Waiter,
    reader: Reader,
}

impl PageVerifier {
    pub fn new(waiter: Waiter) -> Self {
        Self {
            reader: Reader::new(waiter.clone()),
            waiter,
        }
    }

    pub async fn enter<D: Driver>(
        &self,
        driver: &D,
        identity: &PageIdentity,
    ) -> Result<VerifiedPage, NavigationError> {
        info!("Verifying page: {}", identity.name);
        let mut state = EntryState::Verifying;
        loop {
            state = match state {
                EntryState::Verifying => self.verify(driver, identity).await,
                EntryState::Entered(page) => {
                    info!("On page {} ({})", page.name, page.url);
                    return Ok(page);
                }
                EntryState::Failed(err) => {
                    warn!("Page verification failed: {}", err);
                    return Err(err);
                }
            };
        }
    }

    async fn verify<D: Driver>(&self, driver: &D, identity: &PageIdentity) -> EntryState {
        let required = Condition::All(identity.signals.clone());
        match self.waiter.until(driver, &required).await {
            Ok(WaitOutcome::Met) => {}
            Ok(WaitOutcome::TimedOut) => {
                return EntryState::Failed(self.diagnose(driver, identity).await);
            }
            Err(source) => {
                return EntryState::Failed(NavigationError::Unexpected {
                    expected: identity.name.clone(),
                    url: last_known_url(driver).await,
                    source,
                });
            }
        }

        let evaluator = self.waiter.evaluator();
        for exclusion in &identity.excludes {
            match evaluator.evaluate(driver, exclusion).await {
                Ok(false) => {}
                Ok(true) => {
                    return EntryState::Failed(NavigationError::WrongPage {
                        expected: identity.name.clone(),
                        conflicting: exclusion.to_string(),
                        url: last_known_url(driver).await,
                    });
                }
                Err(source) => {
                    return EntryState::Failed(NavigationError::Unexpected {
                        expected: identity.name.clone(),
                        url: last_known_url(driver).await,
                        source,
                    });
                }
            }
        }

        EntryState::Entered(VerifiedPage {
            name: identity.name.clone(),
            url: last_known_url(driver).await,
        })
    }

    /// The expected page never showed up. Check whether we were sent to the
    /// usual alternate page and, if so, report what it says.
    async fn diagnose<D: Driver>(&self, driver: &D, identity: &PageIdentity) -> NavigationError {
        let url = last_known_url(driver).await;
        let Some(alternate) = identity.probe.as_deref() else {
            return NavigationError::Timeout {
                expected: identity.name.clone(),
                url,
            };
        };

        let landed = Condition::All(alternate.signals.clone());
        match self.waiter.until_optional(driver, &landed).await {
            Ok(WaitOutcome::Met) => {}
            Ok(WaitOutcome::TimedOut) => {
                return NavigationError::Timeout {
                    expected: identity.name.clone(),
                    url,
                };
            }
            Err(e) => {
                warn!("Probe for {} failed: {}", alternate.name, e);
                return NavigationError::Timeout {
                    expected: identity.name.clone(),
                    url,
                };
            }
        }

        let actual_title = match &alternate.title {
            Some(title) => self.reader.text(driver, title).await.unwrap_or_default(),
            None => String::new(),
        };
        let error_text = match &alternate.error_banner {
            Some(banner) => self
                .reader
                .optional_text(driver, banner)
                .await
                .unwrap_or_default(),
            None => String::new(),
        };

        NavigationError::RedirectedTo {
            expected: identity.name.clone(),
            actual_title: if actual_title.is_empty() {
                alternate.name.clone()
            } else {
                actual_title
            },
            error_text,
            url: last_known_url(driver).await,
        }
    }
}
