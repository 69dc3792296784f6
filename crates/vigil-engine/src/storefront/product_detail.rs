use super::error::StepError;
use super::identities;
use super::locators::{common, product_detail as loc};
use crate::condition::Condition;
use crate::driver::Driver;
use crate::harness::Harness;
use crate::page::VerifiedPage;
use crate::wait::WaitOutcome;
use tracing::{debug, info, warn};
use vigil_common::{ActionOutcome, BusinessError, Locator};

pub struct ProductDetailPage<'a, D: Driver> {
    h: &'a Harness<D>,
    page: VerifiedPage,
}

impl<'a, D: Driver> ProductDetailPage<'a, D> {
    pub async fn enter(h: &'a Harness<D>) -> Result<Self, StepError> {
        let page = h.enter(&identities::product_detail()).await?;
        Ok(Self { h, page })
    }

    pub fn page(&self) -> &VerifiedPage {
        &self.page
    }

    pub async fn name(&self) -> Result<String, StepError> {
        Ok(self.h.reader.text(&self.h.driver, &loc::title()).await?)
    }

    pub async fn price(&self) -> Result<f64, StepError> {
        Ok(self.h.reader.price(&self.h.driver, &loc::price()).await?)
    }

    /// Pick the first size swatch, if the product has sizes.
    pub async fn choose_first_size(&self) -> Result<bool, StepError> {
        self.choose_first(&loc::size_options()).await
    }

    pub async fn choose_first_color(&self) -> Result<bool, StepError> {
        self.choose_first(&loc::color_options()).await
    }

    async fn choose_first(&self, options: &Locator) -> Result<bool, StepError> {
        let driver = &self.h.driver;
        let swatches = match driver.find_elements(options).await {
            Ok(s) => s,
            Err(e) if e.is_absence() => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        for swatch in &swatches {
            match driver.is_visible(swatch).await {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) if e.is_absence() => continue,
                Err(e) => return Err(e.into()),
            }
            let Some(option_id) = self
                .h
                .reader
                .element_attribute(driver, swatch, "option-id")
                .await?
            else {
                continue;
            };
            let target = loc::option(options, &option_id);
            self.h.click(&target).await?;

            let selected = Condition::attribute_contains(target.clone(), "class", "selected");
            if self.h.waiter.until_optional(driver, &selected).await? == WaitOutcome::TimedOut {
                warn!("{} never showed as selected", target);
            }
            info!("Chose option {}", target);
            return Ok(true);
        }
        debug!("No selectable option for {}", options);
        Ok(false)
    }

    /// Click "Add to Cart" and report the raw outcome; the caller decides
    /// what a failure means for its bookkeeping.
    pub async fn add_to_cart(&self) -> ActionOutcome {
        self.h.try_click(&loc::add_to_cart()).await
    }

    pub async fn business_error(&self) -> Result<Option<BusinessError>, StepError> {
        Ok(self
            .h
            .business_error(&[common::error_banner(), common::error_message()])
            .await?)
    }

    pub async fn success_message(&self) -> Result<String, StepError> {
        Ok(self
            .h
            .reader
            .optional_text(&self.h.driver, &common::success_banner())
            .await?)
    }
}
