use super::cart::CartPage;
use super::create_account::CreateAccountPage;
use super::error::StepError;
use super::locators::header as loc;
use super::product_list::ProductListPage;
use super::sign_in::SignInPage;
use crate::condition::Condition;
use crate::driver::Driver;
use crate::harness::Harness;
use crate::tracker::CounterSignals;
use crate::wait::WaitOutcome;
use tracing::info;

/// The header shared by every storefront page.
pub struct Header<'a, D: Driver> {
    h: &'a Harness<D>,
}

impl<'a, D: Driver> Header<'a, D> {
    pub fn new(h: &'a Harness<D>) -> Self {
        Self { h }
    }

    pub async fn open_sign_in(&self) -> Result<SignInPage<'a, D>, StepError> {
        self.h.click(&loc::sign_in_link()).await?;
        SignInPage::enter(self.h).await
    }

    pub async fn open_create_account(&self) -> Result<CreateAccountPage<'a, D>, StepError> {
        self.h.click(&loc::create_account_link()).await?;
        CreateAccountPage::enter(self.h).await
    }

    pub async fn search(&self, term: &str) -> Result<ProductListPage<'a, D>, StepError> {
        info!("Searching for '{}'", term);
        self.h.type_into(&loc::search_input(), term).await?;
        // The autocomplete dropdown can cover the button while it opens.
        self.h.waiter.settle().await;
        self.h.click(&loc::search_button()).await?;
        ProductListPage::enter(self.h).await
    }

    pub async fn open_cart(&self) -> Result<CartPage<'a, D>, StepError> {
        CartPage::open(self.h).await
    }

    pub fn counter(&self) -> CounterSignals {
        CounterSignals {
            number: loc::cart_counter(),
            empty_marker: loc::cart_empty_marker(),
        }
    }

    /// Number shown on the cart badge, `0` when it shows nothing.
    pub async fn cart_count(&self) -> Result<u32, StepError> {
        let empty = Condition::present(loc::cart_empty_marker());
        if self.h.evaluator().evaluate(&self.h.driver, &empty).await? {
            return Ok(0);
        }
        Ok(self.h.reader.count(&self.h.driver, &loc::cart_counter()).await?)
    }

    /// True once the logged-in greeting is shown. Its absence within the
    /// optional deadline is reported as `false`, not as proof of logout.
    pub async fn is_logged_in(&self) -> Result<bool, StepError> {
        let greeting = Condition::visible(loc::greeting());
        let outcome = self.h.waiter.until_optional(&self.h.driver, &greeting).await?;
        Ok(outcome == WaitOutcome::Met)
    }

    pub async fn welcome_message(&self) -> Result<String, StepError> {
        Ok(self
            .h
            .reader
            .optional_text(&self.h.driver, &loc::greeting())
            .await?)
    }
}
