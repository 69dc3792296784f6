use super::account::AccountPage;
use super::customer::Customer;
use super::error::StepError;
use super::identities;
use super::locators::{common, create_account as loc};
use crate::business::field_validation;
use crate::driver::Driver;
use crate::harness::Harness;
use crate::page::VerifiedPage;
use vigil_common::BusinessError;

pub struct CreateAccountPage<'a, D: Driver> {
    h: &'a Harness<D>,
    page: VerifiedPage,
}

impl<'a, D: Driver> CreateAccountPage<'a, D> {
    pub async fn enter(h: &'a Harness<D>) -> Result<Self, StepError> {
        let page = h.enter(&identities::create_account()).await?;
        Ok(Self { h, page })
    }

    pub fn page(&self) -> &VerifiedPage {
        &self.page
    }

    pub async fn fill(&self, customer: &Customer) -> Result<(), StepError> {
        let fields = [
            (loc::FIRST_NAME, customer.first_name.as_str()),
            (loc::LAST_NAME, customer.last_name.as_str()),
            (loc::EMAIL, customer.email.as_str()),
            (loc::PASSWORD, customer.password.as_str()),
            (loc::CONFIRMATION, customer.password.as_str()),
        ];
        for (id, value) in fields {
            self.h.type_into(&loc::field(id), value).await?;
        }
        Ok(())
    }

    pub async fn submit(&self) -> Result<(), StepError> {
        self.h.click(&loc::submit()).await?;
        Ok(())
    }

    /// Fill, submit and land on the account dashboard. A rejected form
    /// surfaces as a redirect back to this page with the banner text.
    pub async fn register(&self, customer: &Customer) -> Result<AccountPage<'a, D>, StepError> {
        self.fill(customer).await?;
        self.submit().await?;
        AccountPage::enter(self.h, identities::create_account()).await
    }

    /// Storefront banner shown after a rejected submission, if any.
    pub async fn general_error(&self) -> Result<Option<BusinessError>, StepError> {
        Ok(self.h.business_error(&[common::error_banner()]).await?)
    }

    pub async fn field_error(&self, field: &str) -> Result<Option<BusinessError>, StepError> {
        Ok(field_validation(
            &self.h.waiter,
            &self.h.driver,
            field,
            &loc::field_error(field),
        )
        .await?)
    }
}
