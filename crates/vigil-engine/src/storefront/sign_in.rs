use super::account::AccountPage;
use super::error::StepError;
use super::identities;
use super::locators::sign_in as loc;
use crate::driver::Driver;
use crate::harness::Harness;
use crate::page::VerifiedPage;

pub struct SignInPage<'a, D: Driver> {
    h: &'a Harness<D>,
    page: VerifiedPage,
}

impl<'a, D: Driver> SignInPage<'a, D> {
    pub async fn enter(h: &'a Harness<D>) -> Result<Self, StepError> {
        let page = h.enter(&identities::sign_in()).await?;
        Ok(Self { h, page })
    }

    pub fn page(&self) -> &VerifiedPage {
        &self.page
    }

    pub async fn submit_credentials(&self, email: &str, password: &str) -> Result<(), StepError> {
        self.h.type_into(&loc::email(), email).await?;
        self.h.type_into(&loc::password(), password).await?;
        self.h.click(&loc::submit()).await?;
        Ok(())
    }

    /// Log in and land on the account dashboard. Rejected credentials surface
    /// as a redirect back to this page carrying the storefront's message.
    pub async fn log_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountPage<'a, D>, StepError> {
        self.submit_credentials(email, password).await?;
        AccountPage::enter(self.h, identities::sign_in()).await
    }
}
