use super::error::StepError;
use super::identities;
use super::locators::{account as loc, common};
use crate::driver::Driver;
use crate::harness::Harness;
use crate::page::{PageIdentity, VerifiedPage};

/// The customer account dashboard.
pub struct AccountPage<'a, D: Driver> {
    h: &'a Harness<D>,
    page: VerifiedPage,
}

impl<'a, D: Driver> AccountPage<'a, D> {
    /// Verify the dashboard. `came_from` is the page a failed attempt leaves
    /// the browser on.
    pub async fn enter(h: &'a Harness<D>, came_from: PageIdentity) -> Result<Self, StepError> {
        let page = h.enter(&identities::account(came_from)).await?;
        Ok(Self { h, page })
    }

    pub fn page(&self) -> &VerifiedPage {
        &self.page
    }

    pub async fn contact_info(&self) -> Result<String, StepError> {
        Ok(self.h.reader.text(&self.h.driver, &loc::contact_info()).await?)
    }

    pub async fn success_message(&self) -> Result<String, StepError> {
        Ok(self
            .h
            .reader
            .optional_text(&self.h.driver, &common::success_banner())
            .await?)
    }
}
