use super::error::StepError;
use super::identities;
use super::locators::cart as loc;
use crate::condition::Condition;
use crate::driver::Driver;
use crate::harness::Harness;
use crate::page::VerifiedPage;
use crate::tracker::{CartSnapshot, ObservedItem};
use tracing::{debug, warn};
use vigil_common::parse::{parse_count, parse_price};

pub const CART_PATH: &str = "checkout/cart/";

pub struct CartPage<'a, D: Driver> {
    h: &'a Harness<D>,
    page: VerifiedPage,
}

impl<'a, D: Driver> CartPage<'a, D> {
    pub async fn open(h: &'a Harness<D>) -> Result<Self, StepError> {
        h.open(CART_PATH).await?;
        Self::enter(h).await
    }

    pub async fn enter(h: &'a Harness<D>) -> Result<Self, StepError> {
        let page = h.enter(&identities::shopping_cart()).await?;
        Ok(Self { h, page })
    }

    pub fn page(&self) -> &VerifiedPage {
        &self.page
    }

    pub async fn is_empty(&self) -> Result<bool, StepError> {
        let empty = Condition::visible(loc::empty());
        Ok(self.h.evaluator().evaluate(&self.h.driver, &empty).await?)
    }

    /// Everything the cart page renders, read in one pass.
    pub async fn snapshot(&self) -> Result<CartSnapshot, StepError> {
        if self.is_empty().await? {
            debug!("Cart is empty");
            return Ok(CartSnapshot::default());
        }

        let driver = &self.h.driver;
        let reader = &self.h.reader;
        let rows = match driver.find_elements(&loc::rows()).await {
            Ok(rows) => rows,
            Err(e) if e.is_absence() => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let mut observed = Vec::with_capacity(rows.len());
        for row in &rows {
            let name = reader.text_within(driver, row, &loc::row_name()).await?;
            if name.is_empty() {
                warn!("Skipping cart row without a product name");
                continue;
            }
            let price_text = reader.text_within(driver, row, &loc::row_price()).await?;
            let unit_price = parse_price(&price_text);
            let quantity = match driver.find_within(row, &loc::row_quantity()).await {
                Ok(input) => reader
                    .element_attribute(driver, &input, "value")
                    .await?
                    .and_then(|v| parse_count(&v))
                    .unwrap_or(0),
                Err(e) if e.is_absence() => 0,
                Err(e) => return Err(e.into()),
            };
            let subtotal =
                parse_price(&reader.text_within(driver, row, &loc::row_subtotal()).await?);
            debug!(
                "Cart row '{}': {} x {:.2} = {:.2}",
                name, quantity, unit_price, subtotal
            );
            observed.push(ObservedItem {
                name,
                unit_price,
                quantity,
                subtotal,
            });
        }

        // Totals are rendered after the rows.
        let grand_total = self.h.reader.price(driver, &loc::grand_total()).await?;
        Ok(CartSnapshot {
            rows: observed,
            grand_total,
        })
    }
}
