use super::error::StepError;
use super::identities;
use super::locators::product_list as loc;
use super::product_detail::ProductDetailPage;
use crate::condition::Condition;
use crate::driver::Driver;
use crate::harness::Harness;
use crate::page::VerifiedPage;
use crate::wait::WaitOutcome;
use tracing::{debug, info, warn};
use vigil_common::parse::parse_price;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One product tile as rendered in the list.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductTile {
    pub name: String,
    /// `None` when the tile shows no parseable price.
    pub price: Option<f64>,
}

/// A category listing or search result page.
///
/// Keeps handles to the items it last saw so that after a sort it can wait
/// for those exact handles to detach before reading the new list.
pub struct ProductListPage<'a, D: Driver> {
    h: &'a Harness<D>,
    page: VerifiedPage,
    items: Vec<D::Element>,
}

impl<'a, D: Driver> ProductListPage<'a, D> {
    pub async fn enter(h: &'a Harness<D>) -> Result<Self, StepError> {
        let page = h.enter(&identities::product_list()).await?;
        let mut list = Self {
            h,
            page,
            items: Vec::new(),
        };
        list.capture_items().await?;
        Ok(list)
    }

    pub fn page(&self) -> &VerifiedPage {
        &self.page
    }

    /// Wait (optionally) for the list to populate and remember its items.
    async fn capture_items(&mut self) -> Result<(), StepError> {
        let populated = Condition::at_least(loc::items(), 1);
        let outcome = self.h.waiter.until_optional(&self.h.driver, &populated).await?;
        if outcome == WaitOutcome::TimedOut {
            debug!("Product list is empty");
        }
        self.items = match self.h.driver.find_elements(&loc::items()).await {
            Ok(items) => items,
            Err(e) if e.is_absence() => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Product list shows {} item(s)", self.items.len());
        Ok(())
    }

    /// After an action that re-renders the list: wait for the old first item
    /// to detach, then for the new list to populate.
    async fn await_reload(&mut self) -> Result<(), StepError> {
        if let Some(first) = self.items.first() {
            let deadline = self.h.waiter.optional_deadline();
            match self.h.waiter.until_stale(&self.h.driver, first, deadline).await? {
                WaitOutcome::Met => debug!("Previous product list detached"),
                WaitOutcome::TimedOut => warn!("Product list did not re-render, reading it as is"),
            }
        }
        self.capture_items().await
    }

    pub async fn sort_by(&mut self, option: &str) -> Result<(), StepError> {
        info!("Sorting by {}", option);
        self.h.select(&loc::sorter(), option).await?;
        self.await_reload().await
    }

    pub async fn is_ascending(&self) -> Result<bool, StepError> {
        let class = self
            .h
            .reader
            .attribute(&self.h.driver, &loc::direction_switch(), "class")
            .await?
            .unwrap_or_default();
        Ok(class.contains("sort-asc"))
    }

    pub async fn set_direction(&mut self, direction: SortDirection) -> Result<(), StepError> {
        let ascending = self.is_ascending().await?;
        if ascending == (direction == SortDirection::Ascending) {
            debug!("Sort direction already {:?}", direction);
            return Ok(());
        }
        info!("Switching sort direction to {:?}", direction);
        self.h.click(&loc::direction_switch()).await?;
        self.await_reload().await
    }

    pub async fn sort(&mut self, option: &str, direction: SortDirection) -> Result<(), StepError> {
        self.sort_by(option).await?;
        self.set_direction(direction).await
    }

    /// Tiles of the current list, in display order. Tiles that detach while
    /// being read are skipped.
    pub async fn products(&self) -> Result<Vec<ProductTile>, StepError> {
        let reader = &self.h.reader;
        let driver = &self.h.driver;
        let items = match driver.find_elements(&loc::items()).await {
            Ok(items) => items,
            Err(e) if e.is_absence() => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        let mut tiles = Vec::with_capacity(items.len());
        for item in &items {
            let info = match driver.find_within(item, &loc::item_info()).await {
                Ok(info) => info,
                Err(e) if e.is_absence() => item.clone(),
                Err(e) => return Err(e.into()),
            };
            let name = reader.text_within(driver, &info, &loc::item_name()).await?;
            if name.is_empty() {
                warn!("Skipping product tile without a name");
                continue;
            }
            let price_text = reader.text_within(driver, &info, &loc::item_price()).await?;
            let price = if price_text.is_empty() {
                None
            } else {
                Some(parse_price(&price_text))
            };
            tiles.push(ProductTile { name, price });
        }
        Ok(tiles)
    }

    pub async fn product_names(&self) -> Result<Vec<String>, StepError> {
        Ok(self.products().await?.into_iter().map(|t| t.name).collect())
    }

    /// Price of the first listed product, `0.0` when there is none.
    pub async fn first_product_price(&self) -> Result<f64, StepError> {
        let tiles = self.products().await?;
        let price = tiles.first().and_then(|t| t.price).unwrap_or_else(|| {
            warn!("First product shows no price");
            0.0
        });
        info!("First product price: {:.2}", price);
        Ok(price)
    }

    pub async fn find_product(&self, name: &str) -> Result<Option<ProductTile>, StepError> {
        let wanted = name.trim();
        Ok(self
            .products()
            .await?
            .into_iter()
            .find(|t| t.name.eq_ignore_ascii_case(wanted)))
    }

    pub async fn open_product(&self, name: &str) -> Result<ProductDetailPage<'a, D>, StepError> {
        info!("Opening product '{}'", name);
        self.h.click(&loc::product_link(name)).await?;
        ProductDetailPage::enter(self.h).await
    }

    pub async fn open_cheapest(&self) -> Result<ProductDetailPage<'a, D>, StepError> {
        let tile = self.extreme(|candidate, best| candidate < best).await?;
        self.open_product(&tile.name).await
    }

    pub async fn open_most_expensive(&self) -> Result<ProductDetailPage<'a, D>, StepError> {
        let tile = self.extreme(|candidate, best| candidate > best).await?;
        self.open_product(&tile.name).await
    }

    async fn extreme(&self, better: impl Fn(f64, f64) -> bool) -> Result<ProductTile, StepError> {
        let mut best: Option<(ProductTile, f64)> = None;
        for tile in self.products().await? {
            let Some(price) = tile.price else { continue };
            let replace = match &best {
                Some((_, p)) => better(price, *p),
                None => true,
            };
            if replace {
                best = Some((tile, price));
            }
        }
        best.map(|(tile, _)| tile)
            .ok_or_else(|| StepError::Assertion("no product with a price in the list".into()))
    }
}
