// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CoreError, LotStore};
use std::collections::BTreeMap;
use time::macros::{date, datetime};
use time::{Date, OffsetDateTime};
use veilingklok_domain::{
    Account, AccountId, AccountRole, Location, Money, Product, ProductId, ProductStatus, Sale,
    StatusTransition,
};

pub const BUYER_ID: AccountId = 1;
pub const SUPPLIER_ID: AccountId = 2;

pub const TODAY: Date = date!(2026 - 03 - 02);
pub const TOMORROW: Date = date!(2026 - 03 - 03);

pub fn now() -> OffsetDateTime {
    datetime!(2026-03-02 06:00:00 UTC)
}

/// In-memory `LotStore` with the same conditional-write semantics as the
/// SQLite store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub products: BTreeMap<ProductId, Product>,
    pub accounts: BTreeMap<AccountId, Account>,
    pub history: Vec<StatusTransition>,
}

impl MemoryStore {
    pub fn with_accounts() -> Self {
        let mut store: Self = Self::default();
        store.accounts.insert(
            BUYER_ID,
            Account {
                account_id: BUYER_ID,
                name: String::from("Bloemenhandel Jansen"),
                role: AccountRole::Buyer,
            },
        );
        store.accounts.insert(
            SUPPLIER_ID,
            Account {
                account_id: SUPPLIER_ID,
                name: String::from("Kwekerij de Vries"),
                role: AccountRole::Supplier,
            },
        );
        store
    }

    pub fn add(
        &mut self,
        product_id: ProductId,
        location: Location,
        status: ProductStatus,
        scheduled_date: Option<Date>,
    ) {
        self.products.insert(
            product_id,
            Product {
                product_id,
                name: format!("Tulpen partij {product_id}"),
                description: String::from("Rode tulpen, 50 stelen per bos"),
                quantity: 40,
                minimum_price: Money::from_cents(500).unwrap(),
                starting_price: Money::from_cents(1500).unwrap(),
                sale_price: None,
                location,
                scheduled_date,
                status,
                supplier_id: SUPPLIER_ID,
                buyer_id: None,
                created_at: String::from("2026-03-01 12:00:00.000000"),
            },
        );
    }

    pub fn status_of(&self, product_id: ProductId) -> ProductStatus {
        self.products[&product_id].status
    }

    pub fn active_at(&self, location: Location) -> Vec<ProductId> {
        self.products
            .values()
            .filter(|p| p.location == location && p.status == ProductStatus::Active)
            .map(|p| p.product_id)
            .collect()
    }

    fn select(&self, filter: impl Fn(&Product) -> bool) -> Vec<Product> {
        self.products.values().filter(|p| filter(p)).cloned().collect()
    }
}

impl LotStore for MemoryStore {
    fn find_product(&mut self, product_id: ProductId) -> Result<Option<Product>, CoreError> {
        Ok(self.products.get(&product_id).cloned())
    }

    fn find_account(&mut self, account_id: AccountId) -> Result<Option<Account>, CoreError> {
        Ok(self.accounts.get(&account_id).cloned())
    }

    fn products_at(
        &mut self,
        location: Location,
        status: ProductStatus,
    ) -> Result<Vec<Product>, CoreError> {
        Ok(self.select(|p| p.location == location && p.status == status))
    }

    fn products_due_at(
        &mut self,
        location: Location,
        status: ProductStatus,
        date: Date,
    ) -> Result<Vec<Product>, CoreError> {
        Ok(self.select(|p| {
            p.location == location
                && p.status == status
                && p.scheduled_date.is_some_and(|d| d <= date)
        }))
    }

    fn products_with_status(&mut self, status: ProductStatus) -> Result<Vec<Product>, CoreError> {
        Ok(self.select(|p| p.status == status))
    }

    fn products_with_status_on(
        &mut self,
        status: ProductStatus,
        date: Date,
    ) -> Result<Vec<Product>, CoreError> {
        Ok(self.select(|p| p.status == status && p.scheduled_date == Some(date)))
    }

    fn any_with_status(&mut self, status: ProductStatus) -> Result<bool, CoreError> {
        Ok(self.products.values().any(|p| p.status == status))
    }

    fn compare_and_set_status(
        &mut self,
        product_id: ProductId,
        expected: ProductStatus,
        new: ProductStatus,
    ) -> Result<bool, CoreError> {
        if new == ProductStatus::Active {
            let location: Option<Location> = self.products.get(&product_id).map(|p| p.location);
            if let Some(location) = location
                && self
                    .active_at(location)
                    .iter()
                    .any(|id| *id != product_id)
            {
                return Err(CoreError::conflict("location already has an active lot"));
            }
        }
        match self.products.get_mut(&product_id) {
            Some(product) if product.status == expected => {
                product.status = new;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn schedule(
        &mut self,
        product_id: ProductId,
        date: Date,
        location: Location,
    ) -> Result<bool, CoreError> {
        match self.products.get_mut(&product_id) {
            Some(product) if product.status == ProductStatus::Registered => {
                product.status = ProductStatus::Scheduled;
                product.scheduled_date = Some(date);
                product.location = location;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn record_sale(&mut self, product_id: ProductId, sale: Sale) -> Result<bool, CoreError> {
        match self.products.get_mut(&product_id) {
            Some(product) if product.status == ProductStatus::Active => {
                product.status = ProductStatus::Sold;
                product.buyer_id = Some(sale.buyer_id);
                product.sale_price = Some(sale.sale_price);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn record_transition(&mut self, transition: &StatusTransition) -> Result<(), CoreError> {
        self.history.push(transition.clone());
        Ok(())
    }
}

/// A store where another writer changes `contended` between the engine's
/// read and its conditional write.
pub struct RacingStore {
    pub inner: MemoryStore,
    pub contended: ProductId,
    pub interloper_status: ProductStatus,
}

impl LotStore for RacingStore {
    fn find_product(&mut self, product_id: ProductId) -> Result<Option<Product>, CoreError> {
        self.inner.find_product(product_id)
    }

    fn find_account(&mut self, account_id: AccountId) -> Result<Option<Account>, CoreError> {
        self.inner.find_account(account_id)
    }

    fn products_at(
        &mut self,
        location: Location,
        status: ProductStatus,
    ) -> Result<Vec<Product>, CoreError> {
        self.inner.products_at(location, status)
    }

    fn products_due_at(
        &mut self,
        location: Location,
        status: ProductStatus,
        date: Date,
    ) -> Result<Vec<Product>, CoreError> {
        self.inner.products_due_at(location, status, date)
    }

    fn products_with_status(&mut self, status: ProductStatus) -> Result<Vec<Product>, CoreError> {
        self.inner.products_with_status(status)
    }

    fn products_with_status_on(
        &mut self,
        status: ProductStatus,
        date: Date,
    ) -> Result<Vec<Product>, CoreError> {
        self.inner.products_with_status_on(status, date)
    }

    fn any_with_status(&mut self, status: ProductStatus) -> Result<bool, CoreError> {
        self.inner.any_with_status(status)
    }

    fn compare_and_set_status(
        &mut self,
        product_id: ProductId,
        expected: ProductStatus,
        new: ProductStatus,
    ) -> Result<bool, CoreError> {
        if product_id == self.contended
            && let Some(product) = self.inner.products.get_mut(&product_id)
        {
            product.status = self.interloper_status;
        }
        self.inner.compare_and_set_status(product_id, expected, new)
    }

    fn schedule(
        &mut self,
        product_id: ProductId,
        date: Date,
        location: Location,
    ) -> Result<bool, CoreError> {
        self.inner.schedule(product_id, date, location)
    }

    fn record_sale(&mut self, product_id: ProductId, sale: Sale) -> Result<bool, CoreError> {
        if product_id == self.contended
            && let Some(product) = self.inner.products.get_mut(&product_id)
        {
            product.status = self.interloper_status;
        }
        self.inner.record_sale(product_id, sale)
    }

    fn record_transition(&mut self, transition: &StatusTransition) -> Result<(), CoreError> {
        self.inner.record_transition(transition)
    }
}
