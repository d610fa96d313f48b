//! In-memory product store.
//!
//! # Thread Safety
//!
//! [`ProductStore`] is a cheaply clonable handle around a single shared
//! `RwLock<Vec<Product>>`. Every operation takes the lock once and either
//! applies completely or leaves the collection untouched, so concurrent
//! handlers never observe a half-applied change.
//!
//! A poisoned lock is recovered rather than propagated: no operation mutates
//! the collection before it has everything it needs, so a panic while holding
//! the lock cannot leave partial state behind.
//!
//! # Identifiers
//!
//! Identifier generation is delegated to an [`IdGenerator`]. The default
//! [`UuidGenerator`] produces random UUIDv4 strings; tests inject
//! deterministic generators.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Product, ProductFields};

/// How many times `create` asks for a new identifier after a collision.
const MAX_ID_ATTEMPTS: usize = 8;

/// Source of opaque product identifiers.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random UUIDv4 identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Monotonic identifiers with a fixed prefix (`prefix-1`, `prefix-2`, ...).
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.prefix)
    }
}

/// Shared, ordered, in-memory collection of products.
#[derive(Clone)]
pub struct ProductStore {
    products: Arc<RwLock<Vec<Product>>>,
    ids: Arc<dyn IdGenerator>,
}

impl Default for ProductStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProductStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductStore")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl ProductStore {
    /// Create an empty store that issues UUIDv4 identifiers.
    pub fn new() -> Self {
        Self::with_id_generator(UuidGenerator)
    }

    /// Create an empty store with a custom identifier source.
    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        Self {
            products: Arc::new(RwLock::new(Vec::new())),
            ids: Arc::new(ids),
        }
    }

    /// Create a store pre-populated with demo products.
    ///
    /// | name         | category    | price |
    /// |--------------|-------------|-------|
    /// | Laptop       | electronics | 1200  |
    /// | Smartphone   | electronics | 800   |
    /// | Coffee Maker | kitchen     | 50    |
    pub fn with_sample_data() -> AppResult<Self> {
        let store = Self::new();
        for fields in sample_products() {
            store.create(fields)?;
        }
        Ok(store)
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Product>> {
        self.products.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Product>> {
        self.products.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of every product in insertion order.
    pub fn list(&self) -> Vec<Product> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Look up a product by identifier.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no product has this identifier.
    pub fn get(&self, id: &str) -> AppResult<Product> {
        self.read()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| product_not_found(id))
    }

    /// Append a new product with a freshly generated identifier.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the identifier source keeps producing
    /// identifiers that are already in use.
    pub fn create(&self, fields: ProductFields) -> AppResult<Product> {
        let mut products = self.write();

        let id = (0..MAX_ID_ATTEMPTS)
            .map(|_| self.ids.next_id())
            .find(|candidate| {
                let taken = candidate.is_empty() || products.iter().any(|p| &p.id == candidate);
                if taken {
                    warn!(id = %candidate, "Generated product id is unusable, retrying");
                }
                !taken
            })
            .ok_or_else(|| {
                AppError::internal(format!(
                    "Could not allocate a unique product id after {MAX_ID_ATTEMPTS} attempts"
                ))
            })?;

        let product = Product::from_fields(id, fields);
        products.push(product.clone());
        debug!(id = %product.id, "Product created");

        Ok(product)
    }

    /// Overwrite every field of an existing product except its identifier.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no product has this identifier.
    pub fn replace(&self, id: &str, fields: ProductFields) -> AppResult<Product> {
        let mut products = self.write();

        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| product_not_found(id))?;
        product.replace_fields(fields);
        debug!(id, "Product replaced");

        Ok(product.clone())
    }

    /// Remove a product and return it.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no product has this identifier.
    pub fn remove(&self, id: &str) -> AppResult<Product> {
        let mut products = self.write();

        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| product_not_found(id))?;
        let removed = products.remove(index);
        debug!(id, "Product removed");

        Ok(removed)
    }
}

#[track_caller]
fn product_not_found(id: &str) -> AppError {
    AppError::not_found(format!("Product with id '{id}' not found"))
}

fn sample_products() -> Vec<ProductFields> {
    vec![
        ProductFields::new(
            "Laptop",
            "High-performance laptop with 16GB RAM",
            1200.0,
            "electronics",
            true,
        ),
        ProductFields::new(
            "Smartphone",
            "Latest model smartphone with OLED display",
            800.0,
            "electronics",
            true,
        ),
        ProductFields::new(
            "Coffee Maker",
            "Drip coffee maker with programmable timer",
            50.0,
            "kitchen",
            false,
        ),
    ]
}
