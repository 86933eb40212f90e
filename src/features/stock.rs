use super::product::Product;
use super::query::{descending_by, Pipeline};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StockError {
    #[error("Product not found - label {0}")]
    ProductNotFound(String),

    #[error("Index {index} is out of bounds for a stock of {count} products")]
    IndexOutOfBounds { index: usize, count: usize },

    #[error("Cannot take {requested} products, only {available} in stock")]
    CountExceedsStock { requested: usize, available: usize },
}

type StockResult<T> = Result<T, StockError>;

/// Products in the order they were added. Labels are expected to be unique but are not checked.
#[derive(Debug, Default, Clone)]
pub struct Stock {
    products: Vec<Product>,
}

impl Stock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.products.len()
    }

    pub fn contains(&self, product: &Product) -> bool {
        self.products.contains(product)
    }

    pub fn add(&mut self, product: Product) {
        debug!("adding product {}", product.label());
        self.products.push(product);
    }

    pub fn change_quantity(&mut self, label: &str, quantity: i32) -> StockResult<()> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.label() == label)
            .ok_or_else(|| StockError::ProductNotFound(label.to_owned()))?;

        debug!("product {label}: quantity {} -> {quantity}", product.quantity());
        product.set_quantity(quantity);
        Ok(())
    }

    pub fn find(&self, index: usize) -> StockResult<&Product> {
        self.products
            .get(index)
            .ok_or(StockError::IndexOutOfBounds {
                index,
                count: self.count(),
            })
    }

    pub fn find_by_label(&self, label: &str) -> StockResult<&Product> {
        self.products
            .iter()
            .find(|p| p.label() == label)
            .ok_or_else(|| StockError::ProductNotFound(label.to_owned()))
    }

    /// The first `count` products by label. Asking for more than are stocked yields nothing.
    ///
    /// Labels compare by Unicode scalar value. This matches UTF-16 code unit order except
    /// for characters above U+FFFF, which order after U+E000..=U+FFFF here.
    pub fn first_by_alphabetical_order(&self, count: usize) -> Vec<Product> {
        if count > self.count() {
            trace!("first_by_alphabetical_order({count}): only {} in stock", self.count());
            return Vec::new();
        }

        Pipeline::over(&self.products)
            .sort_by(|a, b| a.label().cmp(b.label()))
            .limit(count)
            .collect()
    }

    /// Products with `lo < price <= hi`, most expensive first.
    pub fn all_in_price_range(&self, lo: f64, hi: f64) -> Vec<Product> {
        Pipeline::over(&self.products)
            .filter(|p| lo < p.price() && p.price() <= hi)
            .sort_by(descending_by(Product::price))
            .collect()
    }

    /// Products strictly above `price`, in insertion order.
    pub fn all_by_price_above(&self, price: f64) -> Vec<Product> {
        Pipeline::over(&self.products)
            .filter(|p| p.price() > price)
            .collect()
    }

    /// The `count` most expensive products. Unlike [`Stock::first_by_alphabetical_order`],
    /// asking for more than are stocked is an error.
    pub fn first_most_expensive(&self, count: usize) -> StockResult<Vec<Product>> {
        if count > self.count() {
            return Err(StockError::CountExceedsStock {
                requested: count,
                available: self.count(),
            });
        }

        Ok(Pipeline::over(&self.products)
            .sort_by(descending_by(Product::price))
            .limit(count)
            .collect())
    }

    pub fn all_by_quantity(&self, quantity: i32) -> Vec<Product> {
        Pipeline::over(&self.products)
            .filter(|p| p.quantity() == quantity)
            .collect()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }
}

impl<'a> IntoIterator for &'a Stock {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Product> for Stock {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        let mut stock = Stock::new();
        stock.extend(iter);
        stock
    }
}

impl Extend<Product> for Stock {
    fn extend<I: IntoIterator<Item = Product>>(&mut self, iter: I) {
        for product in iter {
            self.add(product);
        }
    }
}
