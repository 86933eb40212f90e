mod amount;
mod ledger;
mod product;
mod query;
mod stock;
mod transaction;

pub use self::{
    ledger::{Ledger, LedgerError},
    product::Product,
    stock::{Stock, StockError},
    transaction::{ParseStatusError, Transaction, TransactionId, TransactionStatus},
};
