//! In-memory transaction ledger and product stock with filter, sort and range queries.

#[macro_use]
extern crate log;

pub mod features;

pub use features::{
    Ledger, LedgerError, ParseStatusError, Product, Stock, StockError, Transaction,
    TransactionId, TransactionStatus,
};
