use anyhow::Context;
use chain_stock::{Ledger, Stock, TransactionId, TransactionStatus};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

const SAMPLE_TRANSACTIONS: &str = "\
id, status, sender, receiver, amount
1, failed, Stan, Aleks, 100.00
2, aborted, Stan, Aleks, 125.50
3, successful, Stan, Aleks, 125.50
4, aborted, Stan, Aleks, 115.25
5, failed, Aleks, Stan, 100.00
6, aborted, Aleks, Stan, 125.50
7, successful, Aleks, Stan, 200.00
8, successful, Aleks, Stan, 115.25
";

const SAMPLE_PRODUCTS: &str = "\
label, price, quantity
label_test_1, 100, 1
label_test_2, 200, 2
label_test_3, 300, 3
label_test_4, 355.25, 4
label_test_5, 155.45, 5
label_test_6, 299.99, 6
";

/// Load a transaction ledger or a product stock and run one query against it
#[derive(Parser, Debug)]
#[clap(author, version)]
pub(crate) struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Query transactions. Reads `id, status, sender, receiver, amount` rows
    Ledger {
        /// CSV file to load, a built-in sample chain is used when absent
        #[clap(long, short, parse(from_os_str))]
        input: Option<PathBuf>,

        #[clap(subcommand)]
        query: LedgerQuery,
    },

    /// Query products. Reads `label, price, quantity` rows
    Stock {
        /// CSV file to load, a built-in sample stock is used when absent
        #[clap(long, short, parse(from_os_str))]
        input: Option<PathBuf>,

        #[clap(subcommand)]
        query: StockQuery,
    },
}

#[derive(Subcommand, Debug)]
enum LedgerQuery {
    Count,
    /// Whether a transaction with this id exists
    Contains {
        #[clap(allow_hyphen_values = true)]
        id: i32,
    },
    Get {
        #[clap(allow_hyphen_values = true)]
        id: i32,
    },
    ByStatus { status: TransactionStatus },
    Senders { status: TransactionStatus },
    Receivers { status: TransactionStatus },
    /// Every transaction by amount, then id, both descending
    Ordered,
    BySender { sender: String },
    /// Transactions to a receiver by amount, then id, both ascending
    ByReceiver { receiver: String },
    /// Transactions with a status and an amount of at most `max`
    StatusMax {
        status: TransactionStatus,
        #[clap(allow_hyphen_values = true)]
        max: f64,
    },
    /// Transactions from a sender with an amount above `min`
    SenderMin {
        sender: String,
        #[clap(allow_hyphen_values = true)]
        min: f64,
    },
    /// Transactions to a receiver with `lo <= amount < hi`
    ReceiverRange {
        receiver: String,
        #[clap(allow_hyphen_values = true)]
        lo: f64,
        #[clap(allow_hyphen_values = true)]
        hi: f64,
    },
    /// Transactions with `lo <= amount <= hi`
    AmountRange {
        #[clap(allow_hyphen_values = true)]
        lo: f64,
        #[clap(allow_hyphen_values = true)]
        hi: f64,
    },
}

#[derive(Subcommand, Debug)]
enum StockQuery {
    Count,
    /// Product at a zero-based position
    Find { index: usize },
    FindByLabel { label: String },
    /// The first `count` products by label
    Alphabetical { count: usize },
    /// Products with `lo < price <= hi`
    PriceRange {
        #[clap(allow_hyphen_values = true)]
        lo: f64,
        #[clap(allow_hyphen_values = true)]
        hi: f64,
    },
    PriceAbove {
        #[clap(allow_hyphen_values = true)]
        price: f64,
    },
    MostExpensive { count: usize },
    ByQuantity {
        #[clap(allow_hyphen_values = true)]
        quantity: i32,
    },
}

impl Cli {
    pub(crate) fn run(self) -> anyhow::Result<Value> {
        match self.command {
            Command::Ledger { input, query } => {
                let ledger: Ledger = read_records(input.as_deref(), SAMPLE_TRANSACTIONS)?
                    .into_iter()
                    .collect();
                query.run(&ledger)
            }
            Command::Stock { input, query } => {
                let stock: Stock = read_records(input.as_deref(), SAMPLE_PRODUCTS)?
                    .into_iter()
                    .collect();
                query.run(&stock)
            }
        }
    }
}

impl LedgerQuery {
    fn run(self, ledger: &Ledger) -> anyhow::Result<Value> {
        use LedgerQuery::*;

        let report = match self {
            Count => json!(ledger.count()),
            Contains { id } => json!(ledger.contains_id(TransactionId(id))),
            Get { id } => serde_json::to_value(ledger.get_by_id(TransactionId(id))?)?,
            ByStatus { status } => serde_json::to_value(ledger.by_status(status)?)?,
            Senders { status } => json!(ledger.senders_by_status(status)?),
            Receivers { status } => json!(ledger.receivers_by_status(status)?),
            Ordered => serde_json::to_value(ledger.all_ordered_by_amount_then_id())?,
            BySender { sender } => serde_json::to_value(ledger.by_sender_descending(&sender)?)?,
            ByReceiver { receiver } => {
                serde_json::to_value(ledger.by_receiver_then_id(&receiver)?)?
            }
            StatusMax { status, max } => {
                serde_json::to_value(ledger.by_status_max_amount(status, max))?
            }
            SenderMin { sender, min } => {
                serde_json::to_value(ledger.by_sender_min_amount_descending(&sender, min)?)?
            }
            ReceiverRange { receiver, lo, hi } => {
                serde_json::to_value(ledger.by_receiver_amount_range(&receiver, lo, hi)?)?
            }
            AmountRange { lo, hi } => serde_json::to_value(ledger.all_in_amount_range(lo, hi))?,
        };
        Ok(report)
    }
}

impl StockQuery {
    fn run(self, stock: &Stock) -> anyhow::Result<Value> {
        use StockQuery::*;

        let report = match self {
            Count => json!(stock.count()),
            Find { index } => serde_json::to_value(stock.find(index)?)?,
            FindByLabel { label } => serde_json::to_value(stock.find_by_label(&label)?)?,
            Alphabetical { count } => {
                serde_json::to_value(stock.first_by_alphabetical_order(count))?
            }
            PriceRange { lo, hi } => serde_json::to_value(stock.all_in_price_range(lo, hi))?,
            PriceAbove { price } => serde_json::to_value(stock.all_by_price_above(price))?,
            MostExpensive { count } => serde_json::to_value(stock.first_most_expensive(count)?)?,
            ByQuantity { quantity } => serde_json::to_value(stock.all_by_quantity(quantity))?,
        };
        Ok(report)
    }
}

/// Reads CSV rows from `input`, or from `sample` when no file is given. Rows that fail to
/// deserialize are logged and skipped.
fn read_records<'a, T>(input: Option<&Path>, sample: &'a str) -> anyhow::Result<Vec<T>>
where
    T: DeserializeOwned,
{
    let source: Box<dyn Read + 'a> = match input {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("Unable to open {}", path.display()))?,
        ),
        None => Box::new(sample.as_bytes()),
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut records = Vec::new();
    for (row, result) in rdr.deserialize::<T>().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => warn!("skipping row {}: {e}", row + 1),
        }
    }

    debug!("loaded {} records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, process};

    fn run(args: &[&str]) -> anyhow::Result<Value> {
        let args = std::iter::once("chain-stock").chain(args.iter().copied());
        Cli::try_parse_from(args)?.run()
    }

    #[test]
    fn ledger_sample_is_loaded() {
        assert_eq!(run(&["ledger", "count"]).unwrap(), json!(8));
    }

    #[test]
    fn ledger_status_query_reports_rounded_amounts() {
        let report = run(&["ledger", "by-status", "successful"]).unwrap();
        let ids: Vec<_> = report
            .as_array()
            .unwrap()
            .iter()
            .map(|tx| tx["id"].clone())
            .collect();

        assert_eq!(ids, vec![json!(7), json!(3), json!(8)]);
        assert_eq!(report[0]["amount"], "200");
        assert_eq!(report[1]["amount"], "125.5");
    }

    #[test]
    fn ledger_senders_query() {
        assert_eq!(
            run(&["ledger", "senders", "successful"]).unwrap(),
            json!(["Stan", "Aleks", "Aleks"])
        );
    }

    #[test]
    fn ledger_empty_result_is_an_error() {
        assert!(run(&["ledger", "by-status", "unauthorized"]).is_err());
        assert!(run(&["ledger", "get", "99"]).is_err());
    }

    #[test]
    fn ledger_accepts_negative_arguments() {
        assert_eq!(run(&["ledger", "contains", "-1"]).unwrap(), json!(false));
        assert!(run(&["ledger", "get", "-1"])
            .unwrap_err()
            .to_string()
            .contains("Transaction not found"));
        assert_eq!(
            run(&["ledger", "sender-min", "Stan", "-1"]).unwrap().as_array().map(Vec::len),
            Some(4)
        );
        assert_eq!(
            run(&["ledger", "amount-range", "-10", "115.25"]).unwrap().as_array().map(Vec::len),
            Some(4)
        );
    }

    #[test]
    fn stock_accepts_negative_arguments() {
        assert_eq!(
            run(&["stock", "price-range", "-5", "100"]).unwrap().as_array().map(Vec::len),
            Some(1)
        );
        assert_eq!(run(&["stock", "by-quantity", "-3"]).unwrap(), json!([]));
    }

    #[test]
    fn ledger_rejects_unknown_status() {
        assert!(run(&["ledger", "by-status", "settled"]).is_err());
    }

    #[test]
    fn stock_price_range_query() {
        let report = run(&["stock", "price-range", "155.45", "355.25"]).unwrap();
        let prices: Vec<_> = report
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["price"].clone())
            .collect();

        assert_eq!(
            prices,
            vec![json!("355.25"), json!("300"), json!("299.99"), json!("200")]
        );
    }

    #[test]
    fn stock_over_count_policies_differ() {
        assert_eq!(run(&["stock", "alphabetical", "7"]).unwrap(), json!([]));
        assert!(run(&["stock", "most-expensive", "7"]).is_err());
    }

    #[test]
    fn stock_find_out_of_bounds_is_an_error() {
        assert!(run(&["stock", "find", "6"]).is_err());
        assert_eq!(run(&["stock", "find", "0"]).unwrap()["label"], "label_test_1");
    }

    #[test]
    fn reads_input_file_and_skips_bad_rows() {
        let path = std::env::temp_dir().join(format!("chain-stock-{}.csv", process::id()));
        fs::write(
            &path,
            "label, price, quantity\nA, 10, 1\nB, not-a-price, 2\nC, 30, 3\n",
        )
        .unwrap();

        let report = run(&["stock", "--input", path.to_str().unwrap(), "count"]);
        fs::remove_file(&path).unwrap();

        assert_eq!(report.unwrap(), json!(2));
    }

    #[test]
    fn missing_input_file_is_an_error() {
        assert!(run(&["ledger", "--input", "/nonexistent/chain.csv", "count"]).is_err());
    }
}
