use super::query::{ascending_by, descending_by, Pipeline};
use super::transaction::{Transaction, TransactionId, TransactionStatus};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Transaction not found - id {0}")]
    TransactionNotFound(TransactionId),

    #[error("No transactions match {query}")]
    NoMatchingTransactions { query: String },
}

type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    fn no_match(query: String) -> Self {
        LedgerError::NoMatchingTransactions { query }
    }
}

/// Chain of transactions kept in insertion order
#[derive(Debug, Default, Clone)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.transactions.len()
    }

    /// Always succeeds. Duplicates, including duplicate ids, are kept.
    pub fn add(&mut self, transaction: Transaction) {
        debug!("adding transaction {}", transaction.id());
        self.transactions.push(transaction);
    }

    pub fn contains(&self, transaction: &Transaction) -> bool {
        self.transactions.contains(transaction)
    }

    pub fn contains_id(&self, id: TransactionId) -> bool {
        self.position(id).is_some()
    }

    pub fn get_by_id(&self, id: TransactionId) -> LedgerResult<&Transaction> {
        self.transactions
            .iter()
            .find(|tx| tx.id() == id)
            .ok_or(LedgerError::TransactionNotFound(id))
    }

    pub fn change_status(
        &mut self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> LedgerResult<()> {
        let transaction = self
            .transactions
            .iter_mut()
            .find(|tx| tx.id() == id)
            .ok_or(LedgerError::TransactionNotFound(id))?;

        debug!("transaction {id}: {} -> {status}", transaction.status());
        transaction.set_status(status);
        Ok(())
    }

    /// Removes the first transaction with `id` and hands it back.
    pub fn remove_by_id(&mut self, id: TransactionId) -> LedgerResult<Transaction> {
        let index = self
            .position(id)
            .ok_or(LedgerError::TransactionNotFound(id))?;

        debug!("removing transaction {id}");
        Ok(self.transactions.remove(index))
    }

    /// Transactions with `status`, largest amount first.
    pub fn by_status(&self, status: TransactionStatus) -> LedgerResult<Vec<Transaction>> {
        let found = Pipeline::over(&self.transactions)
            .filter(|tx| tx.status() == status)
            .non_empty_or(|| LedgerError::no_match(format!("status {status}")))?
            .sort_by(descending_by(Transaction::amount))
            .collect();

        trace!("by_status({status}): {} transactions", found.len());
        Ok(found)
    }

    /// Senders of transactions with `status`, in insertion order. Duplicates are kept.
    pub fn senders_by_status(&self, status: TransactionStatus) -> LedgerResult<Vec<String>> {
        Ok(Pipeline::over(&self.transactions)
            .filter(|tx| tx.status() == status)
            .non_empty_or(|| LedgerError::no_match(format!("status {status}")))?
            .map(|tx| tx.sender().to_owned()))
    }

    /// Receivers of transactions with `status`, in insertion order. Duplicates are kept.
    pub fn receivers_by_status(&self, status: TransactionStatus) -> LedgerResult<Vec<String>> {
        Ok(Pipeline::over(&self.transactions)
            .filter(|tx| tx.status() == status)
            .non_empty_or(|| LedgerError::no_match(format!("status {status}")))?
            .map(|tx| tx.receiver().to_owned()))
    }

    /// Every transaction, largest amount first. Equal amounts put the higher id first.
    pub fn all_ordered_by_amount_then_id(&self) -> Vec<Transaction> {
        let by_amount = descending_by(Transaction::amount);

        Pipeline::over(&self.transactions)
            .sort_by(|a, b| by_amount(a, b).then_with(|| b.id().cmp(&a.id())))
            .collect()
    }

    pub fn by_sender_descending(&self, sender: &str) -> LedgerResult<Vec<Transaction>> {
        Ok(Pipeline::over(&self.transactions)
            .filter(|tx| tx.sender() == sender)
            .non_empty_or(|| LedgerError::no_match(format!("sender {sender}")))?
            .sort_by(descending_by(Transaction::amount))
            .collect())
    }

    /// Smallest amount first. Equal amounts put the lower id first.
    pub fn by_receiver_then_id(&self, receiver: &str) -> LedgerResult<Vec<Transaction>> {
        let by_amount = ascending_by(Transaction::amount);

        Ok(Pipeline::over(&self.transactions)
            .filter(|tx| tx.receiver() == receiver)
            .non_empty_or(|| LedgerError::no_match(format!("receiver {receiver}")))?
            .sort_by(|a, b| by_amount(a, b).then_with(|| a.id().cmp(&b.id())))
            .collect())
    }

    /// Transactions with `status` and an amount of at most `max`. Empty when none match.
    pub fn by_status_max_amount(&self, status: TransactionStatus, max: f64) -> Vec<Transaction> {
        Pipeline::over(&self.transactions)
            .filter(|tx| tx.status() == status && tx.amount() <= max)
            .sort_by(descending_by(Transaction::amount))
            .collect()
    }

    /// Transactions from `sender` strictly above `min`, largest first.
    pub fn by_sender_min_amount_descending(
        &self,
        sender: &str,
        min: f64,
    ) -> LedgerResult<Vec<Transaction>> {
        Ok(Pipeline::over(&self.transactions)
            .filter(|tx| tx.sender() == sender && tx.amount() > min)
            .non_empty_or(|| LedgerError::no_match(format!("sender {sender} above {min}")))?
            .sort_by(descending_by(Transaction::amount))
            .collect())
    }

    /// Transactions to `receiver` with `lo <= amount < hi`, largest first.
    pub fn by_receiver_amount_range(
        &self,
        receiver: &str,
        lo: f64,
        hi: f64,
    ) -> LedgerResult<Vec<Transaction>> {
        let query = || format!("receiver {receiver} with amount in [{lo}, {hi})");

        Ok(Pipeline::over(&self.transactions)
            .filter(|tx| tx.receiver() == receiver && lo <= tx.amount() && tx.amount() < hi)
            .non_empty_or(|| LedgerError::no_match(query()))?
            .sort_by(descending_by(Transaction::amount))
            .collect())
    }

    /// Transactions with `lo <= amount <= hi`, in insertion order.
    pub fn all_in_amount_range(&self, lo: f64, hi: f64) -> Vec<Transaction> {
        Pipeline::over(&self.transactions)
            .filter(|tx| lo <= tx.amount() && tx.amount() <= hi)
            .collect()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    fn position(&self, id: TransactionId) -> Option<usize> {
        self.transactions.iter().position(|tx| tx.id() == id)
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Transaction> for Ledger {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        let mut ledger = Ledger::new();
        ledger.extend(iter);
        ledger
    }
}

impl Extend<Transaction> for Ledger {
    fn extend<I: IntoIterator<Item = Transaction>>(&mut self, iter: I) {
        for transaction in iter {
            self.add(transaction);
        }
    }
}
