use super::amount::round_serialize;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Created but not yet settled
    Pending,

    Successful,

    Failed,

    /// Cancelled by one of the parties before settlement
    Aborted,

    /// Rejected because the sender was not allowed to move the funds
    Unauthorized,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 5] = [
        TransactionStatus::Pending,
        TransactionStatus::Successful,
        TransactionStatus::Failed,
        TransactionStatus::Aborted,
        TransactionStatus::Unauthorized,
    ];

    pub fn as_str(&self) -> &'static str {
        use TransactionStatus::*;

        match self {
            Pending => "pending",
            Successful => "successful",
            Failed => "failed",
            Aborted => "aborted",
            Unauthorized => "unauthorized",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown transaction status - {0}")]
pub struct ParseStatusError(String);

impl FromStr for TransactionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStatusError(s.to_owned()))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct TransactionId(pub i32);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for TransactionId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// A transfer between two parties recorded on the ledger
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Expected unique, but not enforced. Lookups take the first match
    id: TransactionId,

    /// The only field that changes after the transaction is recorded
    status: TransactionStatus,

    sender: String,

    receiver: String,

    #[serde(serialize_with = "round_serialize")]
    amount: f64,
}

impl Transaction {
    pub fn new(
        id: impl Into<TransactionId>,
        status: TransactionStatus,
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            id: id.into(),
            status,
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    /// Set the transaction's status.
    pub fn set_status(&mut self, status: TransactionStatus) {
        self.status = status;
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("successful", TransactionStatus::Successful ; "lowercase")]
    #[test_case("Unauthorized", TransactionStatus::Unauthorized ; "capitalised")]
    #[test_case(" ABORTED ", TransactionStatus::Aborted ; "padded uppercase")]
    fn parses_status(input: &str, expected: TransactionStatus) {
        assert_eq!(input.parse::<TransactionStatus>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_status() {
        assert_eq!(
            "settled".parse::<TransactionStatus>(),
            Err(ParseStatusError("settled".to_owned()))
        );
    }

    #[test]
    fn status_display_round_trips_through_parse() {
        for status in TransactionStatus::ALL {
            assert_eq!(status.to_string().parse::<TransactionStatus>(), Ok(status));
        }
    }

    #[test]
    fn serializes_amount_rounded() {
        let tx = Transaction::new(7, TransactionStatus::Pending, "Stan", "Aleks", 0.1 + 0.2);
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["amount"], "0.3");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["id"], 7);
    }

    #[test]
    fn serializes_amount_beyond_decimal_range() {
        let tx = Transaction::new(1, TransactionStatus::Pending, "a", "b", 1e30);
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["amount"], 1e30);
    }
}
