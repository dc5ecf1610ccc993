use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Serialize, Serializer};
use serde_with::skip_serializing_none;

pub type Amount = f64;

/// Layout of every persisted and displayed timestamp, second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    Interest
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "DEPOSIT",
            Self::Withdraw => "WITHDRAW",
            Self::Interest => "INTEREST"
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPOSIT" => Ok(Self::Deposit),
            "WITHDRAW" => Ok(Self::Withdraw),
            "INTEREST" => Ok(Self::Interest),
            other => Err(format!("unknown transaction type {:?}", other))
        }
    }
}

fn timestamp_serialize<S>(timestamp: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.collect_str(&timestamp.format(TIMESTAMP_FORMAT))
}

/// One ledger event. Never mutated once recorded.
#[skip_serializing_none]
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Transaction {
    account_number: String,
    #[serde(rename = "type")]
    kind: TransactionKind,
    amount: Amount,
    #[serde(serialize_with = "timestamp_serialize")]
    timestamp: NaiveDateTime,
    remark: Option<String>
}

impl Transaction {
    /// Records an event stamped with the current local time, truncated to whole seconds.
    pub fn new(account_number: &str, kind: TransactionKind, amount: Amount, remark: Option<&str>) -> Transaction {
        let now = Local::now().naive_local();
        let timestamp = now.with_nanosecond(0).unwrap_or(now);
        Transaction::at(account_number, kind, amount, timestamp, remark)
    }

    pub fn at(account_number: &str, kind: TransactionKind, amount: Amount, timestamp: NaiveDateTime, remark: Option<&str>) -> Transaction {
        Transaction {
            account_number: account_number.to_owned(),
            kind,
            amount,
            timestamp,
            remark: remark.filter(|r| !r.is_empty()).map(str::to_owned)
        }
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn remark(&self) -> Option<&str> {
        self.remark.as_deref()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} - {:.2}", self.timestamp.format(TIMESTAMP_FORMAT), self.kind, self.amount)?;
        if let Some(remark) = &self.remark {
            write!(f, " ({})", remark)?;
        }
        return Ok(());
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    #[fixture]
    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
            .and_hms_opt(12, 30, 5).unwrap()
    }

    #[rstest]
    fn display_with_remark(noon: NaiveDateTime) {
        let tx = Transaction::at("ACC1", TransactionKind::Deposit, 1000.0, noon, Some("salary"));
        assert_eq!(tx.to_string(), "[2024-01-15 12:30:05] DEPOSIT - 1000.00 (salary)");
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    fn display_without_remark(noon: NaiveDateTime, #[case] remark: Option<&str>) {
        let tx = Transaction::at("ACC1", TransactionKind::Withdraw, 12.5, noon, remark);
        assert_eq!(tx.remark(), None);
        assert_eq!(tx.to_string(), "[2024-01-15 12:30:05] WITHDRAW - 12.50");
    }

    #[rstest]
    #[case(TransactionKind::Deposit, "DEPOSIT")]
    #[case(TransactionKind::Withdraw, "WITHDRAW")]
    #[case(TransactionKind::Interest, "INTEREST")]
    fn kind_names(#[case] kind: TransactionKind, #[case] name: &str) {
        assert_eq!(kind.to_string(), name);
        assert_eq!(name.parse::<TransactionKind>(), Ok(kind));
    }

    #[test]
    fn unknown_kind() {
        assert!("deposit".parse::<TransactionKind>().is_err());
        assert!("TRANSFER".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn new_truncates_to_seconds() {
        let tx = Transaction::new("ACC2", TransactionKind::Interest, 1.0, None);
        assert_eq!(tx.timestamp().nanosecond(), 0);
        assert_eq!(tx.account_number(), "ACC2");
    }

    #[rstest]
    fn equality_is_structural(noon: NaiveDateTime) {
        let a = Transaction::at("ACC1", TransactionKind::Deposit, 5.0, noon, Some("x"));
        let b = Transaction::at("ACC1", TransactionKind::Deposit, 5.0, noon, Some("x"));
        assert_eq!(a, b);
        assert_ne!(a, Transaction::at("ACC1", TransactionKind::Deposit, 5.0, noon, None));
    }

    #[rstest]
    fn serializes_to_json(noon: NaiveDateTime) {
        let tx = Transaction::at("ACC1", TransactionKind::Interest, 1010.0, noon, None);
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value, serde_json::json!({
            "account_number": "ACC1",
            "type": "INTEREST",
            "amount": 1010.0,
            "timestamp": "2024-01-15 12:30:05"
        }));
    }
}
