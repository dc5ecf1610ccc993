use serde::Serialize;

use crate::core::account::Account;
use crate::core::transaction::{Amount, Transaction};

/// In-memory state: accounts in creation order plus the append-only history.
#[derive(Clone, Default, PartialEq, Debug, Serialize)]
pub struct Ledger {
    accounts: Vec<Account>,
    history: Vec<Transaction>
}

impl Ledger {
    const ACCOUNT_PREFIX: &'static str = "ACC";

    pub fn new() -> Ledger {
        Ledger::default()
    }

    pub fn from_parts(accounts: Vec<Account>, history: Vec<Transaction>) -> Ledger {
        Ledger { accounts, history }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn history(&self) -> &[Transaction] {
        &self.history
    }

    pub fn get_account(&self, number: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.number() == number)
    }

    pub(crate) fn get_account_mut(&mut self, number: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|account| account.number() == number)
    }

    pub(crate) fn accounts_mut(&mut self) -> impl Iterator<Item = &mut Account> {
        self.accounts.iter_mut()
    }

    /// Derived from the live account count, which is only sound
    /// because accounts are never removed.
    pub fn next_account_number(&self) -> String {
        format!("{}{}", Self::ACCOUNT_PREFIX, self.accounts.len() + 1)
    }

    pub(crate) fn add_account(&mut self, account: Account) {
        self.accounts.push(account);
    }

    pub(crate) fn record(&mut self, transaction: Transaction) {
        self.history.push(transaction);
    }

    pub fn history_of(&self, number: &str) -> Vec<&Transaction> {
        self.history.iter()
            .filter(|tx| tx.account_number() == number)
            .collect()
    }

    pub fn total_balance(&self) -> Amount {
        self.accounts.iter().map(Account::balance).sum()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::TransactionKind;
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    #[fixture]
    fn ledger() -> Ledger {
        let at = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let mut bilbo = Account::new("ACC1", "Bilbo");
        bilbo.deposit(60.0);
        let mut frodo = Account::new("ACC2", "Frodo");
        frodo.deposit(30.0);

        Ledger::from_parts(vec![bilbo, frodo], vec![
            Transaction::at("ACC1", TransactionKind::Deposit, 60.0, at, None),
            Transaction::at("ACC2", TransactionKind::Deposit, 40.0, at, None),
            Transaction::at("ACC2", TransactionKind::Withdraw, 10.0, at, Some("rent")),
            Transaction::at("ACC1", TransactionKind::Interest, 60.6, at, None),
        ])
    }

    #[test]
    fn numbers_follow_account_count() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.next_account_number(), "ACC1");
        ledger.add_account(Account::new("ACC1", "Bilbo"));
        assert_eq!(ledger.next_account_number(), "ACC2");
    }

    #[rstest]
    fn find_account(ledger: Ledger) {
        assert_eq!(ledger.get_account("ACC2").unwrap().customer_name(), "Frodo");
        assert!(ledger.get_account("ACC3").is_none());
        assert!(ledger.get_account("acc1").is_none());
    }

    #[rstest]
    fn history_is_filtered_in_order(ledger: Ledger) {
        let kinds: Vec<_> = ledger.history_of("ACC2").iter().map(|tx| tx.kind()).collect();
        assert_eq!(kinds, vec![TransactionKind::Deposit, TransactionKind::Withdraw]);

        let amounts: Vec<_> = ledger.history_of("ACC1").iter().map(|tx| tx.amount()).collect();
        assert_eq!(amounts, vec![60.0, 60.6]);

        assert!(ledger.history_of("ACC9").is_empty());
    }

    #[rstest]
    fn record_appends(mut ledger: Ledger) {
        let tx = Transaction::new("ACC1", TransactionKind::Deposit, 1.0, None);
        ledger.record(tx.clone());
        assert_eq!(ledger.history().len(), 5);
        assert_eq!(ledger.history().last(), Some(&tx));
    }

    #[rstest]
    fn total(ledger: Ledger) {
        assert_eq!(ledger.total_balance(), 90.0);
    }
}
