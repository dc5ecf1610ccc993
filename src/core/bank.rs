use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::backend::{LedgerStore, SkippedRecord};
use crate::core::account::Account;
use crate::core::error::{BankError, BankResult, WithdrawError};
use crate::core::ledger::Ledger;
use crate::core::transaction::{Amount, Transaction, TransactionKind};
use crate::core::year_month::YearMonth;

/// Tunable rules the engine enforces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankPolicy {
    pub daily_withdraw_limit: Amount,
    /// Withdrawals above this fraction of the balance raise a warning.
    pub fraud_threshold: f64,
    /// Applied once per calendar month.
    pub interest_rate: f64
}

impl Default for BankPolicy {
    fn default() -> Self {
        BankPolicy {
            daily_withdraw_limit: Account::DEFAULT_DAILY_WITHDRAW_LIMIT,
            fraud_threshold: 0.80,
            interest_rate: 0.01
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountSummary {
    pub number: String,
    pub customer_name: String,
    pub balance: Amount
}

#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawOutcome {
    /// Set when the fraud heuristic fired. It never blocks the withdrawal.
    pub fraud_warning: bool,
    pub result: Result<(), WithdrawError>
}

impl WithdrawOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterestReport {
    pub year_month: YearMonth,
    /// Accounts that accrued interest in this pass.
    pub applied: Vec<String>,
    /// Accounts already accrued for `year_month`.
    pub already_applied: Vec<String>
}

/// Owns the ledger and persists all of it after every mutation.
pub struct Bank<S: LedgerStore> {
    ledger: Ledger,
    store: S,
    policy: BankPolicy
}

impl<S: LedgerStore> Bank<S> {
    /// Loads the ledger from `store`. Records that could not be decoded are
    /// logged and handed back; they are dropped from the next save.
    pub fn open(store: S, policy: BankPolicy) -> BankResult<(Bank<S>, Vec<SkippedRecord>)> {
        let loaded = store.load()?;
        for skipped in &loaded.skipped {
            warn!("skipping {} line {}: {}", skipped.file, skipped.line, skipped.reason);
        }

        let mut ledger = loaded.ledger;
        for account in ledger.accounts_mut() {
            account.daily_withdraw_limit = policy.daily_withdraw_limit;
        }

        info!("opened ledger with {} accounts", ledger.accounts().len());
        return Ok((Bank { ledger, store, policy }, loaded.skipped));
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn policy(&self) -> &BankPolicy {
        &self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&self) -> BankResult<()> {
        self.store.save(&self.ledger).map_err(|err| {
            error!("save failed, changes kept in memory only: {}", err);
            BankError::from(err)
        })
    }

    fn account_mut(&mut self, number: &str) -> BankResult<&mut Account> {
        self.ledger.get_account_mut(number)
            .ok_or_else(|| BankError::UnknownAccount(number.to_owned()))
    }

    pub fn account(&self, number: &str) -> Option<&Account> {
        self.ledger.get_account(number)
    }

    /// Names containing a line break are refused before anything changes.
    pub fn create_account(&mut self, customer_name: &str) -> BankResult<String> {
        if customer_name.contains(['\n', '\r']) {
            return Err(BankError::InvalidName(customer_name.to_owned()));
        }
        let number = self.ledger.next_account_number();
        let account = Account::new(&number, customer_name)
            .with_daily_withdraw_limit(self.policy.daily_withdraw_limit);
        self.ledger.add_account(account);
        info!("created account {} for {}", number, customer_name);

        self.persist()?;
        return Ok(number);
    }

    pub fn deposit(&mut self, number: &str, amount: Amount) -> BankResult<()> {
        self.account_mut(number)?.deposit(amount);
        self.ledger.record(Transaction::new(number, TransactionKind::Deposit, amount, None));
        self.persist()
    }

    /// A refused withdrawal is not an error: it comes back inside the
    /// outcome and leaves both the ledger and the store untouched.
    pub fn withdraw(&mut self, number: &str, amount: Amount) -> BankResult<WithdrawOutcome> {
        let fraud_threshold = self.policy.fraud_threshold;
        let account = self.account_mut(number)?;

        let fraud_warning = amount > account.balance() * fraud_threshold;
        if fraud_warning {
            warn!("possible fraud: {} withdrawing {} of {} balance", number, amount, account.balance());
        }

        if let Err(err) = account.try_withdraw(amount) {
            warn!("withdrawal of {} from {} refused: {}", amount, number, err);
            return Ok(WithdrawOutcome { fraud_warning, result: Err(err) });
        }

        self.ledger.record(Transaction::new(number, TransactionKind::Withdraw, amount, None));
        self.persist()?;
        return Ok(WithdrawOutcome { fraud_warning, result: Ok(()) });
    }

    pub fn apply_monthly_interest(&mut self) -> BankResult<InterestReport> {
        self.apply_monthly_interest_for(YearMonth::current())
    }

    /// Accrues interest on every account for `year_month`, at most once per
    /// account, and records one INTEREST entry per account carrying the
    /// resulting balance. Saves once at the end.
    pub fn apply_monthly_interest_for(&mut self, year_month: YearMonth) -> BankResult<InterestReport> {
        let rate = self.policy.interest_rate;
        let mut report = InterestReport { year_month, applied: Vec::new(), already_applied: Vec::new() };
        let mut entries = Vec::new();

        for account in self.ledger.accounts_mut() {
            if account.apply_monthly_interest(rate, year_month) {
                report.applied.push(account.number().to_owned());
            } else {
                report.already_applied.push(account.number().to_owned());
            }
            entries.push(Transaction::new(account.number(), TransactionKind::Interest, account.balance(), None));
        }
        for entry in entries {
            self.ledger.record(entry);
        }

        info!("interest for {}: {} accounts accrued, {} already up to date",
            year_month, report.applied.len(), report.already_applied.len());
        self.persist()?;
        return Ok(report);
    }

    pub fn list_accounts(&self) -> Vec<AccountSummary> {
        self.ledger.accounts().iter()
            .map(|account| AccountSummary {
                number: account.number().to_owned(),
                customer_name: account.customer_name().to_owned(),
                balance: account.balance()
            })
            .collect()
    }

    pub fn balance_of(&self, number: &str) -> BankResult<Amount> {
        self.account(number)
            .map(Account::balance)
            .ok_or_else(|| BankError::UnknownAccount(number.to_owned()))
    }

    pub fn history_of(&self, number: &str) -> BankResult<Vec<&Transaction>> {
        if self.account(number).is_none() {
            return Err(BankError::UnknownAccount(number.to_owned()));
        }
        return Ok(self.ledger.history_of(number));
    }
}
