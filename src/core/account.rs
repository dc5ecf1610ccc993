use std::fmt;

use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::core::error::WithdrawError;
use crate::core::year_month::YearMonth;
use crate::core::Amount;

#[skip_serializing_none]
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Account {
    pub(crate) number: String,
    pub(crate) customer_name: String,
    pub(crate) balance: Amount,
    pub(crate) daily_withdraw_limit: Amount,
    /// Never reset when the calendar day changes.
    pub(crate) withdrawn_today: Amount,
    pub(crate) last_interest_applied: Option<YearMonth>
}

impl Account {
    pub const DEFAULT_DAILY_WITHDRAW_LIMIT: Amount = 20000.0;

    pub fn new(number: &str, customer_name: &str) -> Account {
        Account {
            number: number.to_owned(),
            customer_name: customer_name.to_owned(),
            balance: 0.0,
            daily_withdraw_limit: Self::DEFAULT_DAILY_WITHDRAW_LIMIT,
            withdrawn_today: 0.0,
            last_interest_applied: None
        }
    }

    pub fn with_daily_withdraw_limit(mut self, limit: Amount) -> Account {
        self.daily_withdraw_limit = limit;
        self
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn daily_withdraw_limit(&self) -> Amount {
        self.daily_withdraw_limit
    }

    pub fn withdrawn_today(&self) -> Amount {
        self.withdrawn_today
    }

    pub fn last_interest_applied(&self) -> Option<YearMonth> {
        self.last_interest_applied
    }

    /// Credits the account. Any amount is accepted, including zero or negative ones.
    pub fn deposit(&mut self, amount: Amount) {
        self.balance += amount;
    }

    pub fn try_withdraw(&mut self, amount: Amount) -> Result<(), WithdrawError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(WithdrawError::InvalidAmount(amount));
        }
        if self.withdrawn_today + amount > self.daily_withdraw_limit {
            return Err(WithdrawError::DailyLimitExceeded {
                requested: amount,
                withdrawn_today: self.withdrawn_today,
                limit: self.daily_withdraw_limit
            });
        }
        if amount > self.balance {
            return Err(WithdrawError::InsufficientFunds {
                requested: amount,
                available: self.balance
            });
        }

        self.balance -= amount;
        self.withdrawn_today += amount;
        return Ok(());
    }

    /// Accrues `balance * rate` once per `year_month`. Returns whether
    /// interest was applied, `false` if this month was already accrued.
    pub fn apply_monthly_interest(&mut self, rate: f64, year_month: YearMonth) -> bool {
        if self.last_interest_applied == Some(year_month) {
            return false;
        }
        self.balance += self.balance * rate;
        self.last_interest_applied = Some(year_month);
        return true;
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {:.2}", self.number, self.customer_name, self.balance)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn alice() -> Account {
        Account::new("ACC1", "Alice")
    }

    fn funded(balance: Amount, withdrawn_today: Amount) -> Account {
        Account { balance, withdrawn_today, ..Account::new("ACC1", "Alice") }
    }

    fn january() -> YearMonth {
        YearMonth::new(2024, 1).unwrap()
    }

    #[rstest]
    fn starts_empty(alice: Account) {
        assert_eq!(alice.balance(), 0.0);
        assert_eq!(alice.withdrawn_today(), 0.0);
        assert_eq!(alice.daily_withdraw_limit(), 20000.0);
        assert_eq!(alice.last_interest_applied(), None);
    }

    #[rstest]
    #[case(1000.0, 1000.0)]
    #[case(0.0, 0.0)]
    #[case(-50.0, -50.0)]
    fn deposit_is_unconditional(mut alice: Account, #[case] amount: Amount, #[case] expected: Amount) {
        alice.deposit(amount);
        assert_eq!(alice.balance(), expected);
    }

    #[rstest]
    fn withdraw_then_overdraw(mut alice: Account) {
        alice.deposit(1000.0);
        alice.try_withdraw(500.0).unwrap();
        assert_eq!(alice.balance(), 500.0);
        assert_eq!(alice.withdrawn_today(), 500.0);

        let err = alice.try_withdraw(600.0).unwrap_err();
        assert!(matches!(err, WithdrawError::InsufficientFunds { .. }));
        assert_eq!(alice.balance(), 500.0);
        assert_eq!(alice.withdrawn_today(), 500.0);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-10.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn rejects_invalid_amounts(#[case] amount: Amount) {
        let mut account = funded(100.0, 0.0);
        assert!(matches!(account.try_withdraw(amount), Err(WithdrawError::InvalidAmount(_))));
        assert_eq!(account, funded(100.0, 0.0));
    }

    #[test]
    fn daily_limit() {
        let mut account = funded(100.0, 19900.0);

        let err = account.try_withdraw(200.0).unwrap_err();
        assert_eq!(err, WithdrawError::DailyLimitExceeded {
            requested: 200.0,
            withdrawn_today: 19900.0,
            limit: 20000.0
        });
        assert_eq!(account.balance(), 100.0);

        account.try_withdraw(50.0).unwrap();
        assert_eq!(account.balance(), 50.0);
        assert_eq!(account.withdrawn_today(), 19950.0);
    }

    #[test]
    fn withdrawing_exact_limit_and_balance() {
        let mut account = funded(300.0, 0.0).with_daily_withdraw_limit(300.0);
        account.try_withdraw(300.0).unwrap();
        assert_eq!(account.balance(), 0.0);
        assert!(account.try_withdraw(0.01).is_err());
    }

    #[test]
    fn balance_never_negative() {
        let mut account = funded(100.0, 0.0);
        for amount in [30.0, 30.0, 30.0, 30.0, 30.0] {
            let _ = account.try_withdraw(amount);
            assert!(account.balance() >= 0.0);
        }
        assert_eq!(account.balance(), 10.0);
    }

    #[test]
    fn interest_is_idempotent_per_month() {
        let mut account = funded(1000.0, 0.0);

        assert!(account.apply_monthly_interest(0.01, january()));
        assert_eq!(account.balance(), 1010.0);
        assert_eq!(account.last_interest_applied(), Some(january()));

        assert!(!account.apply_monthly_interest(0.01, january()));
        assert_eq!(account.balance(), 1010.0);

        let february = YearMonth::new(2024, 2).unwrap();
        assert!(account.apply_monthly_interest(0.01, february));
        assert_eq!(account.balance(), 1020.1);
        assert_eq!(account.last_interest_applied(), Some(february));
    }

    #[rstest]
    fn display(mut alice: Account) {
        alice.deposit(12.5);
        assert_eq!(alice.to_string(), "ACC1 (Alice): 12.50");
    }
}
