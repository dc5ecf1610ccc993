use piggybank::{Amount, Bank,
    backend::{LedgerStore, TextStore},
    config::BankConfig};

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use anyhow::Context;
use colored::Colorize;
use clap::{Parser, Subcommand};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(version, about, propagate_version = true)]
struct Cli {
    /// Path to a TOML config file; defaults apply when it does not exist
    #[arg(short, long, default_value = "piggybank.toml")]
    config: PathBuf,

    /// Directory holding the ledger files, overrides the config file
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Action to perform, the interactive menu when omitted
    #[command(subcommand)]
    action: Option<Subcommands>,
}

#[derive(Debug, Subcommand)]
enum Subcommands {
    /// Run the interactive menu
    Menu,
    /// Print all accounts and transactions as JSON
    Export,
}

#[derive(Debug, Error)]
enum ShellError {
    #[error("no option {0:?}")]
    UnknownOption(String),
    #[error("selection {0:?} is out of range")]
    SelectionOutOfRange(String),
    #[error("not an amount: {0:?}")]
    InvalidAmount(String),
    #[error("name must not be empty")]
    EmptyName,
    #[error("no accounts yet, create one first")]
    NoAccounts,
    #[error("end of input")]
    EndOfInput,
}

const MENU: &str = "\
1. Create account
2. Deposit
3. Withdraw
4. Check balance
5. Transaction history
6. Apply monthly interest
7. List accounts
0. Exit";

struct Shell<'b, S: LedgerStore, R, W> {
    bank: &'b mut Bank<S>,
    input: R,
    output: W,
}

impl<'b, S, R, W> Shell<'b, S, R, W>
where
    S: LedgerStore,
    R: BufRead,
    W: Write,
{
    fn run(mut self) -> anyhow::Result<()> {
        loop {
            writeln!(self.output, "\n{}", MENU)?;
            let result = match self.ask("Choose an option: ") {
                Ok(choice) => match choice.as_str() {
                    "1" => self.create_account(),
                    "2" => self.deposit(),
                    "3" => self.withdraw(),
                    "4" => self.balance(),
                    "5" => self.history(),
                    "6" => self.apply_interest(),
                    "7" => self.list_accounts(),
                    "0" => return Ok(()),
                    other => Err(ShellError::UnknownOption(other.to_owned()).into()),
                },
                Err(err) => Err(err),
            };

            if let Err(err) = result {
                if matches!(err.downcast_ref::<ShellError>(), Some(ShellError::EndOfInput)) {
                    return Ok(());
                }
                if err.is::<io::Error>() {
                    return Err(err);
                }
                writeln!(self.output, "{}", format!("Error: {:#}", err).red())?;
            }
        }
    }

    fn ask(&mut self, prompt: &str) -> anyhow::Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ShellError::EndOfInput.into());
        }
        return Ok(line.trim().to_owned());
    }

    fn ask_amount(&mut self) -> anyhow::Result<Amount> {
        let raw = self.ask("Amount: ")?;
        raw.parse::<Amount>()
            .ok()
            .filter(|amount| amount.is_finite())
            .ok_or_else(|| ShellError::InvalidAmount(raw).into())
    }

    fn print_accounts(&mut self) -> anyhow::Result<()> {
        for (ordinal, summary) in self.bank.list_accounts().iter().enumerate() {
            writeln!(self.output, "{}. {} - {} ({:.2})",
                ordinal + 1, summary.number, summary.customer_name, summary.balance)?;
        }
        return Ok(());
    }

    /// Lets the user pick an account by its 1-based position in the list.
    fn select_account(&mut self) -> anyhow::Result<String> {
        let accounts = self.bank.list_accounts();
        if accounts.is_empty() {
            return Err(ShellError::NoAccounts.into());
        }
        self.print_accounts()?;

        let raw = self.ask("Select account: ")?;
        let selected = raw.parse::<usize>().ok()
            .and_then(|ordinal| ordinal.checked_sub(1))
            .and_then(|index| accounts.get(index));
        match selected {
            Some(summary) => Ok(summary.number.clone()),
            None => Err(ShellError::SelectionOutOfRange(raw).into())
        }
    }

    fn create_account(&mut self) -> anyhow::Result<()> {
        let name = self.ask("Customer name: ")?;
        if name.is_empty() {
            return Err(ShellError::EmptyName.into());
        }
        let number = self.bank.create_account(&name)?;
        writeln!(self.output, "{}", format!("Account created: {}", number).green())?;
        return Ok(());
    }

    fn deposit(&mut self) -> anyhow::Result<()> {
        let number = self.select_account()?;
        let amount = self.ask_amount()?;
        self.bank.deposit(&number, amount)?;
        writeln!(self.output, "{}", format!("Deposited {:.2} into {}", amount, number).green())?;
        return Ok(());
    }

    fn withdraw(&mut self) -> anyhow::Result<()> {
        let number = self.select_account()?;
        let amount = self.ask_amount()?;
        let outcome = self.bank.withdraw(&number, amount)?;

        if outcome.fraud_warning {
            writeln!(self.output, "{}", "Warning: unusually large withdrawal for this balance".yellow())?;
        }
        match outcome.result {
            Ok(()) => writeln!(self.output, "{}", format!("Withdrew {:.2} from {}", amount, number).green())?,
            Err(err) => writeln!(self.output, "{}", format!("Withdrawal failed: {}", err).red())?,
        }
        return Ok(());
    }

    fn balance(&mut self) -> anyhow::Result<()> {
        let number = self.select_account()?;
        let balance = self.bank.balance_of(&number)?;
        writeln!(self.output, "Balance of {}: {}", number, format!("{:.2}", balance).bold())?;
        return Ok(());
    }

    fn history(&mut self) -> anyhow::Result<()> {
        let number = self.select_account()?;
        let lines: Vec<String> = self.bank.history_of(&number)?
            .iter().map(|tx| tx.to_string()).collect();
        if lines.is_empty() {
            writeln!(self.output, "No transactions for {}", number)?;
        }
        for line in lines {
            writeln!(self.output, "{}", line)?;
        }
        return Ok(());
    }

    fn apply_interest(&mut self) -> anyhow::Result<()> {
        let report = self.bank.apply_monthly_interest()?;
        writeln!(self.output, "{}", format!("Interest for {} applied to {} account(s)",
            report.year_month, report.applied.len()).green())?;
        if !report.already_applied.is_empty() {
            writeln!(self.output, "Already applied this month: {}", report.already_applied.join(", "))?;
        }
        return Ok(());
    }

    fn list_accounts(&mut self) -> anyhow::Result<()> {
        if self.bank.list_accounts().is_empty() {
            writeln!(self.output, "No accounts yet")?;
            return Ok(());
        }
        self.print_accounts()?;
        writeln!(self.output, "Total: {:.2}", self.bank.ledger().total_balance())?;
        return Ok(());
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Cli::parse();

    let mut config = BankConfig::read_or_default(&args.config)?;
    if let Some(data_dir) = args.data_dir {
        config.storage.data_dir = data_dir;
    }

    let store = TextStore::new(&config.storage.data_dir);
    let (mut bank, skipped) = Bank::open(store, config.policy)
        .with_context(|| format!("failed to open ledger in {}", config.storage.data_dir.display()))?;
    if !skipped.is_empty() {
        eprintln!("{}", format!("{} malformed record(s) skipped while loading", skipped.len()).yellow());
    }

    match args.action.unwrap_or(Subcommands::Menu) {
        Subcommands::Menu => {
            let stdin = io::stdin();
            let shell = Shell { bank: &mut bank, input: stdin.lock(), output: io::stdout() };
            shell.run()
        },
        Subcommands::Export => {
            println!("{}", serde_json::to_string_pretty(bank.ledger())?);
            Ok(())
        }
    }
}
