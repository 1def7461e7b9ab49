use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use tally_types::{Amount, Balance, Identity};

#[derive(Parser)]
#[command(
    name = "tally",
    about = "Tally: a shared expense ledger",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Ledger state file (JSON snapshot)
    #[arg(long, global = true, default_value = "tally.json")]
    pub state: PathBuf,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Register a participant
    Register(RegisterArgs),
    /// Change a registered participant's name
    Rename(RegisterArgs),
    /// Look up a participant
    Whois(IdentityArg),
    /// List registered participants
    People,
    /// Record a shared expense
    Add(AddArgs),
    /// Show one expense
    Show(ShowArgs),
    /// Print the label of the most recent expense
    Last,
    /// List all expenses
    List,
    /// Net balance of one identity
    Balance(IdentityArg),
    /// Net balances of everyone in the ledger
    Balances,
    /// Announce a debt settlement
    Settle(SettleArgs),
    /// Check expenses for unbalanced totals, duplicates and unknown participants
    Audit,
    /// Generate a random identity
    NewIdentity,
}

#[derive(Args)]
pub struct RegisterArgs {
    pub identity: Identity,
    pub name: String,
}

#[derive(Args)]
pub struct IdentityArg {
    pub identity: Identity,
}

#[derive(Args)]
pub struct AddArgs {
    pub label: String,
    /// Participant share as `<identity>:<paid>:<owed>`; repeat per participant
    #[arg(long = "share", value_name = "ID:PAID:OWED")]
    pub shares: Vec<Share>,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: u64,
}

#[derive(Args)]
pub struct SettleArgs {
    pub payer: Identity,
    pub payee: Identity,
    #[arg(allow_hyphen_values = true)]
    pub amount: Balance,
}

/// One participant's position in an expense.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Share {
    pub identity: Identity,
    pub paid: Amount,
    pub owed: Amount,
}

impl FromStr for Share {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [identity, paid, owed] = parts.as_slice() else {
            return Err(format!("expected <identity>:<paid>:<owed>, got {s:?}"));
        };
        Ok(Self {
            identity: identity.parse().map_err(|e| format!("{e}"))?,
            paid: paid.parse().map_err(|_| format!("invalid paid amount {paid:?}"))?,
            owed: owed.parse().map_err(|_| format!("invalid owed amount {owed:?}"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "0x0101010101010101010101010101010101010101";
    const B: &str = "0x0202020202020202020202020202020202020202";

    #[test]
    fn parse_register() {
        let cli = Cli::try_parse_from(["tally", "register", A, "Ana"]).unwrap();
        if let Command::Register(args) = cli.command {
            assert_eq!(args.identity, A.parse().unwrap());
            assert_eq!(args.name, "Ana");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_add_with_shares() {
        let cli = Cli::try_parse_from([
            "tally", "add", "rent",
            "--share", &format!("{A}:100:50"),
            "--share", &format!("{B}:0:50"),
        ]).unwrap();
        if let Command::Add(args) = cli.command {
            assert_eq!(args.label, "rent");
            assert_eq!(args.shares.len(), 2);
            assert_eq!(args.shares[0].paid, 100);
            assert_eq!(args.shares[1].owed, 50);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn malformed_share_is_rejected() {
        assert!(Cli::try_parse_from(["tally", "add", "x", "--share", "nope"]).is_err());
        assert!(Cli::try_parse_from(["tally", "add", "x", "--share", &format!("{A}:-1:0")]).is_err());
    }

    #[test]
    fn bad_identity_is_rejected() {
        assert!(Cli::try_parse_from(["tally", "whois", "0x12"]).is_err());
    }

    #[test]
    fn parse_settle_negative_amount() {
        let cli = Cli::try_parse_from(["tally", "settle", A, B, "-5"]).unwrap();
        if let Command::Settle(args) = cli.command {
            assert_eq!(args.amount, -5);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_globals() {
        let cli = Cli::try_parse_from([
            "tally", "balances", "--state", "/tmp/s.json", "--format", "json", "-v",
        ]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.state, PathBuf::from("/tmp/s.json"));
        assert!(cli.config.is_none());
    }

    #[test]
    fn default_state_path() {
        let cli = Cli::try_parse_from(["tally", "people"]).unwrap();
        assert_eq!(cli.state, PathBuf::from("tally.json"));
        assert!(matches!(cli.format, OutputFormat::Text));
    }
}
