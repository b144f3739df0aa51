//! Coffer operator tool: drives a treasury snapshot from the shell.
//!
//! Every command loads the snapshot, applies one operation as the named
//! caller, and writes the snapshot back if anything changed.

use anyhow::{bail, Context};
use clap::Parser;
use coffer_treasury::{
    Address, GovernanceError, RequestId, Timestamp, Treasury, TreasuryConfig, TreasuryEvent,
    VoteSide,
};
use coffer_utils::{format_remaining, init_logging, LogFormat};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "coffer", about = "Share-governed treasury operator tool")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "COFFER_CONFIG")]
    config: Option<PathBuf>,

    /// Treasury snapshot file (defaults to the config's `state_path`).
    #[arg(long, env = "COFFER_STATE")]
    state: Option<PathBuf>,

    /// Logical time in unix seconds. Defaults to the wall clock.
    #[arg(long, env = "COFFER_NOW")]
    at: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "COFFER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "COFFER_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Deploy a new treasury and write its first snapshot.
    Deploy {
        /// Identity allowed to open withdrawal requests.
        #[arg(long)]
        owner: Option<Address>,
        /// Share token name.
        #[arg(long)]
        name: Option<String>,
        /// Share token symbol.
        #[arg(long)]
        symbol: Option<String>,
        /// The treasury's own account, which escrows voting shares.
        #[arg(long)]
        address: Option<Address>,
        /// Overwrite an existing snapshot.
        #[arg(long)]
        force: bool,
    },
    /// Deposit funds; mints the same number of shares.
    StoreFunds { from: Address, amount: u128 },
    /// Move unlocked shares between accounts.
    Transfer {
        from: Address,
        to: Address,
        amount: u128,
    },
    /// Let `spender` move up to `amount` of `owner`'s shares.
    Approve {
        owner: Address,
        spender: Address,
        amount: u128,
    },
    /// Move shares on an allowance.
    TransferFrom {
        spender: Address,
        from: Address,
        to: Address,
        amount: u128,
    },
    /// Open a withdrawal request (owner only).
    Initiate {
        #[arg(long = "as")]
        caller: Address,
        amount: u128,
        description: String,
        /// Voting window in seconds; must exceed the deployed minimum.
        duration: u64,
    },
    /// Lock shares on one side of an open request.
    Vote {
        voter: Address,
        id: u64,
        amount: u128,
        /// "yes" or "no".
        side: VoteSide,
    },
    /// Settle a request whose deadline has passed.
    Resolve {
        id: u64,
        /// Caller identity; defaults to the owner.
        #[arg(long = "as")]
        caller: Option<Address>,
    },
    /// Take back escrowed shares after a request is resolved.
    Reclaim { voter: Address, id: u64 },
    /// Show an account's unlocked and locked shares.
    Balance { account: Address },
    /// Show one request.
    Request { id: u64 },
    /// List all requests.
    Requests,
    /// Pool, supply and holders.
    Status,
    /// Print the event log.
    Events {
        /// First sequence number to print.
        #[arg(long, default_value_t = 0)]
        since: usize,
        /// One JSON object per line.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => TreasuryConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TreasuryConfig::default(),
    };
    if let Some(state) = cli.state {
        config.state_path = state;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    init_logging(config.log_format, &config.log_level);
    if let Some(ref path) = cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    let now = cli.at.map(Timestamp::new).unwrap_or_else(Timestamp::now);
    run(cli.command, config, now)
}

fn run(command: Command, mut config: TreasuryConfig, now: Timestamp) -> anyhow::Result<()> {
    match command {
        Command::Deploy {
            owner,
            name,
            symbol,
            address,
            force,
        } => {
            if owner.is_some() {
                config.owner = owner;
            }
            if let Some(name) = name {
                config.token_name = name;
            }
            if let Some(symbol) = symbol {
                config.token_symbol = symbol;
            }
            if let Some(address) = address {
                config.treasury_address = address;
            }
            if config.state_path.exists() && !force {
                bail!(
                    "{} already exists; pass --force to replace it",
                    config.state_path.display()
                );
            }
            let treasury = Treasury::from_config(&config)?;
            save(&treasury, &config.state_path)?;
            println!(
                "Deployed {} ({}) owner={} address={}",
                treasury.metadata().name,
                treasury.metadata().symbol,
                treasury.owner(),
                treasury.address()
            );
        }
        Command::StoreFunds { from, amount } => {
            let mut t = load(&config.state_path)?;
            let balance = t.store_funds(&from, amount)?;
            save(&t, &config.state_path)?;
            println!("{from} stored {amount}; shares: {balance}; pool: {}", t.pool_balance());
        }
        Command::Transfer { from, to, amount } => {
            let mut t = load(&config.state_path)?;
            t.transfer(&from, &to, amount)?;
            save(&t, &config.state_path)?;
            println!("{from} -> {to}: {amount}");
        }
        Command::Approve {
            owner,
            spender,
            amount,
        } => {
            let mut t = load(&config.state_path)?;
            t.approve(&owner, &spender, amount)?;
            save(&t, &config.state_path)?;
            println!("{spender} may spend {amount} of {owner}'s shares");
        }
        Command::TransferFrom {
            spender,
            from,
            to,
            amount,
        } => {
            let mut t = load(&config.state_path)?;
            t.transfer_from(&spender, &from, &to, amount)?;
            save(&t, &config.state_path)?;
            println!(
                "{from} -> {to}: {amount} (allowance left: {})",
                t.allowance(&from, &spender)
            );
        }
        Command::Initiate {
            caller,
            amount,
            description,
            duration,
        } => {
            let mut t = load(&config.state_path)?;
            let id = t.initiate_withdrawal(&caller, amount, &description, duration, now)?;
            save(&t, &config.state_path)?;
            let deadline = t.request(id)?.deadline;
            println!("request {id} opened for {amount}, voting {}", format_remaining(deadline, now));
        }
        Command::Vote {
            voter,
            id,
            amount,
            side,
        } => {
            let mut t = load(&config.state_path)?;
            let id = RequestId::new(id);
            t.vote(&voter, id, amount, side, now)?;
            save(&t, &config.state_path)?;
            let request = t.request(id)?;
            println!(
                "{voter} voted {side} with {amount} on {id}; yes {} / no {}",
                request.yes_weight, request.no_weight
            );
        }
        Command::Resolve { id, caller } => {
            let mut t = load(&config.state_path)?;
            let caller = caller.unwrap_or_else(|| t.owner().clone());
            let outcome = match t.resolve(&caller, RequestId::new(id), now) {
                Ok(outcome) => outcome,
                Err(e) => {
                    if let Some(GovernanceError::VotingStillOpen { deadline, .. }) = e.governance() {
                        bail!("{e}; voting {}", format_remaining(*deadline, now));
                    }
                    return Err(e.into());
                }
            };
            save(&t, &config.state_path)?;
            if outcome.approved {
                println!(
                    "request {} approved ({} / {}); {} released to {}",
                    outcome.id, outcome.yes_weight, outcome.no_weight, outcome.payout, outcome.requester
                );
            } else {
                println!(
                    "request {} rejected ({} / {})",
                    outcome.id, outcome.yes_weight, outcome.no_weight
                );
            }
        }
        Command::Reclaim { voter, id } => {
            let mut t = load(&config.state_path)?;
            let amount = t.reclaim(&voter, RequestId::new(id))?;
            save(&t, &config.state_path)?;
            println!("{voter} reclaimed {amount} shares");
        }
        Command::Balance { account } => {
            let t = load(&config.state_path)?;
            println!(
                "{account}: {} unlocked, {} locked",
                t.balance_of(&account),
                t.locked_by(&account)
            );
        }
        Command::Request { id } => {
            let t = load(&config.state_path)?;
            let id = RequestId::new(id);
            let request = t.request(id)?;
            println!("request {id}");
            println!("  requester:   {}", request.requester);
            println!("  amount:      {}", request.amount);
            println!("  description: {}", request.description);
            println!(
                "  deadline:    {} ({})",
                request.deadline,
                format_remaining(request.deadline, now)
            );
            println!("  yes / no:    {} / {}", request.yes_weight, request.no_weight);
            println!("  status:      {}", request.status(now).as_str());
            if request.resolved {
                println!("  executed:    {}", request.executed);
            }
            for (voter, record) in t.votes_on(id) {
                println!(
                    "  vote {voter}: yes {} no {}{}",
                    record.yes,
                    record.no,
                    if record.reclaimed { " (reclaimed)" } else { "" }
                );
            }
        }
        Command::Requests => {
            let t = load(&config.state_path)?;
            if t.request_count() == 0 {
                println!("no requests");
            }
            for request in t.requests() {
                println!(
                    "{:>4}  {:<8}  {:>12}  yes {} / no {}  {}",
                    request.id.to_string(),
                    request.status(now).as_str(),
                    request.amount,
                    request.yes_weight,
                    request.no_weight,
                    request.description
                );
            }
        }
        Command::Status => {
            let t = load(&config.state_path)?;
            let meta = t.metadata();
            println!("{} ({}), {} decimals", meta.name, meta.symbol, meta.decimals);
            println!("owner:      {}", t.owner());
            println!("address:    {}", t.address());
            println!("pool:       {}", t.pool_balance());
            println!("supply:     {}", t.total_supply());
            println!("disbursed:  {}", t.total_disbursed());
            println!("requests:   {}", t.request_count());
            for (holder, balance) in t.holders() {
                println!("  {holder}: {balance}");
            }
        }
        Command::Events { since, json } => {
            let t = load(&config.state_path)?;
            for (offset, event) in t.events().since(since).iter().enumerate() {
                let seq = since + offset;
                if json {
                    println!("{}", serde_json::to_string(&EventLine { seq, event })?);
                } else {
                    println!("{seq:>4}  {event}");
                }
            }
        }
    }

    Ok(())
}

/// One line of `coffer events --json` output.
#[derive(Serialize)]
struct EventLine<'a> {
    seq: usize,
    event: &'a TreasuryEvent,
}

fn load(path: &Path) -> anyhow::Result<Treasury> {
    Treasury::load_from_file(path)
        .with_context(|| format!("no treasury at {}; run `coffer deploy` first", path.display()))
}

fn save(treasury: &Treasury, path: &Path) -> anyhow::Result<()> {
    treasury
        .save_to_file(path)
        .with_context(|| format!("writing snapshot {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &tempfile::TempDir) -> TreasuryConfig {
        TreasuryConfig {
            state_path: dir.path().join("state.bin"),
            ..TreasuryConfig::default()
        }
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("coffer").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn parses_vote_arguments() {
        let cli = parse(&["--at", "100", "vote", "0xa", "3", "8000", "yes"]);
        assert_eq!(cli.at, Some(100));
        match cli.command {
            Command::Vote {
                voter,
                id,
                amount,
                side,
            } => {
                assert_eq!(voter, Address::new("0xa"));
                assert_eq!(id, 3);
                assert_eq!(amount, 8_000);
                assert_eq!(side, VoteSide::Yes);
            }
            _ => panic!("expected vote"),
        }
    }

    #[test]
    fn rejects_bad_vote_side() {
        let result = Cli::try_parse_from(["coffer", "vote", "0xa", "0", "1", "maybe"]);
        assert!(result.is_err());
    }

    #[test]
    fn full_round_through_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let t0 = Timestamp::new(1_000);
        let step = |args: &[&str], now: Timestamp| run(parse(args).command, config.clone(), now);

        step(&["deploy", "--owner", "0xowner"], t0).unwrap();
        assert!(step(&["deploy", "--owner", "0xowner"], t0).is_err());

        step(&["store-funds", "0xa", "10000"], t0).unwrap();
        step(&["store-funds", "0xb", "20000"], t0).unwrap();
        step(&["initiate", "--as", "0xowner", "20000", "For investing", "300"], t0).unwrap();
        step(&["vote", "0xa", "0", "8000", "yes"], t0).unwrap();
        step(&["vote", "0xb", "0", "5000", "no"], t0).unwrap();
        let early = step(&["resolve", "0"], t0).unwrap_err();
        assert!(early.to_string().contains("ends in 5m 0s"));

        step(&["resolve", "0"], Timestamp::new(1_300)).unwrap();
        step(&["reclaim", "0xa", "0"], Timestamp::new(1_300)).unwrap();

        let t = Treasury::load_from_file(&config.state_path).unwrap();
        assert_eq!(t.pool_balance(), 10_000);
        assert_eq!(t.balance_of(&Address::new("0xa")), 10_000);
        assert_eq!(t.balance_of(&Address::new("0xb")), 15_000);
        assert!(t.request(RequestId::new(0)).unwrap().executed);
    }

    #[test]
    fn commands_need_a_deployed_treasury() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(parse(&["status"]).command, config_in(&dir), Timestamp::EPOCH).unwrap_err();
        assert!(err.to_string().contains("coffer deploy"));
    }
}
