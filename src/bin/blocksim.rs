#![forbid(unsafe_code)]
//! BlockSim command line: manage wallets, move funds and inspect the chain.

use blocksim::config::{load_config, Config};
use blocksim::crypto::abbreviate;
use blocksim::persistence::JsonStateFile;
use blocksim::session::{Commit, ReplayReport, Session};
use blocksim::transaction::Party;
use clap::{Parser, Subcommand};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Color as TableColor;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// State file to use instead of the configured one
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wallet management
    Wallet {
        #[command(subcommand)]
        command: WalletCommands,
    },
    /// Send funds from one wallet to another
    Send {
        from: String,
        to: String,
        amount: i64,
    },
    /// List all wallets
    Wallets,
    /// List recorded transactions
    Transactions,
    /// List sealed blocks
    Blocks,
    /// Check block linkage and hashes
    Verify,
}

#[derive(Subcommand)]
enum WalletCommands {
    /// Create a wallet
    Create {
        name: String,
        /// Starting balance, defaults to wallet.default_initial_balance
        #[arg(long)]
        balance: Option<i64>,
    },
    /// Deposit (positive) or withdraw (negative) through SYSTEM
    Adjust {
        name: String,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config()?;
    init_tracing(&config);

    let path = cli
        .state
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.storage.state_file));
    let store = JsonStateFile::new(path).with_backup(config.storage.backup);
    let mut session = match Session::load(&store, config.storage.replay)? {
        Some((session, report)) => {
            print_replay_report(&report);
            session
        }
        None => Session::new(),
    };

    match cli.command {
        Commands::Wallet { command } => match command {
            WalletCommands::Create { name, balance } => {
                let balance = balance.unwrap_or(config.wallet.default_initial_balance);
                let wallet = session.create_wallet(&name, balance)?;
                println!("{} {}", "✅ Created".bright_green().bold(), wallet);
                session.save(&store)?;
            }
            WalletCommands::Adjust { name, delta } => {
                let commit = session.adjust_balance(&name, delta)?;
                print_commit(&commit);
                session.save(&store)?;
            }
        },
        Commands::Send { from, to, amount } => {
            let commit = session.transfer(&from, &to, amount)?;
            print_commit(&commit);
            session.save(&store)?;
        }
        Commands::Wallets => print_wallets(&session),
        Commands::Transactions => print_transactions(&session),
        Commands::Blocks => print_blocks(&session),
        Commands::Verify => match session.chain().validate() {
            Ok(()) => println!(
                "{} {} blocks",
                "✅ Chain is valid:".bright_green().bold(),
                session.chain().height()
            ),
            Err(e) => {
                eprintln!("{} {}", "❌ Chain is invalid:".red().bold(), e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|t| Cell::new(t).fg(TableColor::Cyan).add_attribute(Attribute::Bold))
        .collect()
}

fn new_table(titles: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(titles));
    table
}

fn print_commit(commit: &Commit) {
    println!(
        "{} block #{} ({})",
        "✅ Sealed".bright_green().bold(),
        commit.height,
        abbreviate(&commit.block_hash, 16).bright_cyan()
    );
    println!("   signature {}", abbreviate(&commit.signature, 16));
    if !commit.outcome.is_balanced() {
        println!(
            "{}",
            "⚠️  Balances were only partly applied; see the log for details".yellow()
        );
    }
}

fn print_replay_report(report: &ReplayReport) {
    if report.skipped > 0 {
        eprintln!(
            "{} {} stored transaction(s) skipped: neither party is a known wallet",
            "⚠️ ".yellow(),
            report.skipped
        );
    }
    if report.unbalanced > 0 {
        eprintln!(
            "{} {} stored transaction(s) only partly applied to balances",
            "⚠️ ".yellow(),
            report.unbalanced
        );
    }
}

fn party_label(session: &Session, party: &Party) -> String {
    match party {
        Party::System => Party::System.to_string(),
        Party::Wallet(address) => match session.ledger().get_wallet_by_address(address) {
            Some(wallet) => wallet.name.clone(),
            None => format!("{}...", abbreviate(address, 10)),
        },
    }
}

fn print_wallets(session: &Session) {
    if session.ledger().wallet_count() == 0 {
        println!("{}", "📭 No wallets yet".yellow());
        return;
    }

    let mut table = new_table(&["Name", "Balance", "Address"]);
    for wallet in session.ledger().wallets() {
        table.add_row(vec![
            Cell::new(&wallet.name).fg(TableColor::White),
            Cell::new(wallet.balance).fg(TableColor::Green),
            Cell::new(&wallet.address).fg(TableColor::Grey),
        ]);
    }
    println!("{}", table);
    println!(
        "{} {}",
        "Total balance:".bright_blue().bold(),
        session.ledger().total_balance()
    );
}

fn print_transactions(session: &Session) {
    let transactions = session.ledger().transactions();
    if transactions.is_empty() {
        println!("{}", "📭 No transactions found".yellow());
        return;
    }

    let mut table = new_table(&["#", "From", "To", "Amount", "Time", "Signature"]);
    for (i, tx) in transactions.iter().enumerate() {
        let color = if tx.sender().is_system() || tx.receiver().is_system() {
            TableColor::Cyan
        } else {
            TableColor::White
        };
        table.add_row(vec![
            Cell::new(i),
            Cell::new(party_label(session, tx.sender())).fg(color),
            Cell::new(party_label(session, tx.receiver())).fg(color),
            Cell::new(tx.amount()).fg(TableColor::Green),
            Cell::new(format_time(tx.timestamp())).fg(TableColor::Grey),
            Cell::new(abbreviate(tx.signature(), 16)),
        ]);
    }
    println!("{}", table);
}

fn print_blocks(session: &Session) {
    let blocks = session.chain().blocks();
    if blocks.is_empty() {
        println!("{}", "📭 No blocks sealed yet".yellow());
        return;
    }

    let mut table = new_table(&["Height", "Hash", "Previous", "Transactions", "Time"]);
    for (height, block) in blocks.iter().enumerate() {
        table.add_row(vec![
            Cell::new(format!("#{}", height)).fg(TableColor::White),
            Cell::new(abbreviate(block.hash(), 16)).fg(TableColor::Cyan),
            Cell::new(abbreviate(block.previous_hash(), 16)).fg(TableColor::Grey),
            Cell::new(block.transactions().len()),
            Cell::new(format_time(block.timestamp())).fg(TableColor::Grey),
        ]);
    }
    println!("{}", table);
}

fn format_time(timestamp: f64) -> String {
    use chrono::DateTime;

    match DateTime::from_timestamp_micros((timestamp * 1e6) as i64) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "Invalid".to_string(),
    }
}
