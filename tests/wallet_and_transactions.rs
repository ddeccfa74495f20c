//! Integration tests for wallet creation and transaction handling

use blocksim::crypto::{address_from_string, format_timestamp, GENESIS_HASH, SYSTEM_ADDRESS};
use blocksim::error::ChainError;
use blocksim::ledger::Ledger;
use blocksim::session::Session;
use blocksim::transaction::{Party, Transaction};
use blocksim::wallet::Wallet;

/// Helper to build a session holding the given wallets
fn session_with(wallets: &[(&str, i64)]) -> Result<Session, Box<dyn std::error::Error>> {
    let mut session = Session::new();
    for (name, balance) in wallets {
        session.create_wallet(name, *balance)?;
    }
    Ok(session)
}

fn balance_of(session: &Session, name: &str) -> Option<i64> {
    session.wallet_by_name(name).map(|w| w.balance)
}

#[test]
fn test_wallet_creation() -> Result<(), Box<dyn std::error::Error>> {
    let wallet = Wallet::new("alice", 1000);

    assert_eq!(wallet.name, "alice");
    assert_eq!(wallet.balance, 1000);
    assert_eq!(
        wallet.address,
        "2bd806c97f0e00af1a1fc3328fa763a9269723c8db8fac4f93af71db186d6e90"
    );
    assert_eq!(wallet.address, address_from_string("alice"));

    Ok(())
}

#[test]
fn test_wallet_addresses_are_deterministic() -> Result<(), Box<dyn std::error::Error>> {
    let first = Wallet::new("bob", 0);
    let second = Wallet::new("bob", 500);
    let other = Wallet::new("carol", 0);

    assert_eq!(first.address, second.address);
    assert_ne!(first.address, other.address);

    Ok(())
}

#[test]
fn test_two_wallet_transfer() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = session_with(&[("alice", 1000), ("bob", 1000)])?;

    session.transfer("alice", "bob", 200)?;

    assert_eq!(balance_of(&session, "alice"), Some(800));
    assert_eq!(balance_of(&session, "bob"), Some(1200));
    assert_eq!(session.ledger().total_balance(), 2000);
    assert_eq!(session.ledger().transactions().len(), 1);
    assert_eq!(session.chain().height(), 1);
    assert!(session.chain().validate().is_ok());

    Ok(())
}

#[test]
fn test_system_deposit() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = session_with(&[("alice", 1000), ("bob", 1000)])?;

    let commit = session.adjust_balance("alice", 500)?;

    assert!(commit.outcome.is_balanced());
    assert_eq!(balance_of(&session, "alice"), Some(1500));
    assert_eq!(balance_of(&session, "bob"), Some(1000));

    let tx = &session.ledger().transactions()[0];
    assert_eq!(tx.sender().as_str(), SYSTEM_ADDRESS);

    Ok(())
}

#[test]
fn test_insufficient_funds_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = session_with(&[("alice", 50), ("bob", 0)])?;

    let result = session.transfer("alice", "bob", 100);

    assert!(matches!(result, Err(ChainError::InsufficientFunds { .. })));
    assert_eq!(balance_of(&session, "alice"), Some(50));
    assert_eq!(balance_of(&session, "bob"), Some(0));
    assert!(session.ledger().transactions().is_empty());
    assert!(session.chain().blocks().is_empty());

    Ok(())
}

#[test]
fn test_approve_is_read_only() -> Result<(), Box<dyn std::error::Error>> {
    let mut ledger = Ledger::new();
    let alice = Wallet::new("alice", 1000);
    let bob = Wallet::new("bob", 1000);
    ledger.add_wallet(alice.clone());
    ledger.add_wallet(bob.clone());

    let tx = Transaction::new(Some(&alice), Some(&bob), 1000);
    assert!(tx.approve(&ledger));
    assert!(tx.approve(&ledger));
    assert_eq!(ledger.total_balance(), 2000);
    assert!(ledger.transactions().is_empty());

    let too_much = Transaction::new(Some(&alice), Some(&bob), 1001);
    assert!(!too_much.approve(&ledger));

    let from_stranger = Transaction::new(Some(&Wallet::new("mallory", 5000)), Some(&bob), 1);
    assert!(!from_stranger.approve(&ledger));

    Ok(())
}

#[test]
fn test_signature_composition() -> Result<(), Box<dyn std::error::Error>> {
    let tx = Transaction::with_timestamp(Party::System, Party::from("abc"), 42, 1700000000.5);
    let expected = blocksim::crypto::fingerprint(&format!(
        "SYSTEMabc42{}",
        format_timestamp(1700000000.5)
    ));
    assert_eq!(tx.signature(), expected);

    Ok(())
}

#[test]
fn test_blocks_link_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = session_with(&[("alice", 100), ("bob", 100)])?;

    session.transfer("alice", "bob", 10)?;
    session.transfer("bob", "alice", 5)?;
    session.adjust_balance("alice", -20)?;

    let blocks = session.chain().blocks();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0].previous_hash(), GENESIS_HASH);
    for pair in blocks.windows(2) {
        assert_eq!(pair[1].previous_hash(), pair[0].hash());
    }
    for block in blocks {
        assert_eq!(block.transactions().len(), 1);
        assert!(block.verify_hash());
    }
    assert_eq!(session.chain().latest_hash(), blocks[2].hash());
    assert_eq!(balance_of(&session, "alice"), Some(75));
    assert_eq!(balance_of(&session, "bob"), Some(105));

    Ok(())
}

#[test]
fn test_wallet_name_rules() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new();

    assert!(matches!(
        session.create_wallet("", 0),
        Err(ChainError::WalletError(_))
    ));

    session.create_wallet("alice", 10)?;
    session.create_wallet("alice", 99)?;
    assert_eq!(session.ledger().wallet_count(), 1);
    assert_eq!(balance_of(&session, "alice"), Some(99));

    Ok(())
}
