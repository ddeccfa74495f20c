//! Transaction module split into types and validation for better modularity

pub mod types;
pub mod validation;

pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{fingerprint, SYSTEM_ADDRESS};
    use crate::error::ChainError;
    use crate::ledger::Ledger;
    use crate::wallet::Wallet;

    fn ledger_with(wallets: &[(&str, i64)]) -> Ledger {
        let mut ledger = Ledger::new();
        for (name, balance) in wallets {
            ledger.add_wallet(Wallet::new(*name, *balance));
        }
        ledger
    }

    #[test]
    fn test_none_wallet_maps_to_system() {
        let alice = Wallet::new("alice", 0);
        let tx = Transaction::new(None, Some(&alice), 500);
        assert_eq!(tx.sender(), &Party::System);
        assert_eq!(tx.sender().as_str(), SYSTEM_ADDRESS);
        assert_eq!(tx.receiver(), &Party::Wallet(alice.address.clone()));
    }

    #[test]
    fn test_signature_is_pure_function_of_fields() {
        let alice = Wallet::new("alice", 0);
        let bob = Wallet::new("bob", 0);
        let tx = Transaction::new(Some(&alice), Some(&bob), 200);
        assert_eq!(tx.compute_signature(), tx.signature());
        assert!(tx.verify_signature());
    }

    #[test]
    fn test_signature_composition() {
        let tx = Transaction::with_timestamp(
            Party::System,
            Party::from("abc"),
            42,
            1700000000.5,
        );
        assert_eq!(tx.signable_message(), "SYSTEMabc421700000000.5");
        assert_eq!(tx.signature(), fingerprint("SYSTEMabc421700000000.5"));
    }

    #[test]
    fn test_identical_fields_identical_signature() {
        let a = Transaction::with_timestamp(Party::from("x"), Party::from("y"), 5, 10.0);
        let b = Transaction::with_timestamp(Party::from("x"), Party::from("y"), 5, 10.0);
        assert_eq!(a.signature(), b.signature());

        let c = Transaction::with_timestamp(Party::from("x"), Party::from("y"), 6, 10.0);
        assert_ne!(a.signature(), c.signature());
    }

    #[test]
    fn test_restore_keeps_stored_signature() {
        let tx = Transaction::restore(
            Party::System,
            Party::from("abc"),
            1,
            2.0,
            "not-a-real-signature".to_string(),
        );
        assert_eq!(tx.signature(), "not-a-real-signature");
        assert!(!tx.verify_signature());
    }

    #[test]
    fn test_approve_transfer_within_balance() {
        let ledger = ledger_with(&[("alice", 1000), ("bob", 1000)]);
        let alice = ledger.get_wallet_by_address(&Wallet::new("alice", 0).address).unwrap();
        let bob = ledger.get_wallet_by_address(&Wallet::new("bob", 0).address).unwrap();
        let tx = Transaction::new(Some(alice), Some(bob), 200);
        assert!(tx.approve(&ledger));
    }

    #[test]
    fn test_approve_insufficient_funds() {
        let ledger = ledger_with(&[("alice", 50), ("bob", 0)]);
        let alice = Wallet::new("alice", 50);
        let bob = Wallet::new("bob", 0);
        let tx = Transaction::new(Some(&alice), Some(&bob), 100);
        assert!(!tx.approve(&ledger));

        match tx.check_funds(&ledger) {
            Err(ChainError::InsufficientFunds { balance, amount, .. }) => {
                assert_eq!(balance, 50);
                assert_eq!(amount, 100);
            }
            other => panic!("Expected InsufficientFunds, got {:?}", other),
        }
    }

    #[test]
    fn test_approve_unregistered_sender() {
        let ledger = ledger_with(&[("bob", 0)]);
        let ghost = Wallet::new("ghost", 1_000_000);
        let bob = Wallet::new("bob", 0);
        let tx = Transaction::new(Some(&ghost), Some(&bob), 1);
        assert!(!tx.approve(&ledger));
        assert!(matches!(tx.check_funds(&ledger), Err(ChainError::WalletNotFound(_))));
    }

    #[test]
    fn test_system_sender_always_approves() {
        let ledger = Ledger::new();
        let tx = Transaction::between(Party::System, Party::from("anything"), i64::MAX);
        assert!(tx.approve(&ledger));
    }

    #[test]
    fn test_approve_does_not_mutate() {
        let ledger = ledger_with(&[("alice", 100)]);
        let alice = Wallet::new("alice", 100);
        let tx = Transaction::new(Some(&alice), None, 60);
        assert!(tx.approve(&ledger));
        assert!(tx.approve(&ledger));
        assert_eq!(ledger.get_wallet_by_address(&alice.address).unwrap().balance, 100);
        assert!(ledger.transactions().is_empty());
    }

    #[test]
    fn test_validate_amount() {
        let positive = Transaction::between(Party::System, Party::from("a"), 1);
        assert!(positive.validate_amount().is_ok());

        let zero = Transaction::between(Party::System, Party::from("a"), 0);
        assert!(zero.validate_amount().is_err());

        let negative = Transaction::between(Party::System, Party::from("a"), -5);
        if let Err(ChainError::InvalidTransaction(msg)) = negative.validate_amount() {
            assert!(msg.contains("positive"));
        } else {
            panic!("Expected InvalidTransaction error");
        }
    }

    #[test]
    fn test_party_serde_uses_bare_strings() {
        let json = serde_json::to_string(&Party::System).unwrap();
        assert_eq!(json, "\"SYSTEM\"");

        let party: Party = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(party, Party::Wallet("abc".to_string()));

        let system: Party = serde_json::from_str("\"SYSTEM\"").unwrap();
        assert!(system.is_system());
    }

    #[test]
    fn test_involves() {
        let tx = Transaction::between(Party::from("a"), Party::from("b"), 1);
        assert!(tx.involves("a"));
        assert!(tx.involves("b"));
        assert!(!tx.involves("c"));
        assert!(!tx.involves(SYSTEM_ADDRESS));
        assert!(!tx.is_system());
    }

    #[test]
    fn test_check_credit_guards_receiver_overflow() {
        let ledger = ledger_with(&[("alice", i64::MAX), ("bob", 10)]);
        let alice = Wallet::new("alice", 0);
        let bob = Wallet::new("bob", 0);

        let deposit = Transaction::new(None, Some(&alice), 1);
        assert!(matches!(
            deposit.check_credit(&ledger),
            Err(ChainError::InvalidTransaction(_))
        ));
        assert!(Transaction::new(None, Some(&bob), 1).check_credit(&ledger).is_ok());
        assert!(Transaction::new(Some(&alice), None, 1).check_credit(&ledger).is_ok());
        assert!(Transaction::new(Some(&alice), Some(&alice), 1).check_credit(&ledger).is_ok());
    }
}
