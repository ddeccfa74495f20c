/// Transaction types for BlockSim
use crate::crypto::{
    abbreviate, fingerprint, format_timestamp, now_timestamp, Address, Fingerprint, SYSTEM_ADDRESS,
};
use crate::wallet::Wallet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One side of a transfer: a wallet address or the SYSTEM pseudo-party.
///
/// Serialized as the bare address string, or `"SYSTEM"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Party {
    System,
    Wallet(Address),
}

impl Party {
    /// Map an optional wallet to its party; `None` is the SYSTEM sentinel.
    pub fn of(wallet: Option<&Wallet>) -> Self {
        match wallet {
            Some(w) => Party::Wallet(w.address.clone()),
            None => Party::System,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Party::System => SYSTEM_ADDRESS,
            Party::Wallet(address) => address,
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Party::System)
    }

    /// The wallet address, if this party is not SYSTEM.
    pub fn address(&self) -> Option<&str> {
        match self {
            Party::System => None,
            Party::Wallet(address) => Some(address),
        }
    }

    /// Display form with wallet addresses cut to `len` characters.
    pub fn short(&self, len: usize) -> &str {
        abbreviate(self.as_str(), len)
    }
}

impl From<String> for Party {
    fn from(value: String) -> Self {
        if value == SYSTEM_ADDRESS {
            Party::System
        } else {
            Party::Wallet(value)
        }
    }
}

impl From<&str> for Party {
    fn from(value: &str) -> Self {
        Party::from(value.to_string())
    }
}

impl From<Party> for String {
    fn from(party: Party) -> Self {
        match party {
            Party::System => SYSTEM_ADDRESS.to_string(),
            Party::Wallet(address) => address,
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable value transfer between two parties.
///
/// The `signature` is a content fingerprint over sender, receiver, amount and
/// timestamp. It is fixed at construction and provides no authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    sender: Party,
    receiver: Party,
    amount: i64,
    timestamp: f64,
    signature: Fingerprint,
}

impl Transaction {
    /// Build a transfer between wallets, stamped with the current time.
    /// A `None` side is the SYSTEM sentinel. The amount is stored as given.
    pub fn new(sender: Option<&Wallet>, receiver: Option<&Wallet>, amount: i64) -> Self {
        Self::between(Party::of(sender), Party::of(receiver), amount)
    }

    /// Build a transfer between two parties, stamped with the current time.
    pub fn between(sender: Party, receiver: Party, amount: i64) -> Self {
        Self::with_timestamp(sender, receiver, amount, now_timestamp())
    }

    /// Build a transfer with an explicit timestamp.
    pub fn with_timestamp(sender: Party, receiver: Party, amount: i64, timestamp: f64) -> Self {
        let signature = fingerprint(&signable_message(&sender, &receiver, amount, timestamp));
        Transaction {
            sender,
            receiver,
            amount,
            timestamp,
            signature,
        }
    }

    /// Rebuild a stored transaction. The stored signature is kept even if it
    /// does not match the fields.
    pub fn restore(
        sender: Party,
        receiver: Party,
        amount: i64,
        timestamp: f64,
        signature: Fingerprint,
    ) -> Self {
        Transaction {
            sender,
            receiver,
            amount,
            timestamp,
            signature,
        }
    }

    pub fn sender(&self) -> &Party {
        &self.sender
    }

    pub fn receiver(&self) -> &Party {
        &self.receiver
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// The text the signature is computed over.
    pub fn signable_message(&self) -> String {
        signable_message(&self.sender, &self.receiver, self.amount, self.timestamp)
    }

    /// Recompute the fingerprint from the current fields.
    pub fn compute_signature(&self) -> Fingerprint {
        fingerprint(&self.signable_message())
    }

    /// True if either side is the given address.
    pub fn involves(&self, address: &str) -> bool {
        self.sender.address() == Some(address) || self.receiver.address() == Some(address)
    }

    /// True if SYSTEM is on either side.
    pub fn is_system(&self) -> bool {
        self.sender.is_system() || self.receiver.is_system()
    }
}

fn signable_message(sender: &Party, receiver: &Party, amount: i64, timestamp: f64) -> String {
    format!(
        "{}{}{}{}",
        sender.as_str(),
        receiver.as_str(),
        amount,
        format_timestamp(timestamp)
    )
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Transaction(sender={}, receiver={}, amount={}, time={:.2})",
            self.sender.short(10),
            self.receiver.short(10),
            self.amount,
            self.timestamp
        )
    }
}
