/// Approval and validation logic for transactions, separated from type definitions
use crate::error::ChainError;
use crate::ledger::Ledger;
use crate::transaction::types::{Party, Transaction};

impl Transaction {
    /// Read-only approval against the ledger's current balances.
    ///
    /// SYSTEM always approves. A wallet sender approves iff it is registered
    /// and can afford the amount. Nothing is reserved: a later debit may
    /// still fail if the balance moves in between.
    pub fn approve(&self, ledger: &Ledger) -> bool {
        self.check_funds(ledger).is_ok()
    }

    /// Same predicate as [`Transaction::approve`], with the reason on failure.
    pub fn check_funds(&self, ledger: &Ledger) -> Result<(), ChainError> {
        let address = match self.sender() {
            Party::System => return Ok(()),
            Party::Wallet(address) => address,
        };

        let wallet = ledger
            .get_wallet_by_address(address)
            .ok_or_else(|| ChainError::WalletNotFound(address.clone()))?;

        if !wallet.can_afford(self.amount()) {
            return Err(ChainError::InsufficientFunds {
                address: address.clone(),
                balance: wallet.balance,
                amount: self.amount(),
            });
        }
        Ok(())
    }

    /// Reject a transaction whose credit would overflow the receiver's
    /// balance. SYSTEM and unregistered receivers always pass, and so does a
    /// wallet paying itself, since the debit lands first.
    pub fn check_credit(&self, ledger: &Ledger) -> Result<(), ChainError> {
        let address = match self.receiver() {
            Party::System => return Ok(()),
            Party::Wallet(address) => address,
        };
        if self.sender() == self.receiver() {
            return Ok(());
        }

        match ledger.get_wallet_by_address(address) {
            Some(wallet) if !wallet.can_receive(self.amount()) => {
                Err(ChainError::InvalidTransaction(format!(
                    "Crediting {} to {} would overflow its balance of {}",
                    self.amount(),
                    address,
                    wallet.balance
                )))
            }
            _ => Ok(()),
        }
    }

    /// Reject non-positive amounts.
    ///
    /// Construction never calls this; the session applies it at the caller
    /// boundary.
    pub fn validate_amount(&self) -> Result<(), ChainError> {
        if self.amount() <= 0 {
            return Err(ChainError::InvalidTransaction(format!(
                "Amount must be positive, got {}",
                self.amount()
            )));
        }
        Ok(())
    }

    /// True if the stored signature matches a fresh recomputation.
    pub fn verify_signature(&self) -> bool {
        self.compute_signature() == self.signature()
    }
}
