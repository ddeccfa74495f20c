//! BlockSim - a small educational ledger sealed into a hash-linked chain
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Blockchain
//! - [`blockchain`] - Blocks, the chain and its validation
//! - [`transaction`] - Transactions, parties and approval
//! - [`ledger`] - Wallet registry and the transaction log
//!
//! ## Cryptography
//! - [`crypto`] - SHA-256 fingerprints, sentinels and timestamp rendering
//!
//! ## State Management
//! - [`wallet`] - Named wallets and their balances
//! - [`session`] - The approve/record/seal write path
//! - [`persistence`] - JSON state file and in-memory store
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Blockchain
// ============================================================================
pub mod blockchain;
pub mod ledger;
pub mod transaction;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;

// ============================================================================
// State Management
// ============================================================================
pub mod persistence;
pub mod session;
pub mod wallet;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
