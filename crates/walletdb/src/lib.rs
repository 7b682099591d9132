//! Persistent record store backing the sigmad wallet.
//!
//! Every wallet fact lives as a typed record in `Column::Wallet` under a
//! short string key prefix (`"key"`, `"tx"`, `"sigma_spend"`, ...). The
//! prefix scheme is an on-disk contract: recovery and migration depend on it
//! byte-for-byte. Record values carry an explicit version field so older
//! software can keep reading newer stores up to its supported floor, and
//! newer fields decode to documented defaults.

pub mod codec;
pub mod coins;
pub mod error;
pub mod hdchain;
pub mod hdmint;
pub mod keypath;
pub mod keys;
pub mod load;
pub mod recover;
pub mod txstore;
pub mod walletdb;

pub use error::{DbErrors, WalletDbError};
pub use load::{load_wallet, Wallet};
pub use walletdb::WalletDb;
