//! Ledger collaborator.
//!
//! The mechanism never talks to storage directly; it performs exactly one
//! read-modify-write of one auction entity per operation, through a store
//! handle that is scoped to a single atomic transaction. Serializability and
//! conflict control for concurrent transactions on the same auction are owned
//! by the hosting ledger.

use {
    anyhow::{Context, Result},
    model::Auction,
    std::{collections::HashMap, sync::Mutex},
};

/// Key-value access to the shared ledger within one atomic transaction.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait LedgerStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;
}

/// Namespaced ledger key of an auction. Also doubles as the topic on which
/// the auction's summaries are published.
pub fn auction_key(name: &str) -> String {
    format!("auction {name}")
}

/// Whether an auction with the given name exists, without parsing it.
pub fn auction_exists(store: &dyn LedgerStore, name: &str) -> Result<bool> {
    Ok(store.get(&auction_key(name))?.is_some())
}

/// Typed read of an auction entity.
pub fn read_auction(store: &dyn LedgerStore, name: &str) -> Result<Option<Auction>> {
    let Some(raw) = store.get(&auction_key(name))? else {
        return Ok(None);
    };
    let auction = serde_json::from_slice(&raw)
        .with_context(|| format!("malformed auction entity under `{}`", auction_key(name)))?;
    Ok(Some(auction))
}

/// Typed write of an auction entity under its namespaced key.
pub fn write_auction(store: &dyn LedgerStore, auction: &Auction) -> Result<()> {
    let raw = serde_json::to_vec(auction).context("serialize auction entity")?;
    store.put(&auction_key(&auction.name), raw)
}

/// Store backed by a process-local map. One instance models the world state
/// as seen by a sequence of serialized transactions; used by tests and by
/// hosts that layer their own persistence underneath.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl LedgerStore for InMemoryLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }
}
