//! Local administrative block lists
//!
//! Addresses and user ids blocked by an operator. The evaluator only queries
//! these; mutation belongs to the administrative surface.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Default)]
pub struct Blocklist {
    addresses: RwLock<HashSet<String>>,
    users: RwLock<HashSet<u64>>,
}

impl Blocklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_addresses<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = Self::new();
        for addr in addresses {
            list.add_address(addr);
        }
        list
    }

    pub fn is_blocked_address(&self, address: &str) -> bool {
        self.addresses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(address)
    }

    pub fn is_blocked_user(&self, user_id: u64) -> bool {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&user_id)
    }

    pub fn add_address(&self, address: impl Into<String>) {
        let address = address.into();
        tracing::info!("Blocking address {} locally", address);
        self.addresses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address);
    }

    pub fn remove_address(&self, address: &str) -> bool {
        self.addresses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(address)
    }

    pub fn add_user(&self, user_id: u64) {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user_id);
    }

    pub fn remove_user(&self, user_id: u64) -> bool {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&user_id)
    }

    /// Sorted for stable output
    pub fn list_addresses(&self) -> Vec<String> {
        let mut list: Vec<String> = self
            .addresses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();
        list.sort();
        list
    }

    pub fn list_users(&self) -> Vec<u64> {
        let mut list: Vec<u64> = self
            .users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect();
        list.sort_unstable();
        list
    }
}
