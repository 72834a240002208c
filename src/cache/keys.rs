//! Cache key generation and management

use std::fmt;

/// Cache identity for one transaction-history query. The block range is
/// part of the key: a history fetched for one range must never satisfy a
/// query for another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxCacheKey {
    address: String,
    start_block: u64,
    end_block: u64,
}

impl TxCacheKey {
    pub fn new(address: &str, start_block: u64, end_block: u64) -> Self {
        Self {
            // Checksummed and lowercase spellings are the same account;
            // normalize so they share one entry.
            address: address.to_lowercase(),
            start_block,
            end_block,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn start_block(&self) -> u64 {
        self.start_block
    }

    pub fn end_block(&self) -> u64 {
        self.end_block
    }
}

impl fmt::Display for TxCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tx:{}:{}:{}",
            self.address, self.start_block, self.end_block
        )
    }
}
