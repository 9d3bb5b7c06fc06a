//! Priority queue for tracking position health (min-heap by health)

use priority_queue::PriorityQueue;
use solana_sdk::pubkey::Pubkey;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Position health snapshot
#[derive(Debug, Clone)]
pub struct PositionHealth {
    /// Borrower pubkey
    pub borrower: Pubkey,
    /// Borrow position account
    pub position: Pubkey,
    /// Pool the position borrows from
    pub pool: Pubkey,
    /// Mint the debt is denominated in
    pub wanted_mint: Pubkey,
    /// Health ratio in percent (100 = at the liquidation threshold)
    pub health: u64,
    /// Projected debt including pending interest
    pub debt: u64,
    /// Whether the loan term has elapsed
    pub expired: bool,
    /// Last update timestamp
    pub last_update: i64,
}

impl PositionHealth {
    /// Check if the position can be liquidated
    pub fn needs_liquidation(&self) -> bool {
        self.health < crate::health::HEALTHY_RATIO || self.expired
    }
}

/// Health-based priority queue (min-heap: lowest health first)
pub struct HealthQueue {
    /// Priority queue (using Reverse for min-heap)
    queue: PriorityQueue<Pubkey, Reverse<u64>>,
    /// Map for O(1) lookups
    map: HashMap<Pubkey, PositionHealth>,
}

impl HealthQueue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self {
            queue: PriorityQueue::new(),
            map: HashMap::new(),
        }
    }

    /// Push or update position health
    pub fn push(&mut self, health: PositionHealth) {
        let borrower = health.borrower;
        let ratio = health.health;

        self.map.insert(borrower, health);
        self.queue.push(borrower, Reverse(ratio));
    }

    /// Pop position with lowest health
    pub fn pop(&mut self) -> Option<PositionHealth> {
        let (borrower, _priority) = self.queue.pop()?;
        self.map.remove(&borrower)
    }

    /// Peek at position with lowest health without removing
    pub fn peek(&self) -> Option<&PositionHealth> {
        let (borrower, _priority) = self.queue.peek()?;
        self.map.get(borrower)
    }

    /// Remove position from queue
    pub fn remove(&mut self, borrower: &Pubkey) -> Option<PositionHealth> {
        self.queue.remove(borrower);
        self.map.remove(borrower)
    }

    /// Get position health by borrower
    pub fn get(&self, borrower: &Pubkey) -> Option<&PositionHealth> {
        self.map.get(borrower)
    }

    /// Get number of positions in queue
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Get all liquidatable positions (unhealthy or expired)
    pub fn get_liquidatable(&self) -> Vec<PositionHealth> {
        self.map
            .values()
            .filter(|ph| ph.needs_liquidation())
            .cloned()
            .collect()
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        self.queue.clear();
        self.map.clear();
    }
}

impl Default for HealthQueue {
    fn default() -> Self {
        Self::new()
    }
}
