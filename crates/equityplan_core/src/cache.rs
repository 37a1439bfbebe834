//! Memoized client evaluation
//!
//! Reports are keyed by client, the client's current grant set and the
//! evaluation date. Adding or removing a grant changes the key, so a stale
//! report is never returned for a different portfolio. Edits to a grant's
//! terms do not change the key; callers invalidate the client after saving.

use jiff::civil::Date;
use rustc_hash::FxHashMap;

use crate::config::PlanningConfig;
use crate::evaluate::{ClientReport, evaluate_client};
use crate::model::{Client, ClientId, GrantId};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub client_id: ClientId,
    /// Sorted
    pub grant_ids: Vec<GrantId>,
    pub as_of: Date,
}

impl CacheKey {
    pub fn for_client(client: &Client, as_of: Date) -> Self {
        Self {
            client_id: client.id.clone(),
            grant_ids: client.grant_ids(),
            as_of,
        }
    }
}

#[derive(Debug, Default)]
pub struct EvaluationCache {
    config: PlanningConfig,
    entries: FxHashMap<CacheKey, ClientReport>,
    hits: u64,
    misses: u64,
}

impl EvaluationCache {
    pub fn new(config: PlanningConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }

    /// Change the planning config. Everything cached was computed under the
    /// old one, so the cache is cleared.
    pub fn set_config(&mut self, config: PlanningConfig) {
        if config != self.config {
            self.config = config;
            self.entries.clear();
        }
    }

    /// Cached report for the client, evaluating on a miss.
    pub fn get_or_evaluate(&mut self, client: &Client, as_of: Date) -> &ClientReport {
        let key = CacheKey::for_client(client, as_of);
        if self.entries.contains_key(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
            tracing::debug!(client = %client.id, %as_of, "evaluation cache miss");
        }

        let config = self.config;
        self.entries
            .entry(key)
            .or_insert_with(|| evaluate_client(client, as_of, &config))
    }

    /// Drop every cached report for a client. Returns how many were removed.
    pub fn invalidate_client(&mut self, client_id: &ClientId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| &key.client_id != client_id);
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!(client = %client_id, removed, "invalidated cached reports");
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
