//! In-memory cache of read queries.
//!
//! Entries are keyed by [`QueryKey`]. A successful write to a collection drops
//! every cached read of that collection, list and single-item keys alike, plus
//! the overview which aggregates all of them.

use std::collections::HashMap;

use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Transactions,
    Budgets,
    Pots,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Transactions {
        category: Option<String>,
        recurring: Option<bool>,
    },
    Transaction(Uuid),
    Budgets,
    Budget(Uuid),
    Pots,
    Pot(Uuid),
    Overview,
}

impl QueryKey {
    /// Returns `true` if a write to `collection` makes this entry stale.
    fn depends_on(&self, collection: Collection) -> bool {
        match self {
            Self::Transactions { .. } | Self::Transaction(_) => {
                collection == Collection::Transactions
            }
            Self::Budgets | Self::Budget(_) => collection == Collection::Budgets,
            Self::Pots | Self::Pot(_) => collection == Collection::Pots,
            Self::Overview => true,
        }
    }
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: RwLock<HashMap<QueryKey, serde_json::Value>>,
}

impl QueryCache {
    pub async fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let entries = self.entries.read().await;
        let value = entries.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!(?key, "dropping unreadable cache entry: {err}");
                None
            }
        }
    }

    pub async fn insert<T: Serialize>(&self, key: QueryKey, value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.entries.write().await.insert(key, value);
            }
            Err(err) => tracing::debug!(?key, "not caching response: {err}"),
        }
    }

    pub async fn invalidate(&self, collection: Collection) {
        self.entries
            .write()
            .await
            .retain(|key, _| !key.depends_on(collection));
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
