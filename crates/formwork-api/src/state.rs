//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor: the frozen startup configuration and an
//! in-memory entry store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use formwork_config::Config;
use parking_lot::RwLock;
use serde::Serialize;
use uuid::Uuid;

use crate::config::ApiConfig;

/// Thread-safe, cloneable in-memory key-value store.
///
/// The lock is never held across an `.await`, so a synchronous
/// `parking_lot::RwLock` is sufficient.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// All records matching `keep`, in unspecified order.
    pub fn filter(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        self.data.read().values().filter(|v| keep(v)).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A recorded entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: Uuid,
    pub title: String,
    /// When the entry's event happened. Date-range filters apply to this.
    pub recorded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config<ApiConfig>,
    pub entries: Store<Entry>,
}

impl AppState {
    pub fn new(config: Config<ApiConfig>) -> Self {
        Self {
            config,
            entries: Store::new(),
        }
    }
}
