use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use moka::future::Cache;

use crate::model::comparison::{ComparisonQuery, ComparisonResponse};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub employee_code: String,
    pub query: ComparisonQuery,
}

/// Invalidation counters observed before a comparison was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation {
    global: u64,
    employee: u64,
}

#[derive(Default)]
struct Generations {
    global: AtomicU64,
    per_employee: Mutex<HashMap<String, u64>>,
}

impl Generations {
    fn current(&self, employee_code: &str) -> Generation {
        let per_employee = self.per_employee.lock().unwrap_or_else(|e| e.into_inner());
        Generation {
            global: self.global.load(Ordering::SeqCst),
            employee: per_employee.get(employee_code).copied().unwrap_or(0),
        }
    }

    fn bump(&self, employee_code: &str) {
        let mut per_employee = self.per_employee.lock().unwrap_or_else(|e| e.into_inner());
        *per_employee.entry(employee_code.to_string()).or_insert(0) += 1;
    }

    fn bump_all(&self) {
        self.global.fetch_add(1, Ordering::SeqCst);
    }
}

/// Memoised comparisons, owned by application state.
///
/// Writers must call [`ComparisonCache::invalidate_employee`] after a commit
/// or delete and [`ComparisonCache::invalidate_all`] after loading an import.
/// Readers take a [`Generation`] before building a comparison and hand it to
/// [`ComparisonCache::insert`], which drops results an invalidation has
/// overtaken.
#[derive(Clone)]
pub struct ComparisonCache {
    inner: Cache<CacheKey, Arc<ComparisonResponse>>,
    generations: Arc<Generations>,
}

impl ComparisonCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(1_000)
                .time_to_live(ttl)
                .support_invalidation_closures()
                .build(),
            generations: Arc::new(Generations::default()),
        }
    }

    pub fn generation(&self, employee_code: &str) -> Generation {
        self.generations.current(employee_code)
    }

    pub async fn get(&self, key: &CacheKey) -> Option<Arc<ComparisonResponse>> {
        self.inner.get(key).await
    }

    /// Stores `value` unless the employee was invalidated after `seen` was
    /// taken. Returns whether the entry was kept.
    pub async fn insert(
        &self,
        key: CacheKey,
        value: Arc<ComparisonResponse>,
        seen: Generation,
    ) -> bool {
        if self.generation(&key.employee_code) != seen {
            return false;
        }
        self.inner.insert(key.clone(), value).await;

        // an invalidation may have landed between the check and the insert
        if self.generation(&key.employee_code) != seen {
            self.inner.invalidate(&key).await;
            return false;
        }
        true
    }

    pub fn invalidate_employee(&self, employee_code: &str) {
        self.generations.bump(employee_code);
        let code = employee_code.to_string();
        if let Err(e) = self
            .inner
            .invalidate_entries_if(move |key, _| key.employee_code == code)
        {
            tracing::warn!(error = %e, "Selective cache invalidation failed");
            self.inner.invalidate_all();
        }
    }

    pub fn invalidate_all(&self) {
        self.generations.bump_all();
        self.inner.invalidate_all();
    }
}
