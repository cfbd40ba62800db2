// Common name -> hierarchy lookup: cache check, name search, optional
// disambiguation, hierarchy fetch, cache store.

use crate::api::{ApiClient, Candidate};
use crate::cache::BoundedCache;
use crate::dedupe::dedupe_indices;
use crate::error::LookupError;
use crate::fetch::{HttpTransport, Sleeper, ThreadSleeper, Transport};
use crate::select::{disambiguate, Prompt};
use crate::taxonomy::Hierarchy;
use tracing::{debug, info};

/// Resolves common names to hierarchies, remembering successful lookups in
/// a FIFO cache keyed by the lowercased name. Failures are never cached.
pub struct Resolver<T = HttpTransport, S = ThreadSleeper> {
    client: ApiClient<T, S>,
    cache: BoundedCache<String, Hierarchy>,
}

/// Cache key for a user-typed name.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl<T: Transport, S: Sleeper> Resolver<T, S> {
    pub fn new(client: ApiClient<T, S>, cache_capacity: usize) -> Self {
        Resolver {
            client,
            cache: BoundedCache::new(cache_capacity),
        }
    }

    pub fn cache(&self) -> &BoundedCache<String, Hierarchy> {
        &self.cache
    }

    /// Every failure, whatever its cause, comes back as `None`; the cause is
    /// logged. Use [`Resolver::try_lookup`] to tell causes apart.
    pub fn lookup<P: Prompt + ?Sized>(&mut self, name: &str, prompt: &mut P) -> Option<Hierarchy> {
        match self.try_lookup(name, prompt) {
            Ok(hierarchy) => Some(hierarchy),
            Err(e) => {
                info!("Lookup for '{}' gave no result: {}", name, e);
                None
            }
        }
    }

    pub fn try_lookup<P: Prompt + ?Sized>(
        &mut self,
        name: &str,
        prompt: &mut P,
    ) -> Result<Hierarchy, LookupError> {
        let key = normalize_name(name);
        if key.is_empty() {
            return Err(LookupError::NotFound(key));
        }

        if let Some(hierarchy) = self.cache.get(&key) {
            info!("Found '{}' in cache", key);
            return Ok(hierarchy.clone());
        }

        let tsn = self.resolve_tsn(&key, prompt)?;
        debug!(tsn, "resolved identifier for '{}'", key);

        let entries = self
            .client
            .full_hierarchy(tsn)
            .ok_or(LookupError::Unavailable("fetching the hierarchy"))?;
        if entries.is_empty() {
            return Err(LookupError::NotFound(key));
        }

        let hierarchy = Hierarchy::from_entries(entries);
        self.cache.set(key, hierarchy.clone());
        Ok(hierarchy)
    }

    fn resolve_tsn<P: Prompt + ?Sized>(&self, key: &str, prompt: &mut P) -> Result<i64, LookupError> {
        let candidates = self
            .client
            .search_by_common_name(key)
            .ok_or(LookupError::Unavailable("searching by common name"))?;

        match candidates.as_slice() {
            [] => Err(LookupError::NotFound(key.to_string())),
            [only] => Ok(only.tsn),
            many => choose(many, key, prompt),
        }
    }
}

/// Shows the deduplicated names and maps the pick back to the candidate it
/// was first seen on.
fn choose<P: Prompt + ?Sized>(
    candidates: &[Candidate],
    key: &str,
    prompt: &mut P,
) -> Result<i64, LookupError> {
    let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
    let mut kept = dedupe_indices(&names);
    if kept.is_empty() {
        kept = (0..candidates.len()).collect();
    }
    let choices: Vec<String> = kept.iter().map(|&i| candidates[i].name.clone()).collect();

    match disambiguate(prompt, key, &choices)? {
        Some(pick) => Ok(candidates[kept[pick]].tsn),
        None => Err(LookupError::Cancelled),
    }
}
