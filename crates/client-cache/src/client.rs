use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use accessgate_core_types::{
    ActorId, ApiError, Decision, Group, PersonId, PolicyInput, PolicyRequest, PolicyResult,
};

use crate::config::CacheConfig;
use crate::store::ExpiringCache;

/// Operations offered by a remote access-decision provider.
///
/// [`CachedAccessClient`] implements this trait as well, so callers can
/// treat the cache as a transparent substitute for the provider.
#[async_trait]
pub trait AccessClient: Send + Sync {
    /// Evaluates a single access question.
    async fn evaluate_policy(&self, input: &PolicyInput) -> Result<Decision, ApiError>;

    /// Evaluates a batch of access questions; every submitted request
    /// yields exactly one result carrying the same correlation id.
    async fn evaluate_policies(
        &self,
        requests: &[PolicyRequest],
    ) -> Result<Vec<PolicyResult>, ApiError>;

    /// Fetches the directory groups an actor belongs to.
    async fn fetch_groups(&self, actor: &ActorId) -> Result<Vec<Group>, ApiError>;

    /// Looks up the protected-person flag for one identity.
    async fn is_protected(&self, person: &PersonId) -> Result<bool, ApiError>;

    /// Looks up protected-person flags for several identities at once.
    async fn is_protected_bulk(
        &self,
        persons: &[PersonId],
    ) -> Result<HashMap<PersonId, bool>, ApiError>;
}

#[async_trait]
impl<C: AccessClient + ?Sized> AccessClient for Arc<C> {
    async fn evaluate_policy(&self, input: &PolicyInput) -> Result<Decision, ApiError> {
        (**self).evaluate_policy(input).await
    }

    async fn evaluate_policies(
        &self,
        requests: &[PolicyRequest],
    ) -> Result<Vec<PolicyResult>, ApiError> {
        (**self).evaluate_policies(requests).await
    }

    async fn fetch_groups(&self, actor: &ActorId) -> Result<Vec<Group>, ApiError> {
        (**self).fetch_groups(actor).await
    }

    async fn is_protected(&self, person: &PersonId) -> Result<bool, ApiError> {
        (**self).is_protected(person).await
    }

    async fn is_protected_bulk(
        &self,
        persons: &[PersonId],
    ) -> Result<HashMap<PersonId, bool>, ApiError> {
        (**self).is_protected_bulk(persons).await
    }
}

/// Cache-aside decorator over an [`AccessClient`].
///
/// Holds three independent expire-after-write stores. A store is
/// populated only from successful provider responses; failures pass
/// through uncached so the next call retries the provider. Concurrent
/// misses on the same key may each reach the provider; evaluation is
/// idempotent, so no single-flight deduplication is attempted.
pub struct CachedAccessClient<C> {
    inner: C,
    decisions: ExpiringCache<PolicyInput, Decision>,
    groups: ExpiringCache<ActorId, Vec<Group>>,
    protected: ExpiringCache<PersonId, bool>,
}

impl<C> CachedAccessClient<C> {
    /// Wraps a provider with the default 30-minute TTL per cache.
    pub fn new(inner: C) -> Self {
        Self::with_config(inner, CacheConfig::default())
    }

    pub fn with_config(inner: C, config: CacheConfig) -> Self {
        Self {
            inner,
            decisions: ExpiringCache::new(config.decision_ttl),
            groups: ExpiringCache::new(config.group_ttl),
            protected: ExpiringCache::new(config.protected_ttl),
        }
    }
}

#[async_trait]
impl<C: AccessClient> AccessClient for CachedAccessClient<C> {
    async fn evaluate_policy(&self, input: &PolicyInput) -> Result<Decision, ApiError> {
        if let Some(decision) = self.decisions.get(input) {
            debug!(target: "accessgate", "policy decision served from cache");
            return Ok(decision);
        }
        let decision = self.inner.evaluate_policy(input).await?;
        self.decisions.insert(input.clone(), decision.clone());
        Ok(decision)
    }

    async fn evaluate_policies(
        &self,
        requests: &[PolicyRequest],
    ) -> Result<Vec<PolicyResult>, ApiError> {
        let mut served = Vec::with_capacity(requests.len());
        let mut pending: Vec<PolicyRequest> = Vec::new();
        for request in requests {
            match self.decisions.get(&request.input) {
                Some(decision) => served.push(PolicyResult {
                    request_id: request.request_id,
                    decision,
                }),
                None => pending.push(request.clone()),
            }
        }
        debug!(
            target: "accessgate",
            served = served.len(),
            pending = pending.len(),
            "partitioned batch policy evaluation"
        );

        if pending.is_empty() {
            return Ok(served);
        }

        let fresh = self.inner.evaluate_policies(&pending).await?;
        if fresh.len() != pending.len() {
            return Err(ApiError::MissingResponse(format!(
                "submitted {} policy requests, provider answered {}",
                pending.len(),
                fresh.len()
            )));
        }

        let mut seen = HashSet::with_capacity(fresh.len());
        for result in &fresh {
            if !seen.insert(result.request_id) {
                return Err(ApiError::MissingResponse(format!(
                    "duplicate request id {} in provider response",
                    result.request_id
                )));
            }
            let request = pending
                .iter()
                .find(|request| request.request_id == result.request_id)
                .ok_or_else(|| {
                    ApiError::MissingResponse(format!(
                        "no submitted request with id {}",
                        result.request_id
                    ))
                })?;
            self.decisions
                .insert(request.input.clone(), result.decision.clone());
        }

        served.extend(fresh);
        Ok(served)
    }

    async fn fetch_groups(&self, actor: &ActorId) -> Result<Vec<Group>, ApiError> {
        if let Some(groups) = self.groups.get(actor) {
            debug!(target: "accessgate", "group membership served from cache");
            return Ok(groups);
        }
        let groups = self.inner.fetch_groups(actor).await?;
        self.groups.insert(*actor, groups.clone());
        Ok(groups)
    }

    async fn is_protected(&self, person: &PersonId) -> Result<bool, ApiError> {
        if let Some(flag) = self.protected.get(person) {
            debug!(target: "accessgate", "protected-person flag served from cache");
            return Ok(flag);
        }
        let flag = self.inner.is_protected(person).await?;
        self.protected.insert(person.clone(), flag);
        Ok(flag)
    }

    async fn is_protected_bulk(
        &self,
        persons: &[PersonId],
    ) -> Result<HashMap<PersonId, bool>, ApiError> {
        let mut resolved = HashMap::with_capacity(persons.len());
        let mut pending: Vec<PersonId> = Vec::new();
        for person in persons {
            match self.protected.get(person) {
                Some(flag) => {
                    resolved.insert(person.clone(), flag);
                }
                None => pending.push(person.clone()),
            }
        }
        debug!(
            target: "accessgate",
            cached = resolved.len(),
            pending = pending.len(),
            "partitioned protected-person bulk lookup"
        );

        if !pending.is_empty() {
            let fresh = self.inner.is_protected_bulk(&pending).await?;
            for (person, flag) in &fresh {
                self.protected.insert(person.clone(), *flag);
            }
            resolved.extend(fresh);
        }

        // The union must answer every requested identity; a partial map
        // would silently hide a provider omission.
        let missing = persons
            .iter()
            .filter(|person| !resolved.contains_key(*person))
            .count();
        if missing > 0 {
            return Err(ApiError::MissingResponse(format!(
                "provider response lacks protection flags for {missing} of {} requested persons",
                persons.len()
            )));
        }

        Ok(resolved)
    }
}
