use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{DashboardSummary, UserRecord};
use crate::risk;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    HttpStatus,
    NotFound,
    MalformedPayload,
}

impl From<&ApiError> for FailureKind {
    fn from(value: &ApiError) -> Self {
        match value {
            ApiError::Request { .. } => FailureKind::Network,
            ApiError::Status { .. } => FailureKind::HttpStatus,
            ApiError::NotFound(_) => FailureKind::NotFound,
            ApiError::Decode { .. } | ApiError::Ingest(_) => FailureKind::MalformedPayload,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready(DashboardSummary),
    Failed(FailureKind),
}

/// Identifies one in-flight fetch. Only the most recently issued token of a
/// scope may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    scope: Uuid,
    generation: u64,
}

#[derive(Debug)]
pub struct RequestScope {
    id: Uuid,
    generation: AtomicU64,
}

impl Default for RequestScope {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestScope {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            generation: AtomicU64::new(0),
        }
    }

    pub fn begin(&self) -> RequestToken {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        RequestToken {
            scope: self.id,
            generation,
        }
    }

    /// Invalidates every outstanding token.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.scope == self.id && token.generation == self.generation.load(Ordering::SeqCst)
    }
}

/// Dashboard stats panel: one load state fed by scoped fetches.
#[derive(Debug)]
pub struct Dashboard {
    scope: RequestScope,
    state: LoadState,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            scope: RequestScope::new(),
            state: LoadState::Loading,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn begin_fetch(&mut self) -> RequestToken {
        self.state = LoadState::Loading;
        self.scope.begin()
    }

    pub fn cancel(&self) {
        self.scope.cancel();
    }

    /// Applies a fetch result. Returns `false` when the token is stale and
    /// the result was dropped.
    pub fn complete(
        &mut self,
        token: RequestToken,
        result: Result<Vec<UserRecord>, ApiError>,
    ) -> bool {
        if !self.scope.is_current(token) {
            tracing::debug!(generation = token.generation, "discarding stale response");
            return false;
        }

        self.state = match result {
            Ok(users) => LoadState::Ready(risk::compute_dashboard_summary(&users)),
            Err(err) => {
                tracing::error!("Stats fetch failed: {}", err);
                LoadState::Failed(FailureKind::from(&err))
            }
        };
        true
    }
}
