//! Correlation context for one demo playthrough.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::Span;
use uuid::Uuid;

/// Identifies one run of a scenario in the logs.
///
/// Every playback event recorded inside [`SessionContext::span`] carries
/// the session id, so a presenter's run can be pulled out of a shared log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    /// Unique session identifier.
    pub session_id: Uuid,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// Component that opened the session.
    pub source: String,
    /// Scenario being presented, once one is chosen.
    pub scenario_id: Option<String>,
}

impl SessionContext {
    /// Create a new session context.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            source: source.into(),
            scenario_id: None,
        }
    }

    /// Set the scenario id.
    #[must_use]
    pub fn with_scenario(mut self, scenario_id: impl Into<String>) -> Self {
        self.scenario_id = Some(scenario_id.into());
        self
    }

    /// Milliseconds since the session started.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        Utc::now()
            .signed_duration_since(self.started_at)
            .num_milliseconds()
    }

    /// First eight characters of the session id.
    #[must_use]
    pub fn short_id(&self) -> String {
        self.session_id.simple().to_string().chars().take(8).collect()
    }

    /// Create a tracing span with this context.
    #[must_use]
    pub fn span(&self) -> Span {
        tracing::info_span!(
            "demo_session",
            session_id = %self.session_id,
            source = %self.source,
            scenario = self.scenario_id.as_deref(),
        )
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new("unknown")
    }
}

/// Logs the start and end of a session.
///
/// The guard holds the span without entering it; instrument futures with
/// [`SessionGuard::span`] so the guard can live across `.await` points.
#[derive(Debug)]
pub struct SessionGuard {
    context: SessionContext,
    span: Span,
}

impl SessionGuard {
    /// Open the session span and log its start.
    #[must_use]
    pub fn new(context: SessionContext) -> Self {
        let span = context.span();
        span.in_scope(|| tracing::info!("Demo session started"));
        Self { context, span }
    }

    /// The session context.
    #[must_use]
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// The session span.
    #[must_use]
    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.context.elapsed_ms();
        self.span
            .in_scope(|| tracing::info!(elapsed_ms, "Demo session ended"));
    }
}
