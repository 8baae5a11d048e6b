use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use onboard_core::Clock;
use onboard_core::defaults::{default_catalog, default_resources};
use onboard_core::merge::merge_group_selection;
use onboard_core::model::{Catalog, Resources, TaskId, UserId};
use storage::repository::{InMemoryRepository, ProgressRepository};

use crate::error::ChecklistError;
use crate::events::{ChecklistEvent, GroupTarget, RenderRequest};
use crate::home_view::{ViewDocument, build_home_view};

/// Orchestrates the checklist read-merge-write cycle.
///
/// This service is the only writer to the progress store. Handler
/// invocations may run concurrently; two toggles by the same user on
/// *different* groups can interleave read and write so that the earlier
/// write is lost. The home surface is single-user, so that race is accepted
/// instead of serialized away.
#[derive(Clone)]
pub struct ChecklistService {
    clock: Clock,
    catalog: Arc<Catalog>,
    resources: Resources,
    progress: Arc<dyn ProgressRepository>,
}

impl ChecklistService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<Catalog>,
        resources: Resources,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            clock,
            catalog,
            resources,
            progress,
        }
    }

    /// Service over the shipped catalog with an in-memory store.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(
            clock,
            Arc::new(default_catalog()),
            default_resources(),
            Arc::new(InMemoryRepository::new()),
        )
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Dispatches one inbound event and returns the full replacement view.
    ///
    /// # Errors
    ///
    /// Returns `ChecklistError::Storage` when the store cannot be reached;
    /// the caller publishes nothing and the previous view stays up.
    pub async fn handle(&self, event: &ChecklistEvent) -> Result<RenderRequest, ChecklistError> {
        let view = match event {
            ChecklistEvent::HomeOpened { user }
            | ChecklistEvent::MemberJoined { user }
            | ChecklistEvent::Refresh { user } => self.open_home(user).await?,
            ChecklistEvent::GroupToggle {
                user,
                group,
                selected,
            } => self.toggle_group(user, group, selected).await?,
        };

        Ok(RenderRequest {
            user: event.user().clone(),
            view,
        })
    }

    /// Ensures the user's rows exist and renders the current state.
    ///
    /// First contact with a user creates one `done = false` row per catalog
    /// task; later calls leave existing rows alone.
    ///
    /// # Errors
    ///
    /// Returns `ChecklistError::Storage` on store failures.
    pub async fn open_home(&self, user: &UserId) -> Result<ViewDocument, ChecklistError> {
        self.progress
            .ensure_user_rows(user, &self.catalog, self.clock.now())
            .await?;
        self.render(user).await
    }

    /// Applies one group's reported selection and renders the result.
    ///
    /// The platform reports only the acting group's checked values, so the
    /// stored state for every other group is carried over unchanged. An
    /// unknown group writes nothing and re-renders the current state.
    ///
    /// # Errors
    ///
    /// Returns `ChecklistError::Storage` on store failures; the write is
    /// all-or-nothing, so a failure leaves the prior state standing.
    pub async fn toggle_group(
        &self,
        user: &UserId,
        group: &GroupTarget,
        selected: &BTreeSet<TaskId>,
    ) -> Result<ViewDocument, ChecklistError> {
        let group = match group {
            GroupTarget::Known(name) => name,
            GroupTarget::Unknown(raw) => {
                warn!(
                    user = user.as_str(),
                    group = raw.as_str(),
                    "toggle for unknown group ignored"
                );
                self.progress
                    .ensure_user_rows(user, &self.catalog, self.clock.now())
                    .await?;
                return self.render(user).await;
            }
        };

        let current = self.progress.completed_ids(user).await?;
        let merged = merge_group_selection(&self.catalog, group, &current, selected);

        let now = self.clock.now();
        self.progress
            .ensure_user_rows(user, &self.catalog, now)
            .await?;
        self.progress
            .set_all(user, &self.catalog, &merged, now)
            .await?;

        debug!(
            user = user.as_str(),
            group = group.as_str(),
            completed = merged.len(),
            "group selection applied"
        );

        self.render(user).await
    }

    // The completed set is recomputed from the store for every render;
    // it is never cached across requests.
    async fn render(&self, user: &UserId) -> Result<ViewDocument, ChecklistError> {
        let completed = self.progress.completed_ids(user).await?;
        Ok(build_home_view(&self.catalog, &self.resources, &completed))
    }
}
