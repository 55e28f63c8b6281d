//! Session service: owns one `SessionStore` per user, talks to the upstream
//! sources, persists after every durable mutation and drives the soft-delete
//! settle timer.
//!
//! Every mutation for a user runs under that user's mutex. `analyze` releases
//! the lock while awaiting upstream data; the ticket issued before the await
//! decides whether the result may still be applied afterwards.
//!
//! Stores are kept in memory only while in use. Once a store is idle and no
//! request or settle task holds it, it is evicted and the next request
//! rebuilds it from the persisted record.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::analysis::run_analysis;
use crate::errors::AppError;
use crate::models::session::{AnalysisParams, AnalysisSession, SalaryTarget};
use crate::models::skill::SkillClass;
use crate::session::persistence::{SessionRepository, DECODE_OPERATION};
use crate::session::store::{RoadmapOutcome, SessionStore};
use crate::session::view::AnalysisSessionView;
use crate::sources::{CandidateSource, RequirementSource};

type SharedStore = Arc<Mutex<SessionStore>>;
type StoreMap = Arc<Mutex<HashMap<Uuid, SharedStore>>>;

/// Partial filter update. Absent fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterUpdate {
    pub role: Option<String>,
    pub category: Option<String>,
    pub experience_level: Option<String>,
}

/// Result of an `analyze` call. `applied` is set only when this request's
/// result became the current session (a newer request may have superseded it).
/// `persist_error` is set when the applied result could not be saved; it
/// still stands in memory.
#[derive(Debug)]
pub struct AnalyzeOutcome {
    pub view: AnalysisSessionView,
    pub applied: Option<AnalysisSession>,
    pub persist_error: Option<AppError>,
}

impl AnalyzeOutcome {
    fn unchanged(view: AnalysisSessionView) -> Self {
        Self {
            view,
            applied: None,
            persist_error: None,
        }
    }

    /// The view, or the persistence failure that has to be reported instead.
    pub fn into_view(self) -> Result<AnalysisSessionView, AppError> {
        match self.persist_error {
            Some(e) => Err(e),
            None => Ok(self.view),
        }
    }
}

pub struct SessionService {
    stores: StoreMap,
    repository: Arc<dyn SessionRepository>,
    requirements: Arc<dyn RequirementSource>,
    candidates: Arc<dyn CandidateSource>,
    settle_delay: Duration,
}

impl SessionService {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        requirements: Arc<dyn RequirementSource>,
        candidates: Arc<dyn CandidateSource>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            stores: Arc::new(Mutex::new(HashMap::new())),
            repository,
            requirements,
            candidates,
            settle_delay,
        }
    }

    /// Returns the user's store, rehydrating it from the repository on first use.
    ///
    /// The map stays locked across the load so an eviction cannot interleave
    /// with a rehydrate of the same user. An unreadable record yields an empty
    /// store carrying the error; the next durable mutation overwrites the record.
    async fn store_for(&self, user_id: Uuid) -> Result<SharedStore, AppError> {
        let mut stores = self.stores.lock().await;
        if let Some(store) = stores.get(&user_id) {
            return Ok(store.clone());
        }

        let store = match self.repository.load(user_id).await {
            Ok(Some(record)) => {
                debug!("Rehydrated session for user {user_id}");
                SessionStore::from_record(user_id, record)
            }
            Ok(None) => SessionStore::new(user_id),
            Err(AppError::PersistenceFailure { operation, message }) if operation == DECODE_OPERATION => {
                warn!("User {user_id}: stored session is unreadable, starting empty: {message}");
                let mut store = SessionStore::new(user_id);
                store.record_error(format!(
                    "The saved session could not be read and was reset: {message}"
                ));
                store
            }
            Err(e) => return Err(e),
        };

        let store = Arc::new(Mutex::new(store));
        stores.insert(user_id, store.clone());
        Ok(store)
    }

    /// Evicts the user's store when the caller holds the last outside reference
    /// and the store is idle. A store that is locked elsewhere is kept.
    async fn release(stores: &StoreMap, user_id: Uuid, store: SharedStore) {
        let mut map = stores.lock().await;
        // one reference in the map, one held by the caller
        if Arc::strong_count(&store) > 2 {
            return;
        }
        let idle = store.try_lock().map(|s| s.is_idle()).unwrap_or(false);
        if idle && map.get(&user_id).is_some_and(|s| Arc::ptr_eq(s, &store)) {
            map.remove(&user_id);
            debug!("User {user_id}: idle session store evicted");
        }
    }

    async fn persist(repository: &dyn SessionRepository, store: &mut SessionStore) -> Result<(), AppError> {
        if let Err(e) = repository.save(store.user_id(), &store.to_record()).await {
            store.record_error(e.to_string());
            return Err(e);
        }
        store.clear_error();
        Ok(())
    }

    pub async fn view(&self, user_id: Uuid) -> Result<AnalysisSessionView, AppError> {
        let store = self.store_for(user_id).await?;
        let view = store.lock().await.view();
        Self::release(&self.stores, user_id, store).await;
        Ok(view)
    }

    /// Runs a full analysis. Upstream failures leave the previous session in place.
    pub async fn analyze(&self, user_id: Uuid, params: AnalysisParams) -> Result<AnalyzeOutcome, AppError> {
        if params.role.trim().is_empty() {
            return Err(AppError::Validation("analyze: role cannot be empty".to_string()));
        }
        if params.candidate_id <= 0 {
            return Err(AppError::Validation(format!(
                "analyze: candidate id {} is invalid",
                params.candidate_id
            )));
        }

        let store = self.store_for(user_id).await?;
        let outcome = self.run_analysis_on(&store, user_id, &params).await;
        Self::release(&self.stores, user_id, store).await;
        outcome
    }

    async fn run_analysis_on(
        &self,
        store: &SharedStore,
        user_id: Uuid,
        params: &AnalysisParams,
    ) -> Result<AnalyzeOutcome, AppError> {
        let ticket = store.lock().await.begin_analysis(params);

        let fetched = tokio::try_join!(
            self.requirements.get_requirements(
                &params.role,
                params.category.as_deref(),
                params.experience_level.as_deref(),
            ),
            self.candidates.get_candidate_skills(params.candidate_id),
        );
        let result = fetched.and_then(|(requirements, candidate_skills)| {
            run_analysis(params, requirements, &candidate_skills)
        });

        let mut guard = store.lock().await;
        if !guard.complete_analysis(ticket, result)? {
            return Ok(AnalyzeOutcome::unchanged(guard.view()));
        }

        let persist_error = match Self::persist(self.repository.as_ref(), &mut guard).await {
            Ok(()) => {
                info!("User {user_id}: analysis for '{}' persisted", params.role);
                None
            }
            Err(e) => Some(e),
        };
        Ok(AnalyzeOutcome {
            view: guard.view(),
            applied: guard.session().cloned(),
            persist_error,
        })
    }

    /// Records the selection. Category and experience changes on an existing
    /// session re-run the analysis; a role change alone waits for `analyze`.
    pub async fn update_filters(
        &self,
        user_id: Uuid,
        update: FilterUpdate,
    ) -> Result<AnalyzeOutcome, AppError> {
        let store = self.store_for(user_id).await?;
        let mut guard = store.lock().await;
        let rerun = guard.update_selection(update.role, update.category, update.experience_level);
        let selected = Self::persist(self.repository.as_ref(), &mut guard)
            .await
            .map(|()| (rerun, guard.view()));
        drop(guard);
        Self::release(&self.stores, user_id, store).await;

        match selected? {
            (Some(params), _) => {
                debug!("User {user_id}: refinement changed, re-running analysis");
                self.analyze(user_id, params).await
            }
            (None, view) => Ok(AnalyzeOutcome::unchanged(view)),
        }
    }

    /// Marks the skill for removal and schedules the commit after the settle delay.
    /// The returned view still counts the skill, flagged as pending.
    pub async fn soft_delete(&self, user_id: Uuid, name: &str) -> Result<AnalysisSessionView, AppError> {
        let store = self.store_for(user_id).await?;
        let mut guard = store.lock().await;
        let marked = guard.soft_delete(name).map(|token| (token, guard.view()));
        drop(guard);
        let (token, view) = match marked {
            Ok(marked) => marked,
            Err(e) => {
                Self::release(&self.stores, user_id, store).await;
                return Err(e);
            }
        };

        let stores = self.stores.clone();
        let repository = self.repository.clone();
        let settle_delay = self.settle_delay;
        let name = name.trim().to_string();
        tokio::spawn(async move {
            tokio::time::sleep(settle_delay).await;
            {
                let mut guard = store.lock().await;
                if guard.commit_removal(&name, token) {
                    if let Err(e) = Self::persist(repository.as_ref(), &mut guard).await {
                        error!("User {user_id}: removal of '{name}' not persisted: {e}");
                    }
                }
            }
            Self::release(&stores, user_id, store).await;
        });

        Ok(view)
    }

    pub async fn toggle_favorite(&self, user_id: Uuid, name: &str) -> Result<AnalysisSessionView, AppError> {
        let store = self.store_for(user_id).await?;
        let mut guard = store.lock().await;
        let result = match guard.toggle_favorite(name) {
            Ok(is_favorite) => {
                debug!("User {user_id}: '{}' favorite = {is_favorite}", name.trim());
                Self::persist(self.repository.as_ref(), &mut guard)
                    .await
                    .map(|()| guard.view())
            }
            Err(e) => Err(e),
        };
        drop(guard);
        Self::release(&self.stores, user_id, store).await;
        result
    }

    pub async fn set_salary_target(
        &self,
        user_id: Uuid,
        target: Option<SalaryTarget>,
    ) -> Result<AnalysisSessionView, AppError> {
        let store = self.store_for(user_id).await?;
        let mut guard = store.lock().await;
        let result = match guard.set_salary_target(target) {
            Ok(()) => Self::persist(self.repository.as_ref(), &mut guard)
                .await
                .map(|()| guard.view()),
            Err(e) => Err(e),
        };
        drop(guard);
        Self::release(&self.stores, user_id, store).await;
        result
    }

    pub async fn clear_all(&self, user_id: Uuid) -> Result<AnalysisSessionView, AppError> {
        let store = self.store_for(user_id).await?;
        let mut guard = store.lock().await;
        guard.clear_all();
        let result = Self::persist(self.repository.as_ref(), &mut guard)
            .await
            .map(|()| guard.view());
        drop(guard);
        Self::release(&self.stores, user_id, store).await;
        result
    }

    /// Creates a roadmap for the skill. When `is_improvement` is not given it is
    /// inferred from the skill's class in the current session.
    pub async fn request_roadmap(
        &self,
        user_id: Uuid,
        skill: &str,
        is_improvement: Option<bool>,
    ) -> Result<RoadmapOutcome, AppError> {
        let store = self.store_for(user_id).await?;
        let mut guard = store.lock().await;
        let is_improvement = is_improvement.unwrap_or_else(|| {
            guard
                .session()
                .and_then(|s| s.find_skill(skill))
                .is_some_and(|s| s.class == SkillClass::Improve)
        });

        let result = match guard.request_roadmap(skill, is_improvement) {
            Ok(outcome) if outcome.created => Self::persist(self.repository.as_ref(), &mut guard)
                .await
                .map(|()| outcome),
            other => other,
        };
        drop(guard);
        Self::release(&self.stores, user_id, store).await;
        result
    }

    #[cfg(test)]
    async fn cached_users(&self) -> usize {
        self.stores.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::normalize::RawRequirement;
    use crate::models::skill::{CandidateSkill, SalaryImpact};
    use crate::session::persistence::InMemorySessionRepository;
    use crate::sources::fakes::{StaticCandidates, StaticRequirements};

    const SETTLE: Duration = Duration::from_millis(300);

    fn raw(name: &str, required: u32, demand: u32, impact: &str) -> RawRequirement {
        RawRequirement {
            name: Some(name.to_string()),
            required_proficiency: Some(required as f64),
            market_demand: Some(demand as f64),
            salary_impact: Some(SalaryImpact::from(impact)),
            ..Default::default()
        }
    }

    fn devops() -> Vec<RawRequirement> {
        vec![
            raw("Kubernetes", 4, 90, "₹5.0L"),
            raw("React", 3, 95, "₹2.0L"),
            raw("Terraform", 3, 70, "₹3.0L"),
            raw("Go", 4, 85, "₹4.0L"),
        ]
    }

    fn candidate() -> StaticCandidates {
        StaticCandidates(vec![
            CandidateSkill {
                name: "React".to_string(),
                proficiency_level: 4,
                last_used: None,
            },
            CandidateSkill {
                name: "Go".to_string(),
                proficiency_level: 2,
                last_used: None,
            },
        ])
    }

    fn params(role: &str) -> AnalysisParams {
        AnalysisParams {
            candidate_id: 7,
            role: role.to_string(),
            category: None,
            experience_level: None,
        }
    }

    fn service_with(
        repository: Arc<InMemorySessionRepository>,
        requirements: Arc<StaticRequirements>,
    ) -> Arc<SessionService> {
        Arc::new(SessionService::new(
            repository,
            requirements,
            Arc::new(candidate()),
            SETTLE,
        ))
    }

    fn service() -> (Arc<SessionService>, Arc<InMemorySessionRepository>, Arc<StaticRequirements>) {
        let repository = Arc::new(InMemorySessionRepository::default());
        let requirements = Arc::new(
            StaticRequirements::default()
                .with_role("DevOps Engineer", devops())
                .with_role("Data Engineer", vec![raw("Spark", 3, 80, "₹3.5L")]),
        );
        (
            service_with(repository.clone(), requirements.clone()),
            repository,
            requirements,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_soft_delete_checkpoints_around_settle_delay() {
        let (service, repository, _) = service();
        let user = Uuid::new_v4();
        service.analyze(user, params("DevOps Engineer")).await.unwrap();

        let view = service.soft_delete(user, "Kubernetes").await.unwrap();
        assert_eq!(view.critical_gaps.len(), 2);
        assert_eq!(view.pending_removal, vec!["Kubernetes".to_string()]);

        // Before the settle delay: still counted and included in salary
        tokio::time::sleep(SETTLE / 2).await;
        let view = service.view(user).await.unwrap();
        assert_eq!(view.critical_gaps.len(), 2);
        assert!((view.total_salary_impact - 12.0).abs() < 1e-9);
        assert!(view.deleted.is_empty());

        // After: excluded and persisted
        tokio::time::sleep(SETTLE).await;
        let view = service.view(user).await.unwrap();
        assert_eq!(view.critical_gaps.len(), 1);
        assert!((view.total_salary_impact - 7.0).abs() < 1e-9);
        assert_eq!(view.deleted, vec!["Kubernetes".to_string()]);
        assert!(view.pending_removal.is_empty());
        assert!(repository.stored(user).unwrap().deletion_ledger.contains("Kubernetes"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_all_during_settle_cancels_removal() {
        let (service, _, _) = service();
        let user = Uuid::new_v4();
        service.analyze(user, params("DevOps Engineer")).await.unwrap();
        service.soft_delete(user, "Kubernetes").await.unwrap();

        service.clear_all(user).await.unwrap();
        tokio::time::sleep(SETTLE * 2).await;

        let view = service.view(user).await.unwrap();
        assert!(view.deleted.is_empty());
        assert_eq!(view.overall_match_score, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_analyze_request_wins() {
        let repository = Arc::new(InMemorySessionRepository::default());
        let requirements = Arc::new(
            StaticRequirements::default()
                .with_delayed_role("DevOps Engineer", devops(), Duration::from_millis(500))
                .with_delayed_role(
                    "Data Engineer",
                    vec![raw("Spark", 3, 80, "₹3.5L")],
                    Duration::from_millis(10),
                ),
        );
        let service = service_with(repository, requirements);
        let user = Uuid::new_v4();

        let slow = {
            let service = service.clone();
            tokio::spawn(async move { service.analyze(user, params("DevOps Engineer")).await })
        };
        tokio::time::sleep(Duration::from_millis(1)).await;

        let fast = service.analyze(user, params("Data Engineer")).await.unwrap();
        assert!(fast.applied.is_some());

        let slow = slow.await.unwrap().unwrap();
        assert!(slow.applied.is_none());

        let view = service.view(user).await.unwrap();
        assert_eq!(view.target_role.as_deref(), Some("Data Engineer"));
        assert!(!view.is_loading);
    }

    #[tokio::test]
    async fn test_upstream_failure_keeps_previous_session() {
        let (service, _, requirements) = service();
        let user = Uuid::new_v4();
        service.analyze(user, params("DevOps Engineer")).await.unwrap();

        requirements.set_unavailable(true);
        let err = service.analyze(user, params("Data Engineer")).await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamUnavailable { .. }));

        let view = service.view(user).await.unwrap();
        assert_eq!(view.target_role.as_deref(), Some("DevOps Engineer"));
        assert_eq!(view.critical_gaps.len(), 2);
        assert!(view.error.is_some());
        assert!(!view.is_loading);
    }

    #[tokio::test]
    async fn test_unknown_role_is_not_found_and_session_kept() {
        let (service, _, _) = service();
        let user = Uuid::new_v4();
        service.analyze(user, params("DevOps Engineer")).await.unwrap();

        let err = service.analyze(user, params("Astronaut")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(
            service.view(user).await.unwrap().target_role.as_deref(),
            Some("DevOps Engineer")
        );
    }

    #[tokio::test]
    async fn test_invalid_analyze_params_are_rejected() {
        let (service, _, _) = service();
        let user = Uuid::new_v4();
        let mut bad = params(" ");
        assert!(matches!(
            service.analyze(user, bad.clone()).await,
            Err(AppError::Validation(_))
        ));
        bad.role = "DevOps Engineer".to_string();
        bad.candidate_id = 0;
        assert!(matches!(service.analyze(user, bad).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_in_memory_state() {
        let (service, repository, _) = service();
        let user = Uuid::new_v4();
        service.analyze(user, params("DevOps Engineer")).await.unwrap();

        repository.set_fail_writes(true);
        let err = service.toggle_favorite(user, "React").await.unwrap_err();
        assert!(matches!(err, AppError::PersistenceFailure { .. }));

        let view = service.view(user).await.unwrap();
        assert_eq!(view.favorites, vec!["React".to_string()]);
        assert!(view.error.unwrap().contains("persist"));
        assert!(repository.stored(user).unwrap().favorite_ledger.is_empty());
    }

    #[tokio::test]
    async fn test_successful_write_clears_recorded_persistence_error() {
        let (service, repository, _) = service();
        let user = Uuid::new_v4();
        service.analyze(user, params("DevOps Engineer")).await.unwrap();

        repository.set_fail_writes(true);
        assert!(service.toggle_favorite(user, "React").await.is_err());
        assert!(service.view(user).await.unwrap().error.is_some());

        repository.set_fail_writes(false);
        let view = service.toggle_favorite(user, "Go").await.unwrap();
        assert!(view.error.is_none());
        // the earlier in-memory change is saved along with the new one
        let stored = repository.stored(user).unwrap();
        assert!(stored.favorite_ledger.contains("React"));
        assert!(stored.favorite_ledger.contains("Go"));
    }

    #[tokio::test]
    async fn test_unsaved_analysis_is_still_reported_as_applied() {
        let (service, repository, _) = service();
        let user = Uuid::new_v4();
        repository.set_fail_writes(true);

        let outcome = service.analyze(user, params("DevOps Engineer")).await.unwrap();
        assert_eq!(outcome.applied.as_ref().unwrap().target_role, "DevOps Engineer");
        assert!(matches!(
            outcome.persist_error,
            Some(AppError::PersistenceFailure { .. })
        ));
        assert!(matches!(outcome.into_view(), Err(AppError::PersistenceFailure { .. })));

        // in memory the analysis stands
        let view = service.view(user).await.unwrap();
        assert_eq!(view.target_role.as_deref(), Some("DevOps Engineer"));
        assert!(repository.stored(user).is_none());
    }

    #[tokio::test]
    async fn test_unreadable_record_starts_empty_and_clear_all_overwrites_it() {
        let (service, repository, _) = service();
        let user = Uuid::new_v4();
        repository.insert_raw(user, "{not json");

        let view = service.view(user).await.unwrap();
        assert!(view.target_role.is_none());
        assert!(view.error.unwrap().contains("could not be read"));

        let view = service.clear_all(user).await.unwrap();
        assert!(view.error.is_none());
        let stored = repository.stored(user).unwrap();
        assert!(stored.analysis_session.is_none());

        service.analyze(user, params("DevOps Engineer")).await.unwrap();
        assert!(repository.stored(user).unwrap().analysis_session.is_some());
    }

    #[tokio::test]
    async fn test_future_schema_record_does_not_lock_user_out() {
        let (service, repository, _) = service();
        let user = Uuid::new_v4();
        repository.insert_raw(user, r#"{"schema_version": 9, "analysis_session": null}"#);

        let view = service.toggle_favorite(user, "Rust").await.unwrap();
        assert_eq!(view.favorites, vec!["Rust".to_string()]);
        assert_eq!(
            repository.stored(user).unwrap().schema_version,
            crate::session::persistence::SCHEMA_VERSION
        );
    }

    #[tokio::test]
    async fn test_unreachable_store_is_an_error_not_a_reset() {
        let (service, repository, _) = service();
        let user = Uuid::new_v4();
        service.analyze(user, params("DevOps Engineer")).await.unwrap();

        repository.set_fail_reads(true);
        assert!(matches!(
            service.clear_all(user).await,
            Err(AppError::PersistenceFailure { .. })
        ));
        assert_eq!(service.cached_users().await, 0);

        repository.set_fail_reads(false);
        assert!(repository.stored(user).unwrap().analysis_session.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_stores_are_evicted() {
        let (service, repository, _) = service();
        let user = Uuid::new_v4();

        service.analyze(user, params("DevOps Engineer")).await.unwrap();
        service.toggle_favorite(user, "Go").await.unwrap();
        assert_eq!(service.cached_users().await, 0);

        // a pending removal pins the store until the settle task commits it
        service.soft_delete(user, "Kubernetes").await.unwrap();
        assert_eq!(service.cached_users().await, 1);
        tokio::time::sleep(SETTLE * 2).await;
        assert_eq!(service.cached_users().await, 0);

        let view = service.view(user).await.unwrap();
        assert_eq!(view.deleted, vec!["Kubernetes".to_string()]);
        assert_eq!(view.favorites, vec!["Go".to_string()]);

        // unsaved state is kept in memory
        repository.set_fail_writes(true);
        assert!(service.toggle_favorite(user, "React").await.is_err());
        assert_eq!(service.cached_users().await, 1);
        assert_eq!(service.view(user).await.unwrap().favorites.len(), 2);
    }

    #[tokio::test]
    async fn test_many_users_do_not_accumulate() {
        let (service, _, _) = service();
        for _ in 0..50 {
            let user = Uuid::new_v4();
            service.analyze(user, params("Data Engineer")).await.unwrap();
            service.view(user).await.unwrap();
        }
        assert_eq!(service.cached_users().await, 0);
    }

    #[tokio::test]
    async fn test_session_survives_restart() {
        let (service, repository, requirements) = service();
        let user = Uuid::new_v4();
        service.analyze(user, params("DevOps Engineer")).await.unwrap();
        service.toggle_favorite(user, "Go").await.unwrap();
        service.request_roadmap(user, "Kubernetes", None).await.unwrap();

        let restarted = service_with(repository, requirements);
        let view = restarted.view(user).await.unwrap();
        assert_eq!(view.target_role.as_deref(), Some("DevOps Engineer"));
        assert_eq!(view.favorites, vec!["Go".to_string()]);

        let again = restarted.request_roadmap(user, "kubernetes", None).await.unwrap();
        assert!(!again.created);
        assert!(again.warning.is_some());
    }

    #[tokio::test]
    async fn test_v1_record_is_rehydrated() {
        let (service, repository, _) = service();
        let user = Uuid::new_v4();
        repository.insert_raw(
            user,
            r#"{"analysis_session": null, "deleted_skills": ["Go"], "favorite_skills": ["React"]}"#,
        );

        let view = service.view(user).await.unwrap();
        assert_eq!(view.deleted, vec!["Go".to_string()]);
        assert_eq!(view.favorites, vec!["React".to_string()]);
    }

    #[tokio::test]
    async fn test_refinement_reruns_analysis_but_role_change_does_not() {
        let (service, repository, _) = service();
        let user = Uuid::new_v4();
        service.analyze(user, params("DevOps Engineer")).await.unwrap();

        let outcome = service
            .update_filters(
                user,
                FilterUpdate {
                    role: Some("Data Engineer".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(outcome.applied.is_none());
        let stored = repository.stored(user).unwrap();
        assert_eq!(stored.analysis_session.unwrap().target_role, "DevOps Engineer");
        assert_eq!(stored.filters.role.as_deref(), Some("Data Engineer"));

        let outcome = service
            .update_filters(
                user,
                FilterUpdate {
                    category: Some("Data".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let applied = outcome.applied.expect("category change should re-run");
        assert_eq!(applied.target_role, "Data Engineer");
        assert_eq!(applied.category.as_deref(), Some("Data"));
        assert_eq!(outcome.view.target_role.as_deref(), Some("Data Engineer"));
    }

    #[tokio::test]
    async fn test_roadmap_kind_follows_skill_class() {
        let (service, _, _) = service();
        let user = Uuid::new_v4();
        service.analyze(user, params("DevOps Engineer")).await.unwrap();

        let go = service.request_roadmap(user, "Go", None).await.unwrap();
        assert!(go.roadmap.is_improvement);
        assert_eq!(go.roadmap.phases.len(), 3);

        let k8s = service.request_roadmap(user, "Kubernetes", None).await.unwrap();
        assert!(!k8s.roadmap.is_improvement);
        assert_eq!(k8s.roadmap.phases.len(), 4);
    }
}
