//! Session state store: the per-user, persisted view-model of the gap analysis.
//!
//! Holds the last `AnalysisSession`, the active filters, the deletion and
//! favorite ledgers, active roadmaps, and the transient soft-delete state.
//! All methods are synchronous; the owning `SessionService` serializes access
//! and handles I/O.
//!
//! Invariants:
//! - the deletion ledger only grows, except through `clear_all`
//! - a deleted skill stays in the snapshot; it is hidden from derived views only
//! - an analysis result is applied only if its ticket is still the newest one

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::session::{AnalysisParams, AnalysisSession, Filters, SalaryTarget};
use crate::roadmap::generator::{build_roadmap, Roadmap};
use crate::session::ledger::SkillLedger;
use crate::session::persistence::{SessionRecord, SCHEMA_VERSION};
use crate::session::view::{build_view, AnalysisSessionView, ViewInputs};

/// Identifies one `analyze` request. Only the newest ticket may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTicket(u64);

/// Identifies one pending soft delete. Invalidated by `clear_all` or by a newer
/// soft delete of the same skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalToken(u64);

/// Result of a roadmap request.
#[derive(Debug, Clone, Serialize)]
pub struct RoadmapOutcome {
    pub roadmap: Roadmap,
    pub created: bool,
    pub warning: Option<String>,
}

pub struct SessionStore {
    user_id: Uuid,
    session: Option<AnalysisSession>,
    filters: Filters,
    deleted: SkillLedger,
    favorites: SkillLedger,
    roadmaps: BTreeMap<String, Roadmap>,
    pending_removals: HashMap<String, RemovalToken>,
    latest_ticket: u64,
    in_flight: Option<AnalysisTicket>,
    next_token: u64,
    last_error: Option<String>,
}

impl SessionStore {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            session: None,
            filters: Filters::default(),
            deleted: SkillLedger::default(),
            favorites: SkillLedger::default(),
            roadmaps: BTreeMap::new(),
            pending_removals: HashMap::new(),
            latest_ticket: 0,
            in_flight: None,
            next_token: 0,
            last_error: None,
        }
    }

    /// Rebuilds a store from its persisted record.
    pub fn from_record(user_id: Uuid, record: SessionRecord) -> Self {
        let mut store = Self::new(user_id);
        store.session = record.analysis_session;
        store.filters = record.filters;
        store.deleted = record.deletion_ledger;
        store.favorites = record.favorite_ledger;
        store.roadmaps = record
            .roadmaps
            .into_iter()
            .map(|r| (SkillLedger::key(&r.skill_name), r))
            .collect();
        store
    }

    /// Snapshot of everything that must survive a restart. Pending removals,
    /// in-flight analyses and errors are transient and not persisted.
    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            schema_version: SCHEMA_VERSION,
            analysis_session: self.session.clone(),
            deletion_ledger: self.deleted.clone(),
            favorite_ledger: self.favorites.clone(),
            filters: self.filters.clone(),
            roadmaps: self.roadmaps.values().cloned().collect(),
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn session(&self) -> Option<&AnalysisSession> {
        self.session.as_ref()
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_deleted(&self, name: &str) -> bool {
        self.deleted.contains(name)
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.favorites.contains(name)
    }

    pub fn is_pending_removal(&self, name: &str) -> bool {
        self.pending_removals.contains_key(&SkillLedger::key(name))
    }

    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    /// Starts an analysis: records the selection and issues a fresh ticket.
    /// Any ticket issued earlier becomes stale.
    pub fn begin_analysis(&mut self, params: &AnalysisParams) -> AnalysisTicket {
        self.latest_ticket += 1;
        let ticket = AnalysisTicket(self.latest_ticket);
        self.in_flight = Some(ticket);
        self.filters.candidate_id = Some(params.candidate_id);
        self.filters.role = Some(params.role.clone());
        self.filters.category = params.category.clone();
        self.filters.experience_level = params.experience_level.clone();
        debug!(
            "User {}: analysis {:?} started for role '{}'",
            self.user_id, ticket, params.role
        );
        ticket
    }

    /// Applies an analysis result. Returns `Ok(false)` when the ticket is stale
    /// and the result was discarded. On error the previous session stays intact.
    pub fn complete_analysis(
        &mut self,
        ticket: AnalysisTicket,
        result: Result<AnalysisSession, AppError>,
    ) -> Result<bool, AppError> {
        if ticket.0 != self.latest_ticket {
            debug!(
                "User {}: discarding stale analysis {:?} (latest is {})",
                self.user_id, ticket, self.latest_ticket
            );
            return Ok(false);
        }

        self.in_flight = None;
        match result {
            Ok(session) => {
                info!(
                    "User {}: analysis for '{}' applied ({} skills, score {})",
                    self.user_id,
                    session.target_role,
                    session.total_skills(),
                    session.overall_match_score
                );
                self.session = Some(session);
                self.last_error = None;
                Ok(true)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Updates the filter selection. Category and experience are refinements:
    /// changing either while results exist returns the parameters of the
    /// re-analysis to run. A role change alone only records the selection.
    pub fn update_selection(
        &mut self,
        role: Option<String>,
        category: Option<String>,
        experience_level: Option<String>,
    ) -> Option<AnalysisParams> {
        let mut refined = false;

        if let Some(role) = role.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()) {
            self.filters.role = Some(role);
        }
        if let Some(category) = category {
            if self.filters.category.as_deref() != Some(category.as_str()) {
                self.filters.category = Some(category);
                refined = true;
            }
        }
        if let Some(experience) = experience_level {
            if self.filters.experience_level.as_deref() != Some(experience.as_str()) {
                self.filters.experience_level = Some(experience);
                refined = true;
            }
        }

        let session = self.session.as_ref()?;
        if !refined {
            return None;
        }

        Some(AnalysisParams {
            candidate_id: self.filters.candidate_id.unwrap_or(session.candidate_id),
            role: self
                .filters
                .role
                .clone()
                .unwrap_or_else(|| session.target_role.clone()),
            category: self.filters.category.clone(),
            experience_level: self.filters.experience_level.clone(),
        })
    }

    /// Phase one of a soft delete: marks the skill as pending removal. The skill
    /// keeps counting in every aggregate until `commit_removal` is called with
    /// the returned token.
    pub fn soft_delete(&mut self, name: &str) -> Result<RemovalToken, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "soft_delete: skill name cannot be empty".to_string(),
            ));
        }
        let session = self.session.as_ref().ok_or_else(|| {
            AppError::NotFound(format!("soft_delete '{name}': no analysis results to delete from"))
        })?;
        if session.find_skill(name).is_none() {
            return Err(AppError::NotFound(format!(
                "soft_delete '{name}': skill is not part of the current analysis"
            )));
        }
        if self.is_deleted(name) {
            return Err(AppError::NotFound(format!(
                "soft_delete '{name}': skill was already removed"
            )));
        }

        self.next_token += 1;
        let token = RemovalToken(self.next_token);
        self.pending_removals.insert(SkillLedger::key(name), token);
        debug!("User {}: '{name}' pending removal ({token:?})", self.user_id);
        Ok(token)
    }

    /// Phase two of a soft delete. Returns `false` (and changes nothing) when the
    /// token was invalidated in the meantime.
    pub fn commit_removal(&mut self, name: &str, token: RemovalToken) -> bool {
        let key = SkillLedger::key(name);
        if self.pending_removals.get(&key) != Some(&token) {
            debug!(
                "User {}: ignoring stale removal {token:?} for '{name}'",
                self.user_id
            );
            return false;
        }

        self.pending_removals.remove(&key);
        let shown = self
            .session
            .as_ref()
            .and_then(|s| s.find_skill(name))
            .map(|s| s.name.clone())
            .unwrap_or_else(|| name.trim().to_string());
        self.deleted.insert(&shown);
        info!(
            "User {}: '{shown}' removed from view ({} removed in total)",
            self.user_id,
            self.deleted_count()
        );
        true
    }

    /// Flips the favorite flag and returns the new state. Never touches deletion.
    pub fn toggle_favorite(&mut self, name: &str) -> Result<bool, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "toggle_favorite: skill name cannot be empty".to_string(),
            ));
        }
        if self.favorites.remove(name) {
            Ok(false)
        } else {
            self.favorites.insert(name);
            Ok(true)
        }
    }

    pub fn set_salary_target(&mut self, target: Option<SalaryTarget>) -> Result<(), AppError> {
        if let Some(t) = &target {
            if !t.amount.is_finite() || t.amount <= 0.0 {
                return Err(AppError::Validation(format!(
                    "set_salary_target: amount {} must be a positive number",
                    t.amount
                )));
            }
            if t.currency.trim().is_empty() {
                return Err(AppError::Validation(
                    "set_salary_target: currency cannot be empty".to_string(),
                ));
            }
        }
        self.filters.salary_target = target;
        Ok(())
    }

    /// The only destructive operation: drops the session, both ledgers, filters
    /// and roadmaps, and invalidates every pending removal and in-flight analysis.
    pub fn clear_all(&mut self) {
        self.session = None;
        self.filters = Filters::default();
        self.deleted.clear();
        self.favorites.clear();
        self.roadmaps.clear();
        self.pending_removals.clear();
        self.latest_ticket += 1;
        self.in_flight = None;
        self.last_error = None;
        info!("User {}: session cleared", self.user_id);
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// True when nothing lives only in memory: no pending removal, no analysis
    /// in flight and no unreported error. An idle store can be dropped and
    /// rebuilt from its record.
    pub fn is_idle(&self) -> bool {
        self.pending_removals.is_empty() && self.in_flight.is_none() && self.last_error.is_none()
    }

    /// Creates a roadmap unless one is already active for this skill, in which
    /// case the existing roadmap is returned with a warning.
    pub fn request_roadmap(&mut self, name: &str, is_improvement: bool) -> Result<RoadmapOutcome, AppError> {
        let key = SkillLedger::key(name);
        if let Some(existing) = self.roadmaps.get(&key) {
            return Ok(RoadmapOutcome {
                roadmap: existing.clone(),
                created: false,
                warning: Some(format!(
                    "A roadmap for '{}' already exists; no new roadmap was created",
                    existing.skill_name
                )),
            });
        }

        let roadmap = build_roadmap(name, is_improvement)?;
        self.roadmaps.insert(key, roadmap.clone());
        info!(
            "User {}: roadmap created for '{}' ({} phases)",
            self.user_id,
            roadmap.skill_name,
            roadmap.phases.len()
        );
        Ok(RoadmapOutcome {
            roadmap,
            created: true,
            warning: None,
        })
    }

    pub fn roadmaps(&self) -> impl Iterator<Item = &Roadmap> {
        self.roadmaps.values()
    }

    pub fn view(&self) -> AnalysisSessionView {
        let is_pending = |name: &str| self.is_pending_removal(name);
        build_view(ViewInputs {
            session: self.session.as_ref(),
            filters: &self.filters,
            deleted: &self.deleted,
            favorites: &self.favorites,
            is_pending: &is_pending,
            is_loading: self.is_loading(),
            error: self.last_error.as_deref(),
        })
    }
}
