//! Incident models and write payloads.
//!
//! [`Incident`] is the read shape. Writes use [`PostIncident`] and
//! [`PatchIncident`], which never carry server-assigned fields, wrapped in an
//! `{"incident": {...}}` envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use statuspage_components::{Component, ComponentStatus};
use statuspage_core::query::QueryParams;
use statuspage_core::wire::{null_as_default, path_segment};
use statuspage_core::{wire_enum, Error, Patch, Result};
use std::collections::BTreeMap;
use std::fmt;
use validator::Validate;

/// Default and maximum page size accepted by the incident history endpoint.
pub const MAX_HISTORY_LIMIT: u32 = 100;

wire_enum! {
    /// Lifecycle status of an incident or scheduled maintenance.
    pub enum IncidentStatus {
        /// The problem is being looked into.
        Investigating => "investigating",
        /// The cause is known.
        Identified => "identified",
        /// A fix is in place and being watched.
        Monitoring => "monitoring",
        /// The incident is over.
        Resolved => "resolved",
        /// Maintenance is planned.
        Scheduled => "scheduled",
        /// Maintenance is running.
        InProgress => "in_progress",
        /// Maintenance work is being verified.
        Verifying => "verifying",
        /// Maintenance is finished.
        Completed => "completed",
        /// A postmortem has been published.
        Postmortem => "postmortem",
    }
}

/// A missing or `null` status reads as an empty `Unrecognized` value.
impl Default for IncidentStatus {
    fn default() -> Self {
        Self::Unrecognized(String::new())
    }
}

impl IncidentStatus {
    /// Returns true for statuses used by scheduled maintenances.
    #[must_use]
    pub const fn is_maintenance(&self) -> bool {
        matches!(
            self,
            Self::Scheduled | Self::InProgress | Self::Verifying | Self::Completed
        )
    }
}

wire_enum! {
    /// Impact level of an incident.
    pub enum IncidentImpact {
        /// No impact.
        None => "none",
        /// Maintenance.
        Maintenance => "maintenance",
        /// Minor impact.
        Minor => "minor",
        /// Major impact.
        Major => "major",
        /// Critical impact.
        Critical => "critical",
    }
}

/// One entry of an incident's timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncidentUpdate {
    /// Update identifier.
    pub id: String,
    /// Owning incident.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<String>,
    /// Status the incident moved to with this update.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: IncidentStatus,
    /// Update text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Timestamp shown on the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_at: Option<DateTime<Utc>>,
    /// Whether subscribers were notified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deliver_notifications: Option<bool>,
}

/// Representation of an incident as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Incident {
    /// Incident identifier.
    pub id: String,
    /// Page identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_id: String,
    /// Incident title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Current status.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: IncidentStatus,
    /// Impact computed by the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<IncidentImpact>,
    /// Impact set explicitly by a user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_override: Option<IncidentImpact>,
    /// Text of the latest update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Short link to the incident page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortlink: Option<String>,
    /// Postmortem text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postmortem_body: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// When the incident started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// When the incident entered monitoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring_at: Option<DateTime<Utc>>,
    /// When the incident was resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    /// Start of a scheduled maintenance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
    /// End of a scheduled maintenance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_until: Option<DateTime<Utc>>,
    /// Components affected by the incident.
    #[serde(default, deserialize_with = "null_as_default")]
    pub components: Vec<Component>,
    /// Timeline of updates.
    #[serde(default, deserialize_with = "null_as_default")]
    pub incident_updates: Vec<IncidentUpdate>,
    /// Free-form metadata keyed by integration name.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Incident {
    /// Ids of the affected components.
    pub fn component_ids(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| c.id.as_str())
    }

    /// The most recently displayed update.
    #[must_use]
    pub fn latest_update(&self) -> Option<&IncidentUpdate> {
        self.incident_updates
            .iter()
            .max_by_key(|update| update.display_at.or(update.created_at))
    }
}

impl fmt::Display for Incident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "incident {} \"{}\" [{}]", self.id, self.name, self.status)?;
        match self.components.len() {
            0 => Ok(()),
            1 => f.write_str(" affecting 1 component"),
            n => write!(f, " affecting {n} components"),
        }
    }
}

/// Payload for creating an incident.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PostIncident {
    /// Incident title.
    pub name: String,
    /// Initial status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<IncidentStatus>,
    /// Impact override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_override: Option<IncidentImpact>,
    /// Text of the first update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Components to attach.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub component_ids: Vec<String>,
    /// Status to apply to attached components.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub components: BTreeMap<String, ComponentStatus>,
    /// Whether subscribers are notified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deliver_notifications: Option<bool>,
    /// Start of a scheduled maintenance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
    /// End of a scheduled maintenance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_until: Option<DateTime<Utc>>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl PostIncident {
    /// Start a payload with the given title.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the initial status.
    #[must_use]
    pub fn with_status(mut self, status: IncidentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the first update text.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach a component and set its status.
    #[must_use]
    pub fn with_component(mut self, component_id: impl Into<String>, status: ComponentStatus) -> Self {
        let component_id = component_id.into();
        if !self.component_ids.contains(&component_id) {
            self.component_ids.push(component_id.clone());
        }
        self.components.insert(component_id, status);
        self
    }

    /// Set whether subscribers are notified.
    #[must_use]
    pub const fn with_notifications(mut self, deliver: bool) -> Self {
        self.deliver_notifications = Some(deliver);
        self
    }

    /// Reject values the API would refuse before any request is made.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] for a blank name or unknown enum values.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidRequest("Incident name is required".to_string()));
        }
        check_known("incident status", self.status.as_ref())?;
        check_known_impact(self.impact_override.as_ref())?;
        check_component_statuses(&self.components)
    }
}

/// Partial update for an incident.
///
/// `id` is always sent. Every other field is only sent when it is not
/// [`Patch::Unset`], so the API leaves untouched fields as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatchIncident {
    /// Incident identifier.
    pub id: String,
    /// Incident title.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub name: Patch<String>,
    /// New status.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub status: Patch<IncidentStatus>,
    /// Impact override.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub impact_override: Patch<IncidentImpact>,
    /// Text of the update created by this patch.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub body: Patch<String>,
    /// Replacement set of attached components.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub component_ids: Patch<Vec<String>>,
    /// Component status overrides keyed by component id.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub components: Patch<BTreeMap<String, ComponentStatus>>,
    /// Whether subscribers are notified of this update.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub deliver_notifications: Patch<bool>,
    /// Start of a scheduled maintenance.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub scheduled_for: Patch<DateTime<Utc>>,
    /// End of a scheduled maintenance.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub scheduled_until: Patch<DateTime<Utc>>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub metadata: Patch<BTreeMap<String, serde_json::Value>>,
}

impl PatchIncident {
    /// Start an empty patch for `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Add a component status override.
    pub fn set_component_status(&mut self, component_id: impl Into<String>, status: ComponentStatus) {
        self.components
            .get_or_insert_default()
            .insert(component_id.into(), status);
    }

    /// Returns true when only the id would be sent.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_unset()
            && self.status.is_unset()
            && self.impact_override.is_unset()
            && self.body.is_unset()
            && self.component_ids.is_unset()
            && self.components.is_unset()
            && self.deliver_notifications.is_unset()
            && self.scheduled_for.is_unset()
            && self.scheduled_until.is_unset()
            && self.metadata.is_unset()
    }

    /// Reject values the API would refuse before any request is made.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] for an unusable id, a cleared name or
    /// unknown enum values.
    pub fn validate(&self) -> Result<()> {
        path_segment("incident", &self.id)?;
        if matches!(self.name, Patch::Null) {
            return Err(Error::InvalidRequest("Incident name cannot be cleared".to_string()));
        }
        check_known("incident status", self.status.value())?;
        check_known_impact(self.impact_override.value())?;
        match self.components.value() {
            Some(components) => check_component_statuses(components),
            None => Ok(()),
        }
    }

    /// Check that every status override targets a component of `incident`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] naming the first foreign component.
    pub fn check_overrides_against(&self, incident: &Incident) -> Result<()> {
        let Some(overrides) = self.components.value() else {
            return Ok(());
        };

        let attached: Vec<&str> = incident
            .component_ids()
            .chain(
                self.component_ids
                    .value()
                    .into_iter()
                    .flatten()
                    .map(String::as_str),
            )
            .collect();

        match overrides.keys().find(|id| !attached.contains(&id.as_str())) {
            Some(id) => Err(Error::InvalidRequest(format!(
                "Component `{id}` is not attached to incident `{}`",
                incident.id
            ))),
            None => Ok(()),
        }
    }
}

fn check_known(what: &str, status: Option<&IncidentStatus>) -> Result<()> {
    match status {
        Some(status) if !status.is_known() => {
            Err(Error::InvalidRequest(format!("Unknown {what} `{status}`")))
        }
        _ => Ok(()),
    }
}

fn check_known_impact(impact: Option<&IncidentImpact>) -> Result<()> {
    match impact {
        Some(impact) if !impact.is_known() => {
            Err(Error::InvalidRequest(format!("Unknown incident impact `{impact}`")))
        }
        _ => Ok(()),
    }
}

fn check_component_statuses(components: &BTreeMap<String, ComponentStatus>) -> Result<()> {
    for (id, status) in components {
        path_segment("component", id)?;
        if !status.is_known() {
            return Err(Error::InvalidRequest(format!(
                "Unknown component status `{status}` for component `{id}`"
            )));
        }
    }
    Ok(())
}

/// `{"incident": {...}}` wrapper used on writes.
#[derive(Debug, Serialize)]
pub(crate) struct IncidentEnvelope<'a, T: Serialize> {
    pub(crate) incident: &'a T,
}

/// Parameters for the incident history listing.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct IncidentHistoryParams {
    /// Free-text search over name, status, postmortem and updates.
    pub query: Option<String>,
    /// Rows per page.
    #[validate(range(min = 1, max = 100))]
    pub limit: u32,
    /// Page offset, starting at 1.
    #[validate(range(min = 1))]
    pub page: u32,
}

impl Default for IncidentHistoryParams {
    fn default() -> Self {
        Self {
            query: None,
            limit: MAX_HISTORY_LIMIT,
            page: 1,
        }
    }
}

impl IncidentHistoryParams {
    /// Search for `query`.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Set the page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Set the page offset.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Convert to query parameters; a blank query is left out.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push("limit", self.limit);
        params.push("page", self.page);
        params.push_opt("q", self.query.as_deref().filter(|q| !q.trim().is_empty()));
        params
    }
}

/// Options for resolving an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Set every attached component back to operational.
    pub set_components_operational: bool,
    /// Notify subscribers of the resolving update.
    pub deliver_notifications: bool,
}

impl ResolveOptions {
    /// Defaults: components set to operational, subscribers notified.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            set_components_operational: true,
            deliver_notifications: true,
        }
    }

    /// Choose whether attached components are set to operational.
    #[must_use]
    pub const fn with_components_operational(mut self, enabled: bool) -> Self {
        self.set_components_operational = enabled;
        self
    }

    /// Choose whether subscribers are notified.
    #[must_use]
    pub const fn with_notifications(mut self, deliver: bool) -> Self {
        self.deliver_notifications = deliver;
        self
    }
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self::new()
    }
}
