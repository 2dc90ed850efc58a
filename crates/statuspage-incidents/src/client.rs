//! Asynchronous incident service.

use crate::models::{
    Incident, IncidentEnvelope, IncidentHistoryParams, IncidentStatus, PatchIncident,
    PostIncident, ResolveOptions,
};
use crate::Result;
use statuspage_components::ComponentStatus;
use statuspage_core::client::{HttpTransport, Method, ReqwestTransport, StatusCode};
use statuspage_core::wire::path_segment;
use statuspage_core::{Patch, StatusPageConfig, TransportRequest};
use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::Validate;

/// Lists, reads, creates, updates and resolves the incidents of one page.
#[derive(Clone)]
pub struct IncidentsService {
    transport: Arc<dyn HttpTransport>,
    page_id: String,
}

impl IncidentsService {
    /// Create a service for `page_id` on top of an existing transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the page id cannot be used in a path.
    pub fn new(transport: Arc<dyn HttpTransport>, page_id: impl Into<String>) -> Result<Self> {
        let page_id = page_id.into();
        path_segment("page", &page_id)?;
        Ok(Self { transport, page_id })
    }

    /// Create a service talking to the API through [`ReqwestTransport`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &StatusPageConfig) -> Result<Self> {
        let transport = ReqwestTransport::from_config(config)?;
        Self::new(Arc::new(transport), config.page_id.clone())
    }

    /// Return the page this service manages.
    #[must_use]
    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    fn incidents_path(&self) -> String {
        format!("pages/{}/incidents", self.page_id)
    }

    /// List incidents that are not yet resolved.
    ///
    /// # Errors
    ///
    /// Returns an error on a non-success status or an unparseable body.
    pub async fn list_active_incidents(&self) -> Result<Vec<Incident>> {
        let path = format!("{}/unresolved", self.incidents_path());
        let response = self
            .transport
            .send(TransportRequest::get(path))
            .await?
            .error_for_status("Failed to list unresolved incidents")?;

        let incidents: Option<Vec<Incident>> = response.parse_json("unresolved incident list")?;
        Ok(incidents.unwrap_or_default())
    }

    /// Search past incidents.
    ///
    /// A non-success status is logged and yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error for out-of-range parameters, a transport failure or
    /// an unparseable success body.
    pub async fn list_incident_history(
        &self,
        params: &IncidentHistoryParams,
    ) -> Result<Vec<Incident>> {
        params.validate()?;

        let path = params.to_query().append_to(&self.incidents_path());
        let response = self.transport.send(TransportRequest::get(path)).await?;

        if !response.is_success() {
            warn!(
                page_id = %self.page_id,
                status = response.status.as_u16(),
                body = %response.body,
                "Incident history request failed, returning no incidents"
            );
            return Ok(Vec::new());
        }

        let incidents: Option<Vec<Incident>> = response.parse_json("incident history")?;
        Ok(incidents.unwrap_or_default())
    }

    /// Fetch a single incident. Any non-success status yields `None`.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid id, a transport failure or an
    /// unparseable success body.
    pub async fn get_incident(&self, incident_id: &str) -> Result<Option<Incident>> {
        let incident_id = path_segment("incident", incident_id)?;
        let path = format!("{}/{incident_id}", self.incidents_path());
        let response = self.transport.send(TransportRequest::get(path)).await?;

        if response.status == StatusCode::NOT_FOUND {
            debug!(incident_id, "Incident not found");
            return Ok(None);
        }
        if !response.is_success() {
            warn!(
                incident_id,
                status = response.status.as_u16(),
                body = %response.body,
                "Incident lookup failed, treating as absent"
            );
            return Ok(None);
        }

        response.parse_json("incident").map(Some)
    }

    /// Create an incident.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid input, a non-success status (carrying the
    /// status code and response body) or an unparseable body.
    pub async fn create_incident(&self, incident: &PostIncident) -> Result<Incident> {
        incident.validate()?;

        let request = TransportRequest::with_json(
            Method::POST,
            self.incidents_path(),
            &IncidentEnvelope { incident },
        )?;
        let response = self
            .transport
            .send(request)
            .await?
            .error_for_status("Failed to create incident")?;

        response.parse_json("created incident")
    }

    /// Apply a partial update to the incident named by `patch.id`.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid input, a non-success status or an
    /// unparseable body.
    pub async fn update_incident(&self, patch: &PatchIncident) -> Result<Incident> {
        patch.validate()?;

        let path = format!("{}/{}", self.incidents_path(), patch.id);
        let request =
            TransportRequest::with_json(Method::PATCH, path, &IncidentEnvelope { incident: patch })?;
        let response = self
            .transport
            .send(request)
            .await?
            .error_for_status("Failed to update incident")?;

        response.parse_json("updated incident")
    }

    /// Resolve an incident with a final update.
    ///
    /// Returns `None` without sending any update when the incident cannot be
    /// fetched. With [`ResolveOptions::set_components_operational`], every
    /// component attached to the incident is set back to operational in the
    /// same update.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid id, a transport failure, or a failed
    /// update.
    pub async fn resolve_incident(
        &self,
        incident_id: &str,
        body: &str,
        options: ResolveOptions,
    ) -> Result<Option<Incident>> {
        let Some(incident) = self.get_incident(incident_id).await? else {
            warn!(incident_id, "Cannot resolve incident that could not be fetched");
            return Ok(None);
        };

        let mut patch = PatchIncident {
            status: Patch::Set(IncidentStatus::Resolved),
            body: Patch::Set(body.to_string()),
            deliver_notifications: Patch::Set(options.deliver_notifications),
            ..PatchIncident::new(incident.id.clone())
        };

        if options.set_components_operational {
            for component_id in incident.component_ids() {
                patch.set_component_status(component_id, ComponentStatus::Operational);
            }
        }

        info!(
            incident_id = %incident.id,
            components = incident.components.len(),
            operational = options.set_components_operational,
            notify = options.deliver_notifications,
            "Resolving incident"
        );

        self.update_incident(&patch).await.map(Some)
    }
}
