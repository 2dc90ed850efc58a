//! Asynchronous component service.

use crate::models::{Component, ComponentEnvelope, PatchComponent};
use crate::Result;
use statuspage_core::client::{HttpTransport, Method, ReqwestTransport, StatusCode};
use statuspage_core::wire::path_segment;
use statuspage_core::{StatusPageConfig, TransportRequest};
use std::sync::Arc;
use tracing::{debug, warn};

/// Reads and updates the components of one status page.
#[derive(Clone)]
pub struct ComponentsService {
    transport: Arc<dyn HttpTransport>,
    page_id: String,
}

impl ComponentsService {
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

    /// List every component of the page in display order as returned by the API.
    ///
    /// # Errors
    ///
    /// Returns an error on a non-success status or an unparseable body.
    pub async fn list_components(&self) -> Result<Vec<Component>> {
        let path = format!("pages/{}/components", self.page_id);
        let response = self
            .transport
            .send(TransportRequest::get(path))
            .await?
            .error_for_status("Failed to list components")?;

        let components: Option<Vec<Component>> = response.parse_json("component list")?;
        Ok(components.unwrap_or_default())
    }

    /// Fetch a single component. Any non-success status yields `None`.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid id, a transport failure or an
    /// unparseable success body.
    pub async fn get_component(&self, component_id: &str) -> Result<Option<Component>> {
        let component_id = path_segment("component", component_id)?;
        let path = format!("pages/{}/components/{component_id}", self.page_id);
        let response = self.transport.send(TransportRequest::get(path)).await?;

        if response.status == StatusCode::NOT_FOUND {
            debug!(component_id, "Component not found");
            return Ok(None);
        }
        if !response.is_success() {
            warn!(
                component_id,
                status = response.status.as_u16(),
                body = %response.body,
                "Component lookup failed, treating as absent"
            );
            return Ok(None);
        }

        response.parse_json("component").map(Some)
    }

    /// Apply a partial update to a component.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid input, a non-success status or an
    /// unparseable body.
    pub async fn update_component(
        &self,
        component_id: &str,
        patch: &PatchComponent,
    ) -> Result<Component> {
        let component_id = path_segment("component", component_id)?;
        patch.validate()?;

        let path = format!("pages/{}/components/{component_id}", self.page_id);
        let request =
            TransportRequest::with_json(Method::PATCH, path, &ComponentEnvelope { component: patch })?;

        let response = self
            .transport
            .send(request)
            .await?
            .error_for_status("Failed to update component")?;

        response.parse_json("updated component")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ComponentStatus;
    use serde_json::json;
    use statuspage_core::client::MockHttpTransport;
    use statuspage_core::{Error, Patch, TransportResponse};

    fn component_json(id: &str, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "page_id": "page123",
            "name": "API",
            "position": 1,
            "status": status,
            "group": false,
            "showcase": true,
            "only_show_if_degraded": false
        })
    }

    fn service(mock: MockHttpTransport) -> ComponentsService {
        ComponentsService::new(Arc::new(mock), "page123").unwrap()
    }

    #[test]
    fn rejects_unsafe_page_id() {
        let result = ComponentsService::new(Arc::new(MockHttpTransport::new()), "a/b");
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn list_components_success() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .withf(|r| r.method == Method::GET && r.path == "pages/page123/components")
            .times(1)
            .returning(|_| {
                Ok(TransportResponse::new(
                    StatusCode::OK,
                    json!([component_json("a", "operational"), component_json("b", "major_outage")])
                        .to_string(),
                ))
            });

        let components = service(mock).list_components().await.unwrap();
        assert_eq!(components.len(), 2);
        assert_eq!(components[1].status, ComponentStatus::MajorOutage);
    }

    #[tokio::test]
    async fn list_components_raises_on_error_status() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .returning(|_| Ok(TransportResponse::new(StatusCode::UNAUTHORIZED, "denied")));

        let err = service(mock).list_components().await.unwrap_err();
        assert_eq!(err.status_code(), Some(401));
    }

    #[tokio::test]
    async fn get_component_absent_on_error_status() {
        for status in [StatusCode::NOT_FOUND, StatusCode::INTERNAL_SERVER_ERROR] {
            let mut mock = MockHttpTransport::new();
            mock.expect_send()
                .withf(|r| r.path == "pages/page123/components/missing")
                .returning(move |_| Ok(TransportResponse::new(status, "")));

            let result = service(mock).get_component("missing").await.unwrap();
            assert!(result.is_none());
        }
    }

    #[tokio::test]
    async fn get_component_rejects_empty_id_without_request() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send().never();

        let err = service(mock).get_component("").await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn update_component_sends_only_touched_fields() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .withf(|r| {
                r.method == Method::PATCH
                    && r.path == "pages/page123/components/a"
                    && r.body == Some(json!({"component": {"status": "degraded_performance"}}))
            })
            .times(1)
            .returning(|_| {
                Ok(TransportResponse::new(
                    StatusCode::OK,
                    component_json("a", "degraded_performance").to_string(),
                ))
            });

        let patch = PatchComponent {
            status: Patch::Set(ComponentStatus::DegradedPerformance),
            ..PatchComponent::default()
        };
        let component = service(mock).update_component("a", &patch).await.unwrap();
        assert_eq!(component.status, ComponentStatus::DegradedPerformance);
    }

    #[tokio::test]
    async fn update_component_parse_failure_is_distinct() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .returning(|_| Ok(TransportResponse::new(StatusCode::OK, "<html>oops</html>")));

        let patch = PatchComponent {
            name: Patch::Set("API v2".into()),
            ..PatchComponent::default()
        };
        let err = service(mock).update_component("a", &patch).await.unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }
}
