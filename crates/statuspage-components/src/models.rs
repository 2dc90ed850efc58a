//! Component models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use statuspage_core::wire::null_as_default;
use statuspage_core::{wire_enum, Error, Patch, Result};
use std::fmt;

wire_enum! {
    /// Health status of a component.
    pub enum ComponentStatus {
        /// Working normally.
        Operational => "operational",
        /// Planned maintenance in progress.
        UnderMaintenance => "under_maintenance",
        /// Working, but slower than usual.
        DegradedPerformance => "degraded_performance",
        /// Some users affected.
        PartialOutage => "partial_outage",
        /// Unavailable.
        MajorOutage => "major_outage",
        /// No status set.
        Empty => "",
    }
}

impl Default for ComponentStatus {
    fn default() -> Self {
        Self::Empty
    }
}

impl ComponentStatus {
    /// Returns true for statuses that show the component as impaired.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(
            self,
            Self::DegradedPerformance | Self::PartialOutage | Self::MajorOutage
        )
    }
}

/// Representation of a component as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Component {
    /// Component identifier.
    pub id: String,
    /// Page identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_id: String,
    /// Identifier of the component group this component belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Whether this component is itself a group.
    #[serde(default, deserialize_with = "null_as_default")]
    pub group: bool,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display order on the page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: i32,
    /// Current status.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ComponentStatus,
    /// Whether the component is showcased.
    #[serde(default, deserialize_with = "null_as_default")]
    pub showcase: bool,
    /// Only show the component while it is degraded. Requires a feature flag
    /// on the page; not checked here.
    #[serde(default, deserialize_with = "null_as_default")]
    pub only_show_if_degraded: bool,
    /// Address for email automation. Requires a feature flag on the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automation_email: Option<String>,
    /// Date the component started being used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match &self.status {
            ComponentStatus::Empty => "unset",
            other => other.as_str(),
        };
        write!(f, "component {} \"{}\" [{status}]", self.id, self.name)?;
        if self.group {
            f.write_str(" (group)")?;
        }
        Ok(())
    }
}

/// Partial update for a component. Only fields that are not
/// [`Patch::Unset`] are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatchComponent {
    /// Display name.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub name: Patch<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub description: Patch<String>,
    /// Status.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub status: Patch<ComponentStatus>,
    /// Parent group.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub group_id: Patch<String>,
    /// Showcase flag.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub showcase: Patch<bool>,
    /// Only show while degraded.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub only_show_if_degraded: Patch<bool>,
    /// Start date.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub start_date: Patch<NaiveDate>,
}

impl PatchComponent {
    /// Returns true when no field would be sent.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_unset()
            && self.description.is_unset()
            && self.status.is_unset()
            && self.group_id.is_unset()
            && self.showcase.is_unset()
            && self.only_show_if_degraded.is_unset()
            && self.start_date.is_unset()
    }

    /// Reject values the API would refuse before any request is made.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] for an unknown status or a `null`
    /// name.
    pub fn validate(&self) -> Result<()> {
        if let Some(status) = self.status.value() {
            if !status.is_known() {
                return Err(Error::InvalidRequest(format!(
                    "Unknown component status `{status}`"
                )));
            }
        }
        if matches!(self.name, Patch::Null) {
            return Err(Error::InvalidRequest(
                "Component name cannot be cleared".to_string(),
            ));
        }
        Ok(())
    }
}

/// `{"component": {...}}` wrapper used on writes.
#[derive(Debug, Serialize)]
pub(crate) struct ComponentEnvelope<'a> {
    pub(crate) component: &'a PatchComponent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "id": "8kbf7d35c070",
            "page_id": "kctbh9vrtdwd",
            "group_id": null,
            "created_at": "2024-03-01T10:00:00Z",
            "updated_at": "2024-03-02T11:30:00.123Z",
            "group": false,
            "name": "API",
            "description": "Public REST API",
            "position": 1,
            "status": "partial_outage",
            "showcase": true,
            "only_show_if_degraded": false,
            "automation_email": "component+abc@notifications.statuspage.io",
            "start_date": "2024-01-15"
        })
    }

    #[test]
    fn component_deserializes() {
        let component: Component = serde_json::from_value(sample()).unwrap();
        assert_eq!(component.id, "8kbf7d35c070");
        assert_eq!(component.group_id, None);
        assert_eq!(component.status, ComponentStatus::PartialOutage);
        assert!(component.status.is_degraded());
        assert_eq!(component.position, 1);
        assert_eq!(
            component.start_date,
            Some(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
        assert!(component.updated_at.is_some());
    }

    #[test]
    fn component_round_trip_keeps_unset_status() {
        let mut component: Component = serde_json::from_value(sample()).unwrap();
        component.status = ComponentStatus::Empty;

        let value = serde_json::to_value(&component).unwrap();
        assert_eq!(value["status"], json!(""));

        let back: Component = serde_json::from_value(value).unwrap();
        assert_eq!(back, component);
    }

    #[test]
    fn component_tolerates_nulls_and_unknown_status() {
        let component: Component = serde_json::from_value(json!({
            "id": "abc",
            "name": null,
            "status": "exploded",
            "showcase": null
        }))
        .unwrap();
        assert_eq!(component.name, "");
        assert!(!component.showcase);
        assert_eq!(
            component.status,
            ComponentStatus::Unrecognized("exploded".to_string())
        );
    }

    #[test]
    fn component_display() {
        let component: Component = serde_json::from_value(sample()).unwrap();
        assert_eq!(
            component.to_string(),
            "component 8kbf7d35c070 \"API\" [partial_outage]"
        );
    }

    #[test]
    fn status_parses_strictly() {
        assert_eq!(
            "major_outage".parse::<ComponentStatus>().unwrap(),
            ComponentStatus::MajorOutage
        );
        assert_eq!("".parse::<ComponentStatus>().unwrap(), ComponentStatus::Empty);
        assert!("down".parse::<ComponentStatus>().is_err());
    }

    #[test]
    fn patch_component_sends_only_touched_fields() {
        let patch = PatchComponent {
            status: Patch::Set(ComponentStatus::Operational),
            description: Patch::Null,
            ..PatchComponent::default()
        };
        assert_eq!(
            serde_json::to_value(ComponentEnvelope { component: &patch }).unwrap(),
            json!({"component": {"status": "operational", "description": null}})
        );
    }

    #[test]
    fn patch_component_validation() {
        assert!(PatchComponent::default().is_empty());
        assert!(PatchComponent::default().validate().is_ok());

        let unknown = PatchComponent {
            status: Patch::Set(ComponentStatus::Unrecognized("down".into())),
            ..PatchComponent::default()
        };
        assert!(matches!(unknown.validate(), Err(Error::InvalidRequest(_))));

        let cleared_name = PatchComponent {
            name: Patch::Null,
            ..PatchComponent::default()
        };
        assert!(cleared_name.validate().is_err());
    }
}
