use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::Result;

pub const STATUS_FIRING: &str = "firing";
pub const STATUS_RESOLVED: &str = "resolved";

/// Alertmanager webhook payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AlertBatch {
    #[serde(default, deserialize_with = "null_as_default")]
    pub alerts: Vec<Alert>,
    #[serde(default)]
    pub receiver: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "groupKey", default)]
    pub group_key: Option<String>,
    #[serde(rename = "groupLabels", default, deserialize_with = "null_as_default")]
    pub group_labels: HashMap<String, String>,
    #[serde(rename = "commonLabels", default, deserialize_with = "null_as_default")]
    pub common_labels: HashMap<String, String>,
    #[serde(rename = "commonAnnotations", default, deserialize_with = "null_as_default")]
    pub common_annotations: HashMap<String, String>,
    #[serde(rename = "externalURL", default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(rename = "truncatedAlerts", default)]
    pub truncated_alerts: Option<u64>,
}

impl AlertBatch {
    pub fn decode(raw: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(raw)?)
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Alert {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub annotations: HashMap<String, String>,
    #[serde(rename = "startsAt", default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(rename = "endsAt", default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(rename = "generatorURL", default, deserialize_with = "null_as_default")]
    pub generator_url: String,
    #[serde(default)]
    pub fingerprint: Option<String>,
}

impl Alert {
    /// Label value, or `""` when unset.
    pub fn label(&self, key: &str) -> &str {
        self.labels.get(key).map(String::as_str).unwrap_or("")
    }

    /// Annotation value, or `""` when unset.
    pub fn annotation(&self, key: &str) -> &str {
        self.annotations.get(key).map(String::as_str).unwrap_or("")
    }

    /// True only when the annotation is exactly `"true"`.
    pub fn flag(&self, key: &str) -> bool {
        self.annotation(key) == "true"
    }

    pub fn alert_name(&self) -> &str {
        self.label("alertname")
    }

    pub fn severity(&self) -> &str {
        self.label("severity")
    }

    pub fn is_resolved(&self) -> bool {
        self.status == STATUS_RESOLVED
    }
}

/// Decodes an explicit `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
