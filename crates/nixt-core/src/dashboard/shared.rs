//! Shared controller data: the snapshot admin pages publish for dashboard
//! widgets. Persisted wholesale, last writer wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedControllerData {
    #[serde(default)]
    pub clients: Vec<Value>,
    #[serde(default)]
    pub projects: Vec<Value>,
    #[serde(default)]
    pub transactions: Vec<Value>,
    #[serde(default)]
    pub activities: Vec<Value>,
    #[serde(default)]
    pub users: Vec<Value>,
    /// Empty string on the wire until the first update.
    #[serde(
        default,
        serialize_with = "serialize_last_updated",
        deserialize_with = "deserialize_last_updated"
    )]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Partial snapshot update. Only the provided lists are replaced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedDataUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clients: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<Value>>,
}

impl SharedControllerData {
    pub(crate) fn merge(&mut self, update: SharedDataUpdate, now: DateTime<Utc>) {
        if let Some(clients) = update.clients {
            self.clients = clients;
        }
        if let Some(projects) = update.projects {
            self.projects = projects;
        }
        if let Some(transactions) = update.transactions {
            self.transactions = transactions;
        }
        if let Some(activities) = update.activities {
            self.activities = activities;
        }
        if let Some(users) = update.users {
            self.users = users;
        }
        self.last_updated = Some(now);
    }
}

fn serialize_last_updated<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(ts) => serializer.serialize_str(&ts.to_rfc3339()),
        None => serializer.serialize_str(""),
    }
}

fn deserialize_last_updated<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(ts) => DateTime::parse_from_rfc3339(ts)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_last_updated_round_trip() {
        let data: SharedControllerData = serde_json::from_value(json!({
            "clients": [], "projects": [], "transactions": [],
            "activities": [], "users": [], "lastUpdated": ""
        }))
        .unwrap();
        assert!(data.last_updated.is_none());

        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["lastUpdated"], "");
    }

    #[test]
    fn test_merge_keeps_untouched_lists() {
        let mut data = SharedControllerData {
            clients: vec![json!({ "name": "Smart Innovation Company" })],
            ..Default::default()
        };

        let now = Utc::now();
        data.merge(
            SharedDataUpdate {
                projects: Some(vec![json!({ "id": "1", "progress": 75 })]),
                ..Default::default()
            },
            now,
        );

        assert_eq!(data.clients.len(), 1);
        assert_eq!(data.projects.len(), 1);
        assert_eq!(data.last_updated, Some(now));
    }
}
