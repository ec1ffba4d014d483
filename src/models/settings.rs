//! Application settings stored as key / JSON value pairs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub key: String,
    #[schema(value_type = Object)]
    pub value: serde_json::Value,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<i32>,
}

/// Settings keyed by name
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SettingsMap(#[schema(value_type = Object)] pub BTreeMap<String, serde_json::Value>);

impl From<Vec<Setting>> for SettingsMap {
    fn from(rows: Vec<Setting>) -> Self {
        SettingsMap(rows.into_iter().map(|s| (s.key, s.value)).collect())
    }
}

impl SettingsMap {
    /// Keys are 1 to 100 characters of `[a-zA-Z0-9_.-]`
    pub fn validate_keys(&self) -> Result<(), AppError> {
        if self.0.is_empty() {
            return Err(AppError::BadRequest("No settings to update".to_string()));
        }
        for key in self.0.keys() {
            let valid = !key.is_empty()
                && key.len() <= 100
                && key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
            if !valid {
                return Err(AppError::Validation(format!("Invalid setting key: {}", key)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_keys() {
        let map: SettingsMap =
            serde_json::from_value(json!({"company.name": "Acme", "checkout.max_days": 14}))
                .unwrap();
        assert!(map.validate_keys().is_ok());

        let map: SettingsMap = serde_json::from_value(json!({"bad key": 1})).unwrap();
        assert!(matches!(map.validate_keys(), Err(AppError::Validation(_))));

        assert!(matches!(
            SettingsMap::default().validate_keys(),
            Err(AppError::BadRequest(_))
        ));
    }
}
