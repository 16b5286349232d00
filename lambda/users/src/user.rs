use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::UserError;

/// A stored record: the DynamoDB attribute map for one user.
pub type Item = HashMap<String, AttributeValue>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub city: String,
}

impl User {
    /// Builds a user with the given id from a create request body.
    ///
    /// Only string values of the known fields are taken; anything else in
    /// the body, including an `id`, is ignored. Keys match without regard to
    /// ASCII case, with an exact match preferred. A body that is not a JSON
    /// object leaves every field but the id empty.
    pub fn from_request(id: String, body: &[u8]) -> (Self, Option<serde_json::Error>) {
        let mut user = User {
            id,
            ..Default::default()
        };

        let fields = match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(serde_json::Value::Object(fields)) => fields,
            Ok(_) => return (user, None),
            Err(e) => return (user, Some(e)),
        };

        let text = |key: &str| {
            fields
                .get(key)
                .or_else(|| {
                    fields
                        .iter()
                        .find(|(k, _)| k.eq_ignore_ascii_case(key))
                        .map(|(_, v)| v)
                })
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_default()
        };
        user.name = text("name");
        user.email = text("email");
        user.dob = text("dob");
        user.city = text("city");

        (user, None)
    }

    pub fn to_item(&self) -> Item {
        let mut item = HashMap::new();
        item.insert("id".to_string(), AttributeValue::S(self.id.clone()));

        for (key, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("dob", &self.dob),
            ("city", &self.city),
        ] {
            if !value.is_empty() {
                item.insert(key.to_string(), AttributeValue::S(value.clone()));
            }
        }

        item
    }
}

impl TryFrom<&Item> for User {
    type Error = UserError;

    fn try_from(item: &Item) -> Result<Self, Self::Error> {
        let id = match item.get("id") {
            Some(AttributeValue::S(id)) => id.clone(),
            Some(_) => {
                return Err(UserError::Serialization(
                    "attribute id is not a string".to_string(),
                ))
            }
            None => {
                return Err(UserError::Serialization(
                    "record is missing attribute id".to_string(),
                ))
            }
        };

        Ok(User {
            id,
            name: string_attr(item, "name")?,
            email: string_attr(item, "email")?,
            dob: string_attr(item, "dob")?,
            city: string_attr(item, "city")?,
        })
    }
}

// Missing and NULL attributes both read back as the empty string.
fn string_attr(item: &Item, key: &str) -> Result<String, UserError> {
    match item.get(key) {
        None | Some(AttributeValue::Null(_)) => Ok(String::new()),
        Some(AttributeValue::S(s)) => Ok(s.clone()),
        Some(_) => Err(UserError::Serialization(format!(
            "attribute {key} is not a string"
        ))),
    }
}
