//! Storage port for user records and its DynamoDB adapter.

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

use crate::error::StorageError;
use crate::user::Item;

/// Keyed table of user records. Every record is keyed by its string `id`.
#[async_trait]
pub trait UserTable: Send + Sync {
    /// Writes the record, replacing any record with the same id.
    async fn put(&self, item: Item) -> Result<(), StorageError>;

    async fn get(&self, id: &str) -> Result<Option<Item>, StorageError>;

    /// Returns every record in the table, in no particular order.
    async fn scan(&self) -> Result<Vec<Item>, StorageError>;

    /// Removes the record. Removing an unknown id is not an error.
    async fn delete(&self, id: &str) -> Result<(), StorageError>;
}

pub struct DynamoUserTable {
    client: Client,
    table_name: String,
}

impl DynamoUserTable {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

fn sdk_error<E: std::error::Error>(err: E) -> StorageError {
    StorageError::new(DisplayErrorContext(&err).to_string())
}

#[async_trait]
impl UserTable for DynamoUserTable {
    async fn put(&self, item: Item) -> Result<(), StorageError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(sdk_error)?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Item>, StorageError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(sdk_error)?;

        // An empty item means no user was found
        Ok(result.item.filter(|item| !item.is_empty()))
    }

    async fn scan(&self) -> Result<Vec<Item>, StorageError> {
        self.client
            .scan()
            .table_name(&self.table_name)
            .into_paginator()
            .items()
            .send()
            .try_collect()
            .await
            .map_err(sdk_error)
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(sdk_error)?;

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory table for tests. Set `fail_with` to make every call fail.
    #[derive(Default)]
    pub(crate) struct InMemoryUserTable {
        pub(crate) items: Mutex<HashMap<String, Item>>,
        pub(crate) fail_with: Option<String>,
        calls: AtomicUsize,
    }

    impl InMemoryUserTable {
        pub(crate) fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Default::default()
            }
        }

        pub(crate) fn with_items(items: Vec<Item>) -> Self {
            let table = Self::default();
            {
                let mut stored = table.items.lock().unwrap();
                for item in items {
                    let id = match item.get("id") {
                        Some(AttributeValue::S(id)) => id.clone(),
                        other => panic!("fixture item needs a string id, got {other:?}"),
                    };
                    stored.insert(id, item);
                }
            }
            table
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn len(&self) -> usize {
            self.items.lock().unwrap().len()
        }

        fn enter(&self) -> Result<(), StorageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(message) => Err(StorageError::new(message.clone())),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl UserTable for InMemoryUserTable {
        async fn put(&self, item: Item) -> Result<(), StorageError> {
            self.enter()?;
            let id = match item.get("id") {
                Some(AttributeValue::S(id)) => id.clone(),
                _ => return Err(StorageError::new("missing key attribute id")),
            };
            self.items.lock().unwrap().insert(id, item);
            Ok(())
        }

        async fn get(&self, id: &str) -> Result<Option<Item>, StorageError> {
            self.enter()?;
            Ok(self.items.lock().unwrap().get(id).cloned())
        }

        async fn scan(&self) -> Result<Vec<Item>, StorageError> {
            self.enter()?;
            Ok(self.items.lock().unwrap().values().cloned().collect())
        }

        async fn delete(&self, id: &str) -> Result<(), StorageError> {
            self.enter()?;
            self.items.lock().unwrap().remove(id);
            Ok(())
        }
    }

    #[test]
    #[should_panic(expected = "fixture item needs a string id")]
    fn with_items_rejects_unkeyed_records() {
        let mut item = Item::new();
        item.insert("name".to_string(), AttributeValue::S("Ann".to_string()));

        InMemoryUserTable::with_items(vec![item]);
    }
}
