//! DynamoDB implementation of link repository.
//!
//! # Table layout
//!
//! | Attribute   | Type | Role                        |
//! |-------------|------|-----------------------------|
//! | `hashId`    | S    | partition key               |
//! | `url`       | S    | target URL                  |
//! | `createdAt` | S    | RFC 3339, millisecond UTC   |
//! | `bucket`    | S    | constant, GSI partition key |
//! | `sortKey`   | S    | `createdAt#seq`, GSI sort key |
//!
//! [`LinkRepository::list_recent`] queries the `recent` index backwards, so a
//! listing reads at most `limit` items regardless of table size. `seq` is a
//! zero-padded per-repository counter; links stamped in the same millisecond
//! keep their insertion order.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, GlobalSecondaryIndex, KeySchemaElement,
    KeyType, Projection, ProjectionType, ScalarAttributeType,
};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use tracing::info;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{InsertOutcome, LinkRepository};
use crate::domain::store_error::StoreError;

const HASH_ATTR: &str = "hashId";
const URL_ATTR: &str = "url";
const CREATED_AT_ATTR: &str = "createdAt";
const BUCKET_ATTR: &str = "bucket";
const SORT_KEY_ATTR: &str = "sortKey";

/// Name of the global secondary index ordered by creation.
pub const RECENT_INDEX: &str = "recent";
const BUCKET: &str = "links";

/// DynamoDB repository for link storage and retrieval.
#[derive(Clone)]
pub struct DynamoLinkRepository {
    client: Client,
    table: String,
    sequence: Arc<AtomicU64>,
}

impl DynamoLinkRepository {
    /// Creates a repository over an existing client.
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Builds a client from the default AWS credential chain.
    ///
    /// Every SDK operation is bounded by `operation_timeout`. `endpoint`
    /// overrides the service URL (e.g. a local DynamoDB).
    pub async fn connect(
        table: impl Into<String>,
        endpoint: Option<&str>,
        operation_timeout: Duration,
    ) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest()).timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(operation_timeout)
                .build(),
        );
        if let Some(endpoint) = endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config), table)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Creates the links table with `hashId` as partition key and the
    /// [`RECENT_INDEX`] index used for listing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Dynamo`] if the table exists or creation fails.
    pub async fn create_table(&self) -> Result<(), StoreError> {
        let string_attribute = |name: &str| {
            AttributeDefinition::builder()
                .attribute_name(name)
                .attribute_type(ScalarAttributeType::S)
                .build()
                .map_err(|e| StoreError::Dynamo(e.to_string()))
        };
        let key = |name: &str, key_type: KeyType| {
            KeySchemaElement::builder()
                .attribute_name(name)
                .key_type(key_type)
                .build()
                .map_err(|e| StoreError::Dynamo(e.to_string()))
        };

        let recent_index = GlobalSecondaryIndex::builder()
            .index_name(RECENT_INDEX)
            .key_schema(key(BUCKET_ATTR, KeyType::Hash)?)
            .key_schema(key(SORT_KEY_ATTR, KeyType::Range)?)
            .projection(
                Projection::builder()
                    .projection_type(ProjectionType::All)
                    .build(),
            )
            .build()
            .map_err(|e| StoreError::Dynamo(e.to_string()))?;

        self.client
            .create_table()
            .table_name(&self.table)
            .attribute_definitions(string_attribute(HASH_ATTR)?)
            .attribute_definitions(string_attribute(BUCKET_ATTR)?)
            .attribute_definitions(string_attribute(SORT_KEY_ATTR)?)
            .key_schema(key(HASH_ATTR, KeyType::Hash)?)
            .global_secondary_indexes(recent_index)
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await
            .map_err(|e| StoreError::Dynamo(DisplayErrorContext(&e).to_string()))?;

        info!(table = %self.table, index = RECENT_INDEX, "DynamoDB table created");
        Ok(())
    }

    fn next_sort_key(&self, created_at: &DateTime<Utc>) -> String {
        sort_key(created_at, self.sequence.fetch_add(1, Ordering::Relaxed))
    }
}

fn string_attr<'a>(
    item: &'a HashMap<String, AttributeValue>,
    name: &str,
) -> Result<&'a String, StoreError> {
    item.get(name)
        .and_then(|value| value.as_s().ok())
        .ok_or_else(|| StoreError::Corrupt(format!("item without string attribute {name}")))
}

fn link_from_item(item: &HashMap<String, AttributeValue>) -> Result<Link, StoreError> {
    let hash = string_attr(item, HASH_ATTR)?;
    let url = string_attr(item, URL_ATTR)?;
    let created_at = string_attr(item, CREATED_AT_ATTR)?;

    let created_at = DateTime::parse_from_rfc3339(created_at)
        .map_err(|e| StoreError::Corrupt(format!("{CREATED_AT_ATTR} of {hash}: {e}")))?
        .with_timezone(&Utc);

    Ok(Link::new(hash.clone(), url.clone(), created_at))
}

fn format_created_at(created_at: &DateTime<Utc>) -> String {
    created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Index sort key. Timestamps have a fixed width, so byte order is creation
/// order; `seq` breaks ties inside one millisecond.
fn sort_key(created_at: &DateTime<Utc>, seq: u64) -> String {
    format!("{}#{:020}", format_created_at(created_at), seq)
}

#[async_trait]
impl LinkRepository for DynamoLinkRepository {
    fn backend(&self) -> &'static str {
        "dynamodb"
    }

    async fn insert_if_absent(&self, new_link: NewLink) -> Result<InsertOutcome, StoreError> {
        // Stored with millisecond precision; truncate so the returned link
        // equals what a later read yields.
        let created_at = Utc::now().trunc_subsecs(3);
        let sort_key = self.next_sort_key(&created_at);

        let result = self
            .client
            .put_item()
            .table_name(&self.table)
            .item(HASH_ATTR, AttributeValue::S(new_link.hash.clone()))
            .item(URL_ATTR, AttributeValue::S(new_link.url.clone()))
            .item(
                CREATED_AT_ATTR,
                AttributeValue::S(format_created_at(&created_at)),
            )
            .item(BUCKET_ATTR, AttributeValue::S(BUCKET.to_string()))
            .item(SORT_KEY_ATTR, AttributeValue::S(sort_key))
            .condition_expression("attribute_not_exists(#h)")
            .expression_attribute_names("#h", HASH_ATTR)
            .send()
            .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Created(new_link.into_link(created_at))),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
            {
                Ok(InsertOutcome::Conflict)
            }
            Err(e) => Err(StoreError::Dynamo(DisplayErrorContext(&e).to_string())),
        }
    }

    async fn find_by_hash(&self, hash: &str) -> Result<Option<Link>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key(HASH_ATTR, AttributeValue::S(hash.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| StoreError::Dynamo(DisplayErrorContext(&e).to_string()))?;

        output.item().map(link_from_item).transpose()
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Link>, StoreError> {
        let page_size = i32::try_from(limit).unwrap_or(i32::MAX);
        let mut links = Vec::with_capacity(limit);
        let mut start_key = None;

        while links.len() < limit {
            let output = self
                .client
                .query()
                .table_name(&self.table)
                .index_name(RECENT_INDEX)
                .key_condition_expression("#b = :b")
                .expression_attribute_names("#b", BUCKET_ATTR)
                .expression_attribute_values(":b", AttributeValue::S(BUCKET.to_string()))
                .scan_index_forward(false)
                .limit(page_size)
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(|e| StoreError::Dynamo(DisplayErrorContext(&e).to_string()))?;

            for item in output.items() {
                links.push(link_from_item(item)?);
            }

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        links.truncate(limit);
        Ok(links)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .describe_table()
            .table_name(&self.table)
            .send()
            .await
            .map_err(|e| StoreError::Dynamo(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}
