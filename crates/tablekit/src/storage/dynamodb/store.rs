//! DynamoDB key-value store.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::ReturnValue;
use aws_sdk_dynamodb::Client;

use tablekit_core::storage::{
    KeyValueStore, PrimaryKey, PutCondition, QueryOutput, QueryRequest, Record, SortDirection,
    StoreResult, UpdateRequest,
};

use crate::config::Config;

use super::conversions::{item_to_record, key_to_item, record_to_item};
use super::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_query_error,
    map_update_item_error,
};
use super::expressions::{key_condition, put_condition, update_expression};

/// DynamoDB-backed [`KeyValueStore`].
///
/// Reads are strongly consistent so the read-modify-write cycle of an update
/// always starts from the latest committed version.
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    /// Creates a store around an existing DynamoDB client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a store using the AWS SDK default credential chain, honoring the
    /// region and endpoint override in `config`.
    pub async fn from_config(config: &Config) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        tracing::debug!(
            region = %config.region,
            endpoint = ?config.endpoint_url,
            "Created DynamoDB client"
        );

        Self::new(Client::new(&sdk_config))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl KeyValueStore for DynamoDbStore {
    async fn get_item(&self, table: &str, key: &PrimaryKey) -> StoreResult<Option<Record>> {
        let result = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(key_to_item(key)))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| map_get_item_error(e, table))?;

        result.item.as_ref().map(item_to_record).transpose()
    }

    async fn put_item(
        &self,
        table: &str,
        item: Record,
        condition: PutCondition,
    ) -> StoreResult<()> {
        let mut request = self
            .client
            .put_item()
            .table_name(table)
            .set_item(Some(record_to_item(&item)));

        if let Some(expr) = put_condition(condition) {
            request = request
                .condition_expression(&expr.expression)
                .set_expression_attribute_names(expr.names());
        }

        request
            .send()
            .await
            .map_err(|e| map_put_item_error(e, table))?;

        Ok(())
    }

    async fn update_item(&self, table: &str, request: UpdateRequest) -> StoreResult<Record> {
        let (update, condition) = update_expression(&request);

        let result = self
            .client
            .update_item()
            .table_name(table)
            .set_key(Some(key_to_item(&request.key)))
            .update_expression(&update.expression)
            .condition_expression(condition)
            .set_expression_attribute_names(update.names())
            .set_expression_attribute_values(update.values())
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| map_update_item_error(e, table))?;

        match result.attributes {
            Some(attributes) => item_to_record(&attributes),
            None => Ok(Record::new()),
        }
    }

    async fn delete_item(&self, table: &str, key: &PrimaryKey) -> StoreResult<Option<Record>> {
        let result = self
            .client
            .delete_item()
            .table_name(table)
            .set_key(Some(key_to_item(key)))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, table))?;

        result.attributes.as_ref().map(item_to_record).transpose()
    }

    async fn query(&self, table: &str, request: QueryRequest) -> StoreResult<QueryOutput> {
        let condition = key_condition(
            &request.index,
            &request.partition_key,
            request.sort_key.as_ref(),
        );

        let result = self
            .client
            .query()
            .table_name(table)
            .set_index_name(request.index.index_name.map(str::to_string))
            .key_condition_expression(&condition.expression)
            .set_expression_attribute_names(condition.names())
            .set_expression_attribute_values(condition.values())
            .scan_index_forward(request.direction == SortDirection::Ascending)
            .set_limit(request.limit.map(|l| i32::try_from(l).unwrap_or(i32::MAX)))
            .set_exclusive_start_key(request.exclusive_start_key.as_ref().map(record_to_item))
            .send()
            .await
            .map_err(|e| map_query_error(e, table))?;

        let items = result
            .items
            .unwrap_or_default()
            .iter()
            .map(item_to_record)
            .collect::<StoreResult<Vec<_>>>()?;

        let last_evaluated_key = result
            .last_evaluated_key
            .as_ref()
            .map(item_to_record)
            .transpose()?;

        tracing::trace!(
            table,
            index = request.index.display_name(),
            count = items.len(),
            has_more = last_evaluated_key.is_some(),
            "DynamoDB query"
        );

        Ok(QueryOutput {
            items,
            last_evaluated_key,
        })
    }
}
