//! AWS SDK client setup and table inspection (Imperative Shell).

use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::types::{IndexStatus, TableStatus as SdkTableStatus};
use aws_sdk_dynamodb::Client;
use tablekit::storage::DynamoDbStore;
use tablekit::Config;

use super::error::{aws_sdk, Result};
use super::planning::{GsiState, GsiStatus, TableState, TableStatus};

/// Returns a display string for the target environment.
pub fn target_display(config: &Config) -> String {
    match &config.endpoint_url {
        Some(url) => format!("Local DynamoDB ({})", url),
        None => format!("AWS DynamoDB (region: {})", config.region),
    }
}

/// Creates a DynamoDB client the same way the repository does.
pub async fn create_client(config: &Config) -> Client {
    DynamoDbStore::from_config(config).await.client().clone()
}

/// Fetches current table state, returns None if table doesn't exist.
pub async fn get_table_state(client: &Client, table_name: &str) -> Result<Option<TableState>> {
    let response = match client.describe_table().table_name(table_name).send().await {
        Ok(response) => response,
        Err(err) => {
            return match err.into_service_error() {
                DescribeTableError::ResourceNotFoundException(_) => Ok(None),
                other => Err(aws_sdk(other)),
            };
        }
    };

    let Some(table) = response.table() else {
        return Ok(None);
    };

    let gsis = table
        .global_secondary_indexes()
        .iter()
        .map(|gsi| GsiState {
            name: gsi.index_name().unwrap_or_default().to_string(),
            status: match gsi.index_status() {
                Some(IndexStatus::Creating) => GsiStatus::Creating,
                Some(IndexStatus::Updating) => GsiStatus::Updating,
                Some(IndexStatus::Deleting) => GsiStatus::Deleting,
                _ => GsiStatus::Active,
            },
        })
        .collect();

    let status = match table.table_status() {
        Some(SdkTableStatus::Creating) => TableStatus::Creating,
        Some(SdkTableStatus::Updating) => TableStatus::Updating,
        Some(SdkTableStatus::Deleting) => TableStatus::Deleting,
        _ => TableStatus::Active,
    };

    tracing::debug!(table_name, %status, "Described table");

    Ok(Some(TableState { status, gsis }))
}
