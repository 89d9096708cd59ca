//! Table deployment operations (Imperative Shell).

use std::time::Duration;

use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, CreateGlobalSecondaryIndexAction, GlobalSecondaryIndex,
    GlobalSecondaryIndexUpdate, KeySchemaElement, KeyType, Projection, ProjectionType,
    ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;

use super::client;
use super::config::{GsiConfig, TableConfig};
use super::error::{aws_sdk, DynamodbError, Result};
use super::planning::{DeployPlan, DestroyPlan};

const ACTIVATION_POLL_ATTEMPTS: u32 = 150;
const ACTIVATION_POLL_DELAY: Duration = Duration::from_secs(2);

/// Execute a deploy plan.
pub async fn execute_deploy_plan(client: &Client, plan: &DeployPlan) -> Result<()> {
    match plan {
        DeployPlan::CreateTable { config } => {
            create_table(client, config).await?;
            wait_for_table_active(client, &config.table_name).await?;
        }
        DeployPlan::AddGsis {
            table_name,
            gsis_to_add,
        } => {
            for gsi in gsis_to_add {
                add_gsi(client, table_name, gsi).await?;
                wait_for_table_active(client, table_name).await?;
            }
        }
        DeployPlan::NoChanges { .. } => {}
    }
    Ok(())
}

/// Execute a destroy plan.
pub async fn execute_destroy_plan(client: &Client, plan: &DestroyPlan) -> Result<()> {
    if let DestroyPlan::DeleteTable { table_name } = plan {
        client
            .delete_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(aws_sdk)?;
        tracing::debug!(table_name = %table_name, "Deleted table");
    }
    Ok(())
}

async fn create_table(client: &Client, config: &TableConfig) -> Result<()> {
    let attribute_definitions = config
        .key_attributes()
        .into_iter()
        .map(string_attribute)
        .collect::<Result<Vec<_>>>()?;

    let gsis = config
        .gsis
        .iter()
        .map(|gsi| {
            GlobalSecondaryIndex::builder()
                .index_name(&gsi.name)
                .set_key_schema(Some(key_schema(&gsi.partition_key, &gsi.sort_key)?))
                .projection(project_all())
                .build()
                .map_err(aws_sdk)
        })
        .collect::<Result<Vec<_>>>()?;

    client
        .create_table()
        .table_name(&config.table_name)
        .set_key_schema(Some(key_schema(&config.partition_key, &config.sort_key)?))
        .set_attribute_definitions(Some(attribute_definitions))
        .set_global_secondary_indexes(Some(gsis))
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await
        .map_err(aws_sdk)?;

    tracing::debug!(
        table_name = %config.table_name,
        gsis = config.gsis.len(),
        "Requested table creation"
    );
    Ok(())
}

async fn add_gsi(client: &Client, table_name: &str, gsi: &GsiConfig) -> Result<()> {
    let create = CreateGlobalSecondaryIndexAction::builder()
        .index_name(&gsi.name)
        .set_key_schema(Some(key_schema(&gsi.partition_key, &gsi.sort_key)?))
        .projection(project_all())
        .build()
        .map_err(aws_sdk)?;

    client
        .update_table()
        .table_name(table_name)
        .set_attribute_definitions(Some(vec![
            string_attribute(&gsi.partition_key)?,
            string_attribute(&gsi.sort_key)?,
        ]))
        .global_secondary_index_updates(GlobalSecondaryIndexUpdate::builder().create(create).build())
        .send()
        .await
        .map_err(aws_sdk)?;

    tracing::debug!(table_name, gsi = %gsi.name, "Requested GSI creation");
    Ok(())
}

async fn wait_for_table_active(client: &Client, table_name: &str) -> Result<()> {
    for _ in 0..ACTIVATION_POLL_ATTEMPTS {
        if let Some(state) = client::get_table_state(client, table_name).await? {
            if state.is_settled() {
                return Ok(());
            }
        }
        tokio::time::sleep(ACTIVATION_POLL_DELAY).await;
    }

    Err(DynamodbError::TableActivationTimeout {
        table_name: table_name.to_string(),
    })
}

fn key_schema(partition_key: &str, sort_key: &str) -> Result<Vec<KeySchemaElement>> {
    [(partition_key, KeyType::Hash), (sort_key, KeyType::Range)]
        .into_iter()
        .map(|(name, key_type)| {
            KeySchemaElement::builder()
                .attribute_name(name)
                .key_type(key_type)
                .build()
                .map_err(aws_sdk)
        })
        .collect()
}

fn string_attribute(name: &str) -> Result<AttributeDefinition> {
    AttributeDefinition::builder()
        .attribute_name(name)
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(aws_sdk)
}

fn project_all() -> Projection {
    Projection::builder()
        .projection_type(ProjectionType::All)
        .build()
}
