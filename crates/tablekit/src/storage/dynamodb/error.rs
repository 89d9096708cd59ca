//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `StoreError` from `tablekit_core::storage`. Only
//! `ConditionalCheckFailedException` becomes
//! [`StoreError::ConditionalCheckFailed`]; the repository decides what a failed
//! condition means.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use tablekit_core::storage::StoreError;

/// Requests that never reached the service.
fn transport_failure<E, R>(err: &SdkError<E, R>) -> Option<StoreError> {
    match err {
        SdkError::DispatchFailure(_) => Some(StoreError::ConnectionFailed(
            "failed to dispatch request to DynamoDB".to_string(),
        )),
        SdkError::TimeoutError(_) => Some(StoreError::ConnectionFailed(
            "request to DynamoDB timed out".to_string(),
        )),
        _ => None,
    }
}

fn throttled(reason: &str) -> StoreError {
    StoreError::Throttled(reason.to_string())
}

/// Map a GetItem SDK error to StoreError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
    table: &str,
) -> StoreError {
    if let Some(failure) = transport_failure(&err) {
        return failure;
    }
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => StoreError::TableNotFound(table.to_string()),
        GetItemError::ProvisionedThroughputExceededException(_) => {
            throttled("provisioned throughput exceeded")
        }
        GetItemError::RequestLimitExceeded(_) => throttled("request limit exceeded"),
        GetItemError::InternalServerError(_) => {
            StoreError::RequestFailed("DynamoDB internal server error".to_string())
        }
        err => StoreError::RequestFailed(format!("GetItem failed: {:?}", err)),
    }
}

/// Map a Query SDK error to StoreError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
    table: &str,
) -> StoreError {
    if let Some(failure) = transport_failure(&err) {
        return failure;
    }
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => StoreError::TableNotFound(table.to_string()),
        QueryError::ProvisionedThroughputExceededException(_) => {
            throttled("provisioned throughput exceeded")
        }
        QueryError::RequestLimitExceeded(_) => throttled("request limit exceeded"),
        QueryError::InternalServerError(_) => {
            StoreError::RequestFailed("DynamoDB internal server error".to_string())
        }
        err => StoreError::RequestFailed(format!("Query failed: {:?}", err)),
    }
}

/// Map a PutItem SDK error to StoreError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    table: &str,
) -> StoreError {
    if let Some(failure) = transport_failure(&err) {
        return failure;
    }
    match err.into_service_error() {
        PutItemError::ConditionalCheckFailedException(_) => StoreError::ConditionalCheckFailed,
        PutItemError::ResourceNotFoundException(_) => StoreError::TableNotFound(table.to_string()),
        PutItemError::ProvisionedThroughputExceededException(_) => {
            throttled("provisioned throughput exceeded")
        }
        PutItemError::RequestLimitExceeded(_) => throttled("request limit exceeded"),
        PutItemError::TransactionConflictException(_) => {
            throttled("transaction conflict, please retry")
        }
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            StoreError::RequestFailed("item collection size limit exceeded".to_string())
        }
        PutItemError::InternalServerError(_) => {
            StoreError::RequestFailed("DynamoDB internal server error".to_string())
        }
        err => StoreError::RequestFailed(format!("PutItem failed: {:?}", err)),
    }
}

/// Map an UpdateItem SDK error to StoreError.
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
    table: &str,
) -> StoreError {
    if let Some(failure) = transport_failure(&err) {
        return failure;
    }
    match err.into_service_error() {
        UpdateItemError::ConditionalCheckFailedException(_) => StoreError::ConditionalCheckFailed,
        UpdateItemError::ResourceNotFoundException(_) => {
            StoreError::TableNotFound(table.to_string())
        }
        UpdateItemError::ProvisionedThroughputExceededException(_) => {
            throttled("provisioned throughput exceeded")
        }
        UpdateItemError::RequestLimitExceeded(_) => throttled("request limit exceeded"),
        UpdateItemError::TransactionConflictException(_) => {
            throttled("transaction conflict, please retry")
        }
        UpdateItemError::ItemCollectionSizeLimitExceededException(_) => {
            StoreError::RequestFailed("item collection size limit exceeded".to_string())
        }
        UpdateItemError::InternalServerError(_) => {
            StoreError::RequestFailed("DynamoDB internal server error".to_string())
        }
        err => StoreError::RequestFailed(format!("UpdateItem failed: {:?}", err)),
    }
}

/// Map a DeleteItem SDK error to StoreError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
    table: &str,
) -> StoreError {
    if let Some(failure) = transport_failure(&err) {
        return failure;
    }
    match err.into_service_error() {
        DeleteItemError::ConditionalCheckFailedException(_) => StoreError::ConditionalCheckFailed,
        DeleteItemError::ResourceNotFoundException(_) => {
            StoreError::TableNotFound(table.to_string())
        }
        DeleteItemError::ProvisionedThroughputExceededException(_) => {
            throttled("provisioned throughput exceeded")
        }
        DeleteItemError::RequestLimitExceeded(_) => throttled("request limit exceeded"),
        DeleteItemError::TransactionConflictException(_) => {
            throttled("transaction conflict, please retry")
        }
        DeleteItemError::ItemCollectionSizeLimitExceededException(_) => {
            StoreError::RequestFailed("item collection size limit exceeded".to_string())
        }
        DeleteItemError::InternalServerError(_) => {
            StoreError::RequestFailed("DynamoDB internal server error".to_string())
        }
        err => StoreError::RequestFailed(format!("DeleteItem failed: {:?}", err)),
    }
}
