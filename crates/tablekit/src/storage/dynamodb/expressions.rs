//! DynamoDB expression builders.
//!
//! Pure functions producing key-condition, condition and update expressions.
//! Every attribute name goes through a `#name` placeholder and every value
//! through a `:value` placeholder, so entity field names never collide with
//! DynamoDB reserved words.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue as SdkValue;
use tablekit_core::index::{IndexDescriptor, PRIMARY_INDEX};
use tablekit_core::storage::{
    PutCondition, SortKeyCondition, SortKeyMatch, UpdateRequest, VersionCondition,
    OBJECT_VERSION_ATTRIBUTE,
};

use super::conversions::to_sdk;

/// An expression string with its placeholder maps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, SdkValue>,
}

impl Expression {
    /// Placeholder maps in the shape the SDK builders accept; empty maps are
    /// omitted because DynamoDB rejects them.
    pub fn names(&self) -> Option<HashMap<String, String>> {
        (!self.names.is_empty()).then(|| self.names.clone())
    }

    pub fn values(&self) -> Option<HashMap<String, SdkValue>> {
        (!self.values.is_empty()).then(|| self.values.clone())
    }
}

/// Key condition of a query on `index`.
pub fn key_condition(
    index: &IndexDescriptor,
    partition_key: &str,
    sort_key: Option<&SortKeyCondition>,
) -> Expression {
    let mut names = HashMap::from([("#pk".to_string(), index.partition_key_name.to_string())]);
    let mut values = HashMap::from([(":pk".to_string(), SdkValue::S(partition_key.to_string()))]);
    let mut expression = "#pk = :pk".to_string();

    if let Some(condition) = sort_key {
        names.insert("#sk".to_string(), index.sort_key_name.to_string());
        values.insert(":sk".to_string(), SdkValue::S(condition.value.clone()));
        match condition.match_type {
            SortKeyMatch::Complete => expression.push_str(" AND #sk = :sk"),
            SortKeyMatch::BeginsWith => expression.push_str(" AND begins_with(#sk, :sk)"),
        }
    }

    Expression {
        expression,
        names,
        values,
    }
}

/// Condition attached to a put, if any.
pub fn put_condition(condition: PutCondition) -> Option<Expression> {
    match condition {
        PutCondition::None => None,
        PutCondition::KeyNotExists => Some(Expression {
            expression: "attribute_not_exists(#pk)".to_string(),
            names: HashMap::from([(
                "#pk".to_string(),
                PRIMARY_INDEX.partition_key_name.to_string(),
            )]),
            values: HashMap::new(),
        }),
    }
}

/// Update and condition expressions of a field-level update.
///
/// Both share one placeholder namespace, so they are built together and the
/// returned [`Expression::expression`] holds the update expression while
/// `condition` holds the condition expression.
pub fn update_expression(request: &UpdateRequest) -> (Expression, String) {
    let mut names = HashMap::new();
    let mut values = HashMap::new();

    let assignments: Vec<String> = request
        .set
        .iter()
        .enumerate()
        .map(|(i, (name, value))| {
            names.insert(format!("#s{i}"), name.clone());
            values.insert(format!(":s{i}"), to_sdk(value));
            format!("#s{i} = :s{i}")
        })
        .collect();

    let removals: Vec<String> = request
        .remove
        .iter()
        .enumerate()
        .map(|(i, name)| {
            names.insert(format!("#r{i}"), name.clone());
            format!("#r{i}")
        })
        .collect();

    let mut clauses = Vec::with_capacity(2);
    if !assignments.is_empty() {
        clauses.push(format!("SET {}", assignments.join(", ")));
    }
    if !removals.is_empty() {
        clauses.push(format!("REMOVE {}", removals.join(", ")));
    }

    names.insert(
        "#pk".to_string(),
        PRIMARY_INDEX.partition_key_name.to_string(),
    );
    names.insert("#ver".to_string(), OBJECT_VERSION_ATTRIBUTE.to_string());
    let condition = match request.condition {
        VersionCondition::Equals(expected) => {
            values.insert(":ver".to_string(), SdkValue::N(expected.to_string()));
            "attribute_exists(#pk) AND #ver = :ver".to_string()
        }
        VersionCondition::Absent => {
            "attribute_exists(#pk) AND attribute_not_exists(#ver)".to_string()
        }
    };

    (
        Expression {
            expression: clauses.join(" "),
            names,
            values,
        },
        condition,
    )
}
