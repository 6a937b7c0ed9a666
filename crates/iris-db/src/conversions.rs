//! JSON ⇄ DynamoDB attribute conversion.

use crate::error::{DbError, DbResult};
use crate::store::Item;
use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

pub(crate) type Attributes = HashMap<String, AttributeValue>;

pub(crate) fn item_to_attributes(item: Item) -> Attributes {
    item.into_iter()
        .map(|(key, value)| (key, value_to_attribute(value)))
        .collect()
}

pub(crate) fn attributes_to_item(attributes: &Attributes) -> DbResult<Item> {
    attributes
        .iter()
        .map(|(key, value)| Ok((key.clone(), attribute_to_value(value)?)))
        .collect()
}

fn value_to_attribute(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(values) => {
            AttributeValue::L(values.into_iter().map(value_to_attribute).collect())
        }
        Value::Object(map) => AttributeValue::M(
            map.into_iter()
                .map(|(key, value)| (key, value_to_attribute(value)))
                .collect(),
        ),
    }
}

fn attribute_to_value(attribute: &AttributeValue) -> DbResult<Value> {
    let value = match attribute {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => Value::Number(parse_number(n)?),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(values) => Value::Array(
            values
                .iter()
                .map(attribute_to_value)
                .collect::<DbResult<_>>()?,
        ),
        AttributeValue::M(map) => {
            let object: Map<String, Value> = map
                .iter()
                .map(|(key, value)| Ok((key.clone(), attribute_to_value(value)?)))
                .collect::<DbResult<_>>()?;
            Value::Object(object)
        }
        AttributeValue::Ss(values) => {
            Value::Array(values.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Ns(values) => Value::Array(
            values
                .iter()
                .map(|n| parse_number(n).map(Value::Number))
                .collect::<DbResult<_>>()?,
        ),
        // Binary attributes are surfaced as base64 text
        AttributeValue::B(blob) => Value::String(encode_blob(blob)),
        AttributeValue::Bs(blobs) => Value::Array(
            blobs
                .iter()
                .map(|blob| Value::String(encode_blob(blob)))
                .collect(),
        ),
        other => {
            return Err(DbError::Conversion(format!(
                "unsupported attribute value: {:?}",
                other
            )))
        }
    };
    Ok(value)
}

fn encode_blob(blob: &Blob) -> String {
    STANDARD.encode(blob.as_ref())
}

fn parse_number(raw: &str) -> DbResult<Number> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Ok(Number::from(u));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| DbError::Conversion(format!("invalid number attribute: {}", raw)))
}
