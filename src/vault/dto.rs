//! Request and response bodies of the vault document API.

use serde::{Deserialize, Serialize};

use crate::models::Account;

const ID_FIELD: &str = "_id";
const EQ: &str = "EQ";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSchema {
    id_field_name: &'static str,
    fields: Vec<FieldSpec>,
    indexes: Vec<IndexSpec>,
}

#[derive(Debug, Serialize)]
struct FieldSpec {
    name: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexSpec {
    fields: Vec<&'static str>,
    is_unique: bool,
}

impl CollectionSchema {
    /// `number` is the natural key, `type` is indexed for listing.
    pub fn accounts() -> Self {
        Self {
            id_field_name: ID_FIELD,
            fields: vec![
                FieldSpec {
                    name: "number",
                    kind: "STRING",
                },
                FieldSpec {
                    name: "type",
                    kind: "STRING",
                },
            ],
            indexes: vec![
                IndexSpec {
                    fields: vec!["number"],
                    is_unique: true,
                },
                IndexSpec {
                    fields: vec!["type"],
                    is_unique: false,
                },
            ],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Query<'a> {
    expressions: Vec<Expression<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Expression<'a> {
    field_comparisons: Vec<FieldComparison<'a>>,
}

#[derive(Debug, Serialize)]
struct FieldComparison<'a> {
    field: &'static str,
    operator: &'static str,
    value: &'a str,
}

impl<'a> Query<'a> {
    pub fn field_eq(field: &'static str, value: &'a str) -> Self {
        Self {
            expressions: vec![Expression {
                field_comparisons: vec![FieldComparison {
                    field,
                    operator: EQ,
                    value,
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CountRequest<'a> {
    pub query: Query<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest<'a> {
    pub page: u32,
    pub per_page: u32,
    pub query: Query<'a>,
}

#[derive(Debug, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub revisions: Vec<Revision>,
}

#[derive(Debug, Deserialize)]
pub struct Revision {
    pub document: Account,
}
