//! Firestore over its REST surface.
//!
//! A scan walks `documents.list` page by page until the service stops
//! returning a `nextPageToken`. Field values arrive in Firestore's tagged
//! form (`{"integerValue": "3"}`, `{"mapValue": {"fields": {...}}}`, ...) and
//! are flattened to plain JSON before they leave this module.

use crate::config::StoreConfig;
use crate::domain::model::Document;
use crate::domain::ports::DocumentStore;
use crate::utils::error::{GraphError, Result};
use crate::utils::validation::validate_required_field;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: HashMap<String, Value>,
}

#[derive(Debug, Clone)]
pub struct FirestoreStore {
    client: Client,
    documents_url: String,
    page_size: usize,
    access_token: Option<String>,
}

impl FirestoreStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let project_id = validate_required_field("store.project_id", &config.project_id)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let documents_url = format!(
            "{}/v1/projects/{}/databases/{}/documents",
            config.base_url.trim_end_matches('/'),
            project_id,
            config.database
        );

        Ok(Self {
            client,
            documents_url,
            page_size: config.page_size,
            access_token: config.access_token().map(str::to_string),
        })
    }

    async fn fetch_page(
        &self,
        collection: &str,
        page_token: Option<&str>,
    ) -> Result<ListDocumentsResponse> {
        let url = format!("{}/{}", self.documents_url, collection);

        let mut request = self
            .client
            .get(&url)
            .query(&[("pageSize", self.page_size.to_string())]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        tracing::debug!("Listing documents: {} (page token: {:?})", url, page_token);
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GraphError::StoreStatusError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<ListDocumentsResponse>().await?)
    }
}

impl DocumentStore for FirestoreStore {
    async fn scan(&self, collection: &str) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self.fetch_page(collection, page_token.as_deref()).await?;
            pages += 1;

            for raw in page.documents {
                documents.push(decode_document(raw)?);
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(
            "Scanned {} documents from '{}' in {} page(s)",
            documents.len(),
            collection,
            pages
        );
        Ok(documents)
    }
}

fn decode_document(raw: FirestoreDocument) -> Result<Document> {
    // name is projects/{p}/databases/{d}/documents/{collection}/{id}
    let id = raw
        .name
        .rsplit('/')
        .next()
        .unwrap_or(raw.name.as_str())
        .to_string();

    let mut fields = HashMap::with_capacity(raw.fields.len());
    for (key, value) in &raw.fields {
        fields.insert(key.clone(), decode_value(&id, value)?);
    }

    Ok(Document { id, fields })
}

/// Flatten one tagged Firestore value into plain JSON.
pub fn decode_value(document: &str, value: &Value) -> Result<Value> {
    let map = match value {
        Value::Object(map) if map.len() == 1 => map,
        other => {
            return Err(GraphError::decode(
                document,
                format!("expected a single-key typed value, got {}", other),
            ))
        }
    };

    let Some((tag, inner)) = map.iter().next() else {
        return Err(GraphError::decode(document, "empty typed value"));
    };

    match tag.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| GraphError::decode(document, "booleanValue is not a boolean")),
        "integerValue" => {
            // int64 travels as a decimal string
            let parsed = match inner {
                Value::String(text) => text.parse::<i64>().ok(),
                Value::Number(number) => number.as_i64(),
                _ => None,
            };
            parsed
                .map(Value::from)
                .ok_or_else(|| GraphError::decode(document, format!("bad integerValue {}", inner)))
        }
        "doubleValue" => match inner {
            Value::Number(_) => Ok(inner.clone()),
            // NaN and the infinities are sent as strings
            Value::String(text) => Ok(Value::String(text.clone())),
            _ => Err(GraphError::decode(
                document,
                format!("bad doubleValue {}", inner),
            )),
        },
        "stringValue" | "timestampValue" | "bytesValue" | "referenceValue" => inner
            .as_str()
            .map(|text| Value::String(text.to_string()))
            .ok_or_else(|| GraphError::decode(document, format!("{} is not a string", tag))),
        "geoPointValue" => Ok(inner.clone()),
        "arrayValue" => {
            let values = match inner.get("values") {
                Some(Value::Array(values)) => values
                    .iter()
                    .map(|item| decode_value(document, item))
                    .collect::<Result<Vec<_>>>()?,
                _ => Vec::new(),
            };
            Ok(Value::Array(values))
        }
        "mapValue" => {
            let mut object = Map::new();
            if let Some(Value::Object(fields)) = inner.get("fields") {
                for (key, item) in fields {
                    object.insert(key.clone(), decode_value(document, item)?);
                }
            }
            Ok(Value::Object(object))
        }
        other => Err(GraphError::decode(
            document,
            format!("unsupported value type '{}'", other),
        )),
    }
}
