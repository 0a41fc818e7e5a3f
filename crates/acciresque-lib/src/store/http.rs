use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::AccidentStore;
use crate::config::StoreConfig;
use crate::context::{CallContext, Operation};
use crate::error::{Error, Result};
use crate::model::{Accident, AccidentDocument, CreatedAccident, WriteOutcome};

/// Store client speaking the Realtime Database REST dialect.
///
/// Reads and deletes carry `auth` and `query` as query parameters; writes
/// carry them as body members next to the `accident` payload.
#[derive(Debug, Clone)]
pub struct HttpAccidentStore {
    client: Client,
    base: Url,
    config: StoreConfig,
}

#[derive(Serialize)]
struct WriteBody<'a> {
    auth: &'a str,
    query: &'a str,
    accident: &'a Accident,
}

impl HttpAccidentStore {
    /// Build a client for `config`.
    ///
    /// Fails if the base URL is not an absolute http(s) URL or the HTTP
    /// client cannot be constructed.
    pub fn new(config: StoreConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| Error::InvalidConfig {
            message: format!("store base URL '{}': {}", config.base_url, e),
        })?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(Error::InvalidConfig {
                message: format!("store base URL '{}' must be http(s)", config.base_url),
            });
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("acciresque/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Client)?;

        Ok(Self {
            client,
            base,
            config,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// `{base}/.json` for the root collection, `{base}/{id}.json` per document.
    fn url_for(&self, id: Option<&str>) -> Url {
        let file = match id {
            Some(id) => format!("{id}.json"),
            None => ".json".to_string(),
        };
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&file);
        }
        url
    }

    fn credential(&self, ctx: CallContext) -> &str {
        self.config.credentials.for_tier(ctx.tier)
    }

    fn read_request(&self, builder: RequestBuilder, ctx: CallContext) -> RequestBuilder {
        builder.query(&[
            ("auth", self.credential(ctx)),
            ("query", ctx.operation.tag()),
        ])
    }

    fn write_request(
        &self,
        builder: RequestBuilder,
        ctx: CallContext,
        accident: &Accident,
    ) -> RequestBuilder {
        builder.json(&WriteBody {
            auth: self.credential(ctx),
            query: ctx.operation.tag(),
            accident,
        })
    }

    /// Send one request and decode the reply body as JSON.
    ///
    /// An empty body decodes as `null`.
    async fn execute(&self, ctx: CallContext, builder: RequestBuilder) -> Result<Value> {
        let operation = ctx.operation;
        let started = Instant::now();

        let response = builder
            .send()
            .await
            .map_err(|source| Error::UpstreamUnavailable { operation, source })?;

        let status = response.status();
        debug!(
            operation = %operation,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "store replied"
        );

        if !status.is_success() {
            warn!(operation = %operation, status = status.as_u16(), "store returned error status");
            return Err(Error::UpstreamStatus {
                operation,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| Error::UpstreamUnavailable { operation, source })?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&body)
            .map_err(|e| Error::malformed(operation, format!("reply is not JSON: {e}")))
    }
}

#[async_trait]
impl AccidentStore for HttpAccidentStore {
    fn backend(&self) -> &'static str {
        "http"
    }

    async fn list(&self, ctx: CallContext) -> Result<Vec<(String, AccidentDocument)>> {
        let builder = self.read_request(self.client.get(self.url_for(None)), ctx);
        let reply = self.execute(ctx, builder).await?;
        parse_collection(ctx.operation, reply)
    }

    async fn get(&self, ctx: CallContext, id: &str) -> Result<Option<AccidentDocument>> {
        let builder = self.read_request(self.client.get(self.url_for(Some(id))), ctx);
        match self.execute(ctx, builder).await {
            Ok(reply) => parse_document(ctx.operation, reply),
            Err(Error::UpstreamStatus { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn create(&self, ctx: CallContext, accident: &Accident) -> Result<CreatedAccident> {
        let builder = self.write_request(self.client.post(self.url_for(None)), ctx, accident);
        let reply = self.execute(ctx, builder).await?;
        parse_created(ctx.operation, reply)
    }

    async fn update(
        &self,
        ctx: CallContext,
        id: &str,
        accident: &Accident,
    ) -> Result<WriteOutcome> {
        let builder = self.write_request(self.client.put(self.url_for(Some(id))), ctx, accident);
        let reply = self.execute(ctx, builder).await?;
        parse_write_outcome(ctx.operation, reply)
    }

    async fn delete(&self, ctx: CallContext, id: &str) -> Result<WriteOutcome> {
        let builder = self.read_request(self.client.delete(self.url_for(Some(id))), ctx);
        let reply = self.execute(ctx, builder).await?;
        parse_write_outcome(ctx.operation, reply)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn decode_document(operation: Operation, value: Value) -> Result<AccidentDocument> {
    if !value.is_object() {
        return Err(Error::malformed(
            operation,
            format!("expected an accident object, found {}", json_kind(&value)),
        ));
    }
    serde_json::from_value(value).map_err(|e| {
        Error::malformed(operation, format!("accident document does not match schema: {e}"))
    })
}

/// The root document holds an `accidents` member that may be absent, an
/// array with null holes, or an object keyed by id.
///
/// Each document is paired with its key: the object key, or the array index
/// for the store's array rendering of integer keys.
fn parse_collection(
    operation: Operation,
    reply: Value,
) -> Result<Vec<(String, AccidentDocument)>> {
    let accidents = match reply {
        Value::Null => return Ok(Vec::new()),
        Value::Object(mut root) => root.remove("accidents").unwrap_or(Value::Null),
        other => {
            return Err(Error::malformed(
                operation,
                format!("expected an object at the store root, found {}", json_kind(&other)),
            ))
        }
    };

    let items: Vec<(String, Value)> = match accidents {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect(),
        Value::Object(keyed) => keyed.into_iter().collect(),
        other => {
            return Err(Error::malformed(
                operation,
                format!("'accidents' must be an array or object, found {}", json_kind(&other)),
            ))
        }
    };

    items
        .into_iter()
        .filter(|(_, item)| !item.is_null())
        .map(|(key, item)| decode_document(operation, item).map(|doc| (key, doc)))
        .collect()
}

fn parse_document(operation: Operation, reply: Value) -> Result<Option<AccidentDocument>> {
    match reply {
        Value::Null => Ok(None),
        Value::Object(ref map) if map.is_empty() => Ok(None),
        other => decode_document(operation, other).map(Some),
    }
}

/// The store echoes `accidentId`; a bare push key arrives as `name`.
fn parse_created(operation: Operation, reply: Value) -> Result<CreatedAccident> {
    let id = reply
        .get("accidentId")
        .and_then(Value::as_str)
        .or_else(|| reply.get("name").and_then(Value::as_str));

    match id {
        Some(id) => Ok(CreatedAccident {
            accident_id: id.to_string(),
        }),
        None => Err(Error::malformed(
            operation,
            "reply carries neither 'accidentId' nor 'name'",
        )),
    }
}

fn parse_write_outcome(operation: Operation, reply: Value) -> Result<WriteOutcome> {
    match reply {
        Value::Null => Ok(WriteOutcome::default()),
        Value::Object(map) => Ok(WriteOutcome {
            success: map.get("success").and_then(Value::as_bool),
        }),
        other => Err(Error::malformed(
            operation,
            format!("expected an object reply, found {}", json_kind(&other)),
        )),
    }
}
