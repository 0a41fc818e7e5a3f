//! The five accident operations.
//!
//! Each operation validates its caller-supplied ids, performs exactly one
//! store call through [`AccidentStore`], and reshapes the reply through the
//! canonical transform. Nothing is cached or retried.

use tracing::{debug, warn};

use crate::context::{CallContext, Operation};
use crate::error::{Error, Result};
use crate::model::{Accident, AccidentDocument, CreatedAccident, WriteOutcome};
use crate::store::AccidentStore;

/// Longest key the store accepts, in bytes.
pub const MAX_ID_LEN: usize = 768;

/// Characters the store forbids in keys.
const RESERVED_ID_CHARS: &[char] = &['.', '$', '#', '[', ']', '/'];

/// Check that `id` can be used as a store key.
///
/// `field` names the offending input in the resulting error.
pub fn validate_accident_id(field: &str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    if id.len() > MAX_ID_LEN {
        return Err(Error::validation(
            field,
            format!("must be at most {MAX_ID_LEN} bytes"),
        ));
    }
    if let Some(c) = id
        .chars()
        .find(|c| RESERVED_ID_CHARS.contains(c) || c.is_control())
    {
        return Err(Error::validation(
            field,
            format!("contains reserved character {c:?}"),
        ));
    }
    Ok(())
}

/// Reshape a caller-supplied document, rejecting missing sub-records.
pub fn validate_input(document: AccidentDocument) -> Result<Accident> {
    let accident = document
        .into_accident()
        .map_err(|missing| Error::validation(missing.0, "sub-record is required"))?;
    if let Some(id) = accident.accident_id.as_deref() {
        validate_accident_id("accidentId", id)?;
    }
    Ok(accident)
}

/// Reshape a store document; a missing sub-record means the reply is malformed.
fn from_store(operation: Operation, document: AccidentDocument) -> Result<Accident> {
    document.into_accident().map_err(|missing| {
        warn!(operation = %operation, sub_record = missing.0, "store document lacks sub-record");
        Error::malformed(operation, missing.to_string())
    })
}

/// List every accident in the store. An empty store yields an empty list.
///
/// A document stored without its own `accidentId` reports the key it is
/// stored under, as [`get_accident`] does.
pub async fn list_accidents(store: &dyn AccidentStore) -> Result<Vec<Accident>> {
    let ctx = CallContext::new(Operation::ListAccidents);
    let documents = store.list(ctx).await?;
    debug!(count = documents.len(), "listed accident documents");

    documents
        .into_iter()
        .map(|(key, doc)| -> Result<Accident> {
            let mut accident = from_store(ctx.operation, doc)?;
            accident.accident_id.get_or_insert(key);
            Ok(accident)
        })
        .collect()
}

/// Fetch one accident.
///
/// Returns [`Error::NotFound`] when the store has no document for `id`. A
/// document stored without its own `accidentId` reports the requested id.
pub async fn get_accident(store: &dyn AccidentStore, id: &str) -> Result<Accident> {
    validate_accident_id("id", id)?;
    let ctx = CallContext::new(Operation::GetAccidentById);

    let document = store
        .get(ctx, id)
        .await?
        .ok_or_else(|| Error::NotFound { id: id.to_string() })?;

    let mut accident = from_store(ctx.operation, document)?;
    if accident.accident_id.is_none() {
        accident.accident_id = Some(id.to_string());
    }
    Ok(accident)
}

/// Forward a new accident to the store and return the id it reports.
pub async fn create_accident(
    store: &dyn AccidentStore,
    accident: Accident,
) -> Result<CreatedAccident> {
    if let Some(id) = accident.accident_id.as_deref() {
        validate_accident_id("accidentId", id)?;
    }
    let ctx = CallContext::new(Operation::CreateAccident);
    store.create(ctx, &accident).await
}

/// Overwrite the accident stored under `id`.
///
/// The id comes from the path; any `accidentId` in `accident` is not sent.
/// Fields absent from `accident` are absent afterwards.
pub async fn update_accident(
    store: &dyn AccidentStore,
    id: &str,
    mut accident: Accident,
) -> Result<WriteOutcome> {
    validate_accident_id("id", id)?;
    accident.accident_id = None;
    let ctx = CallContext::new(Operation::UpdateAccident);
    store.update(ctx, id, &accident).await
}

pub async fn delete_accident(store: &dyn AccidentStore, id: &str) -> Result<WriteOutcome> {
    validate_accident_id("id", id)?;
    let ctx = CallContext::new(Operation::DeleteAccident);
    store.delete(ctx, id).await
}
