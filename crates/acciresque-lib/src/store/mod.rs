//! Backing store abstraction.
//!
//! [`AccidentStore`] is the seam between the operations in
//! [`accidents`](crate::accidents) and whatever holds the documents. Each
//! method is exactly one round trip; none retries.

mod http;
mod memory;

pub use http::HttpAccidentStore;
pub use memory::MemoryAccidentStore;

use async_trait::async_trait;

use crate::context::CallContext;
use crate::error::Result;
use crate::model::{Accident, AccidentDocument, CreatedAccident, WriteOutcome};

#[async_trait]
pub trait AccidentStore: Send + Sync + 'static {
    /// Short backend label for health and logs (`http`, `memory`).
    fn backend(&self) -> &'static str;

    /// Every accident document in the root collection, paired with the key
    /// it is stored under. An absent collection is an empty list.
    async fn list(&self, ctx: CallContext) -> Result<Vec<(String, AccidentDocument)>>;

    /// The document stored under `id`, or `None` when there is none.
    async fn get(&self, ctx: CallContext, id: &str) -> Result<Option<AccidentDocument>>;

    /// Persist a new accident and return the id the store reports.
    async fn create(&self, ctx: CallContext, accident: &Accident) -> Result<CreatedAccident>;

    /// Overwrite the document under `id` with `accident`.
    async fn update(&self, ctx: CallContext, id: &str, accident: &Accident)
        -> Result<WriteOutcome>;

    async fn delete(&self, ctx: CallContext, id: &str) -> Result<WriteOutcome>;
}
