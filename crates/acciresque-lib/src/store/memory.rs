use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::AccidentStore;
use crate::context::CallContext;
use crate::error::Result;
use crate::model::{Accident, AccidentDocument, CreatedAccident, WriteOutcome};

/// In-process store keyed by accident id.
///
/// Mirrors the remote store's observable behaviour: create keeps a supplied
/// id or assigns a time-ordered one, update overwrites the whole document,
/// delete reports whether anything was removed.
#[derive(Debug, Default)]
pub struct MemoryAccidentStore {
    documents: RwLock<BTreeMap<String, Accident>>,
}

impl MemoryAccidentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store; accidents without an id are skipped.
    pub fn with_accidents(accidents: impl IntoIterator<Item = Accident>) -> Self {
        let documents = accidents
            .into_iter()
            .filter_map(|a| a.accident_id.clone().map(|id| (id, a)))
            .collect();
        Self {
            documents: RwLock::new(documents),
        }
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl AccidentStore for MemoryAccidentStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list(&self, ctx: CallContext) -> Result<Vec<(String, AccidentDocument)>> {
        let documents = self.documents.read().await;
        debug!(operation = %ctx.operation, count = documents.len(), "memory store list");
        Ok(documents
            .iter()
            .map(|(id, accident)| (id.clone(), AccidentDocument::from(accident.clone())))
            .collect())
    }

    async fn get(&self, ctx: CallContext, id: &str) -> Result<Option<AccidentDocument>> {
        debug!(operation = %ctx.operation, id, "memory store get");
        Ok(self
            .documents
            .read()
            .await
            .get(id)
            .cloned()
            .map(AccidentDocument::from))
    }

    async fn create(&self, ctx: CallContext, accident: &Accident) -> Result<CreatedAccident> {
        let id = accident
            .accident_id
            .clone()
            .unwrap_or_else(|| Uuid::now_v7().to_string());
        let mut stored = accident.clone();
        stored.accident_id = Some(id.clone());

        debug!(operation = %ctx.operation, id = %id, "memory store create");
        self.documents.write().await.insert(id.clone(), stored);
        Ok(CreatedAccident { accident_id: id })
    }

    async fn update(
        &self,
        ctx: CallContext,
        id: &str,
        accident: &Accident,
    ) -> Result<WriteOutcome> {
        debug!(operation = %ctx.operation, id, "memory store update");
        let mut stored = accident.clone();
        stored.accident_id = Some(id.to_string());
        self.documents.write().await.insert(id.to_string(), stored);
        Ok(WriteOutcome {
            success: Some(true),
        })
    }

    async fn delete(&self, ctx: CallContext, id: &str) -> Result<WriteOutcome> {
        let removed = self.documents.write().await.remove(id).is_some();
        debug!(operation = %ctx.operation, id, removed, "memory store delete");
        Ok(WriteOutcome {
            success: Some(removed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Operation;
    use crate::test_helpers::AccidentBuilder;

    fn ctx(op: Operation) -> CallContext {
        CallContext::new(op)
    }

    #[tokio::test]
    async fn create_assigns_id_when_missing() {
        let store = MemoryAccidentStore::new();
        let accident = AccidentBuilder::new().without_id().build();

        let created = store
            .create(ctx(Operation::CreateAccident), &accident)
            .await
            .unwrap();
        assert_eq!(created.accident_id.len(), 36);

        let stored = store
            .get(ctx(Operation::GetAccidentById), &created.accident_id)
            .await
            .unwrap()
            .expect("stored");
        assert_eq!(stored.accident_id.as_deref(), Some(created.accident_id.as_str()));
    }

    #[tokio::test]
    async fn update_stores_path_id_on_document() {
        let store = MemoryAccidentStore::new();
        let accident = AccidentBuilder::new().without_id().build();

        store
            .update(ctx(Operation::UpdateAccident), "a1", &accident)
            .await
            .unwrap();

        let listed = store.list(ctx(Operation::ListAccidents)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0, "a1");
        assert_eq!(listed[0].1.accident_id.as_deref(), Some("a1"));
    }

    #[tokio::test]
    async fn delete_reports_whether_document_existed() {
        let store = MemoryAccidentStore::with_accidents([AccidentBuilder::new().id("a1").build()]);
        assert_eq!(store.len().await, 1);

        let first = store.delete(ctx(Operation::DeleteAccident), "a1").await.unwrap();
        let second = store.delete(ctx(Operation::DeleteAccident), "a1").await.unwrap();
        assert_eq!(first.success, Some(true));
        assert_eq!(second.success, Some(false));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let store = MemoryAccidentStore::with_accidents([
            AccidentBuilder::new().id("b").build(),
            AccidentBuilder::new().id("a").build(),
            AccidentBuilder::new().without_id().build(),
        ]);
        let docs = store.list(ctx(Operation::ListAccidents)).await.unwrap();
        let ids: Vec<_> = docs.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
