use crate::core::{Document, DocumentStore, GraphPoint, Result, UserRecord};

/// Turn scanned documents into points, in scan order.
///
/// Empty documents are skipped. Any document that fails to decode aborts
/// the whole batch; there is no partial result.
pub fn assemble_points(documents: Vec<Document>) -> Result<Vec<GraphPoint>> {
    let mut points = Vec::with_capacity(documents.len());
    let mut skipped = 0usize;

    for document in documents {
        if document.is_empty() {
            tracing::debug!("Skipping empty document '{}'", document.id);
            skipped += 1;
            continue;
        }

        let record = UserRecord::decode(&document)?;
        points.push(record.into_point());
    }

    tracing::debug!(
        "Assembled {} points ({} empty documents skipped)",
        points.len(),
        skipped
    );
    Ok(points)
}

/// Full scan of `collection` followed by [`assemble_points`].
pub async fn collect_points<S: DocumentStore>(store: &S, collection: &str) -> Result<Vec<GraphPoint>> {
    let documents = store.scan(collection).await?;
    tracing::debug!("Scanned {} documents from '{}'", documents.len(), collection);
    assemble_points(documents)
}
