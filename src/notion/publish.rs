//! Issue page creation in the publish database.
//!
//! The page API accepts at most 100 child blocks per request, so the first
//! batch rides along with the page creation and any remainder is appended
//! in ordered batches through the block-children endpoint. Batching lives
//! here, on the publishing side, so the converter stays a pure function.

use crate::blocks::Block;
use crate::notion::client::NotionClient;
use crate::notion::PROP_TITLE;
use serde_json::{json, Value};
use std::error::Error;
use tracing::{debug, info, instrument};

/// Maximum number of child blocks the API accepts per request.
pub const BLOCK_BATCH_SIZE: usize = 100;

/// A successfully created issue page.
#[derive(Debug, Clone)]
pub struct PublishedPage {
    pub page_id: String,
    pub url: String,
    pub title: String,
}

/// Create an issue page titled `title` in `database_id` from converted
/// blocks.
///
/// The block order of the converter output is preserved exactly: the first
/// 100 blocks are created with the page and the rest are appended in
/// order, one batch at a time.
#[instrument(level = "info", skip(client, blocks), fields(%database_id, %title, blocks = blocks.len()))]
pub async fn publish_issue(
    client: &NotionClient,
    database_id: &str,
    title: &str,
    blocks: &[Block],
) -> Result<PublishedPage, Box<dyn Error>> {
    let children: Vec<Value> = blocks.iter().map(Block::to_json).collect();
    let (first, rest) = children.split_at(children.len().min(BLOCK_BATCH_SIZE));

    let body = page_payload(database_id, title, first);
    let response = client.post("pages", &body).await?;

    let page_id = response["id"]
        .as_str()
        .ok_or("page create response missing id")?
        .to_string();
    let url = response["url"].as_str().unwrap_or_default().to_string();
    debug!(%page_id, first_batch = first.len(), "Issue page created");

    let append_path = format!("blocks/{}/children", page_id);
    for batch in rest.chunks(BLOCK_BATCH_SIZE) {
        client
            .patch(&append_path, &json!({ "children": batch }))
            .await?;
        debug!(appended = batch.len(), "Appended block batch");
    }

    info!(%page_id, blocks = children.len(), "Published issue page");
    Ok(PublishedPage {
        page_id,
        url,
        title: title.to_string(),
    })
}

/// Page creation payload: parent database, title property, first block
/// batch.
fn page_payload(database_id: &str, title: &str, children: &[Value]) -> Value {
    json!({
        "parent": { "database_id": database_id },
        "properties": {
            (PROP_TITLE): {
                "title": [ { "text": { "content": title } } ]
            }
        },
        "children": children
    })
}
