use std::collections::HashMap;

use futures_util::future::join_all;
use gpuscope_common::GpuNode;

use crate::error::PromError;
use crate::schema::{node_count_query, nodes_query, MODEL_LABEL, NODE_LABEL};
use crate::types::QueryApi;

/// Build the GPU node inventory.
///
/// The grouping query must succeed. Per-node count queries are issued
/// concurrently afterwards; a failed or unparsable count leaves that node's
/// `gpu_count` at 0 instead of failing the listing.
pub async fn list_nodes<Q>(api: &Q) -> Result<Vec<GpuNode>, PromError>
where
    Q: QueryApi + ?Sized,
{
    let grouped = api.query(&nodes_query()).await?;

    let mut nodes: Vec<GpuNode> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for sample in grouped.samples() {
        let node_name = sample.label(NODE_LABEL);
        if node_name.is_empty() {
            continue;
        }
        let pos = *positions.entry(node_name.to_string()).or_insert_with(|| {
            nodes.push(GpuNode::new(node_name));
            nodes.len() - 1
        });
        nodes[pos].add_model(sample.label(MODEL_LABEL));
    }

    let counts = join_all(nodes.iter().map(|n| node_gpu_count(api, &n.node_name))).await;
    for (node, count) in nodes.iter_mut().zip(counts) {
        node.gpu_count = count;
    }

    Ok(nodes)
}

async fn node_gpu_count<Q>(api: &Q, node: &str) -> u32
where
    Q: QueryApi + ?Sized,
{
    let resp = match api.query(&node_count_query(node)).await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!(error=%e, %node, "gpu count query failed, reporting 0");
            return 0;
        }
    };

    let raw = resp
        .samples()
        .first()
        .and_then(|s| s.value.as_ref())
        .map(|v| v.1.trim().to_string());

    match raw.as_deref().map(str::parse::<u32>) {
        Some(Ok(count)) => count,
        Some(Err(_)) => {
            tracing::warn!(%node, value = raw.as_deref().unwrap_or(""), "unparsable gpu count");
            0
        }
        None => 0,
    }
}
