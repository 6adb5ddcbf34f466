use std::collections::HashMap;

use futures_util::future::try_join_all;

use crate::error::PromError;
use crate::schema::GpuQuery;
use crate::types::{QueryApi, QueryResponse};

pub type QueryResults = HashMap<GpuQuery, QueryResponse>;

/// Run every query concurrently and collect the responses by query.
///
/// Fails with [`PromError::QueryFailed`] on the first query error; the
/// remaining in-flight queries are dropped at that point.
pub async fn fan_out<Q>(api: &Q, queries: &[GpuQuery]) -> Result<QueryResults, PromError>
where
    Q: QueryApi + ?Sized,
{
    let pending = queries.iter().map(|&query| async move {
        match api.query(query.promql()).await {
            Ok(resp) => {
                tracing::debug!(query = query.name(), series = resp.samples().len(), "query completed");
                Ok((query, resp))
            }
            Err(e) => Err(PromError::QueryFailed {
                name: query.name(),
                source: Box::new(e),
            }),
        }
    });

    let completed = try_join_all(pending).await?;
    Ok(completed.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::memory::StaticQueryApi;
    use crate::types::Sample;

    #[tokio::test]
    async fn test_collects_every_query() {
        let api = StaticQueryApi::new().with_vector(
            GpuQuery::Temperature.promql(),
            vec![Sample::new(&[("node", "n1"), ("gpu", "0")], 1.0, "65")],
        );

        let results = fan_out(&api, &GpuQuery::ALL).await.unwrap();
        assert_eq!(results.len(), GpuQuery::ALL.len());
        assert_eq!(results[&GpuQuery::Temperature].samples().len(), 1);
        assert!(results[&GpuQuery::PowerDraw].samples().is_empty());

        let mut issued = api.calls();
        issued.sort();
        let mut expected: Vec<_> = GpuQuery::ALL.iter().map(|q| q.promql().to_string()).collect();
        expected.sort();
        assert_eq!(issued, expected);
    }

    #[tokio::test]
    async fn test_one_failure_fails_all_and_names_query() {
        let api = StaticQueryApi::new().with_failure(GpuQuery::PowerLimit.promql(), "no such metric");

        let err = fan_out(&api, &GpuQuery::ALL).await.unwrap_err();
        assert_eq!(err.failed_query(), Some("power_limit"));
        assert!(err.to_string().contains("power_limit"));
        assert!(err.to_string().contains("no such metric"));
    }

    #[tokio::test]
    async fn test_queries_run_concurrently() {
        let api = StaticQueryApi::new().with_delay(Duration::from_millis(200));

        let start = tokio::time::Instant::now();
        fan_out(&api, &GpuQuery::ALL).await.unwrap();
        // Sequential execution would take 8 * 200ms.
        assert!(start.elapsed() < Duration::from_millis(800));
    }

    #[tokio::test]
    async fn test_empty_query_set() {
        let api = StaticQueryApi::new();
        assert!(fan_out(&api, &[]).await.unwrap().is_empty());
    }
}
