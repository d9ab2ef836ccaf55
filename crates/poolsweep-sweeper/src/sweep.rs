use poolsweep_domain::{ErrorClass, PageToken, Region, SweepOutcome, SweeperName};
use poolsweep_driver::{classify, ClientFactory};
use tracing::{debug, info, warn};

use crate::error::SweepError;
use crate::report::{SweepOptions, SweepReport};

/// Delete every user pool in `region`.
///
/// Pages are fetched with a cursor and each pool is deleted in listing order,
/// one call at a time. The first failed deletion ends the sweep; nothing after
/// it is touched. A listing error that means "not available here" ends the
/// sweep successfully with [`SweepOutcome::Skipped`].
pub async fn sweep_user_pools(
    sweeper: &SweeperName,
    region: &Region,
    factory: &dyn ClientFactory,
    options: &SweepOptions,
) -> Result<SweepReport, SweepError> {
    let client = factory.client_for(region).await.map_err(SweepError::Setup)?;
    let page_size = options.effective_page_size();
    let mut report = SweepReport::new(sweeper.clone(), region.clone());
    let mut token: Option<PageToken> = None;

    loop {
        debug!(%region, page = report.pages + 1, token = ?token.as_ref().map(PageToken::as_str), "listing user pools");
        let page = match client.list_resources(page_size, token.as_ref()).await {
            Ok(page) => page,
            Err(e) if classify(&e) == ErrorClass::Skip => {
                warn!(%region, %sweeper, error = %e, "skipping user pool sweep");
                return Ok(report.finish(SweepOutcome::Skipped { reason: e.to_string() }));
            }
            Err(source) => {
                return Err(SweepError::List { region: region.clone(), source });
            }
        };
        report.pages += 1;

        if page.is_empty() {
            debug!(%region, "no user pools to sweep");
            break;
        }

        for pool in page.items {
            info!(%region, pool_id = %pool.id, name = %pool.name, "deleting user pool");
            if let Err(source) = client.delete_resource(&pool.id).await {
                return Err(SweepError::Delete { name: pool.name, id: pool.id, source });
            }
            report.deleted.push(pool);
        }

        match page.next {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    let deleted = report.deleted.len();
    info!(%region, %sweeper, deleted, pages = report.pages, "user pool sweep complete");
    Ok(report.finish(SweepOutcome::Done { deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tracing_test::traced_test;
    use poolsweep_domain::{Page, ResourceHandle};
    use poolsweep_driver::{Call, ClientError, DirectoryClient, InMemoryDirectory, InMemoryFactory};

    fn name() -> SweeperName {
        SweeperName::new("aws_cognito_user_pool").unwrap()
    }

    fn region() -> Region {
        Region::new("us-west-2").unwrap()
    }

    async fn setup(ids: &[&str]) -> (InMemoryDirectory, InMemoryFactory) {
        let dir = InMemoryDirectory::new(region());
        for id in ids {
            dir.insert(*id, format!("terraform-test-pool-{}", id)).await;
        }
        let mut factory = InMemoryFactory::new();
        factory.register(dir.clone());
        (dir, factory)
    }

    #[tokio::test]
    async fn deletes_across_pages_in_listing_order() {
        let (dir, factory) = setup(&["a", "b", "c"]).await;

        let report = sweep_user_pools(&name(), &region(), &factory, &SweepOptions::new(2))
            .await
            .unwrap();

        assert_eq!(report.outcome, SweepOutcome::Done { deleted: 3 });
        assert_eq!(report.pages, 2);
        assert_eq!(
            dir.calls().await,
            vec![
                Call::list(2, None),
                Call::delete("a"),
                Call::delete("b"),
                Call::list(2, Some("c")),
                Call::delete("c"),
            ]
        );
        assert!(dir.remaining().await.is_empty());
    }

    #[tokio::test]
    async fn empty_first_page_deletes_nothing() {
        let (dir, factory) = setup(&[]).await;

        let report = sweep_user_pools(&name(), &region(), &factory, &SweepOptions::default())
            .await
            .unwrap();

        assert_eq!(report.outcome, SweepOutcome::Done { deleted: 0 });
        assert_eq!(dir.calls().await, vec![Call::list(50, None)]);
    }

    #[tokio::test]
    #[traced_test]
    async fn skip_worthy_list_error_is_success() {
        let (dir, factory) = setup(&["a"]).await;
        dir.fail_next_list(ClientError::api("AccessDeniedException", "")).await;

        let report = sweep_user_pools(&name(), &region(), &factory, &SweepOptions::default())
            .await
            .unwrap();

        assert!(report.outcome.is_skipped());
        assert!(report.deleted.is_empty());
        assert_eq!(dir.calls().await, vec![Call::list(50, None)]);
        assert_eq!(dir.remaining().await.len(), 1);
        assert!(logs_contain("skipping user pool sweep"));
        assert!(logs_contain("AccessDeniedException"));
    }

    #[tokio::test]
    async fn other_list_error_is_fatal() {
        let (dir, factory) = setup(&["a"]).await;
        dir.fail_next_list(ClientError::api("InternalErrorException", "boom")).await;

        let err = sweep_user_pools(&name(), &region(), &factory, &SweepOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SweepError::List { .. }));
        assert!(err.to_string().starts_with("error retrieving user pools in us-west-2"));
        assert_eq!(dir.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn delete_failure_stops_everything_after_it() {
        let (dir, factory) = setup(&["a", "b"]).await;
        dir.fail_delete("a", ClientError::api("InvalidParameterException", "pool has domain")).await;

        let err = sweep_user_pools(&name(), &region(), &factory, &SweepOptions::default())
            .await
            .unwrap_err();

        match &err {
            SweepError::Delete { name, id, source } => {
                assert_eq!(name, "terraform-test-pool-a");
                assert_eq!(id, "a");
                assert_eq!(source.code(), Some("InvalidParameterException"));
            }
            other => panic!("expected delete error, got {other:?}"),
        }
        assert!(err.to_string().contains("terraform-test-pool-a"));
        assert_eq!(dir.calls().await, vec![Call::list(50, None), Call::delete("a")]);
    }

    #[tokio::test]
    async fn delete_failure_on_later_page_fetches_no_more_pages() {
        let (dir, factory) = setup(&["a", "b", "c", "d", "e"]).await;
        dir.fail_delete("c", ClientError::api("InternalErrorException", "boom")).await;

        let err = sweep_user_pools(&name(), &region(), &factory, &SweepOptions::new(2))
            .await
            .unwrap_err();

        assert!(matches!(err, SweepError::Delete { .. }));
        assert_eq!(
            dir.calls().await,
            vec![
                Call::list(2, None),
                Call::delete("a"),
                Call::delete("b"),
                Call::list(2, Some("c")),
                Call::delete("c"),
            ]
        );
        let left: Vec<String> = dir.remaining().await.into_iter().map(|h| h.id).collect();
        assert_eq!(left, ["c", "d", "e"]);
    }

    #[tokio::test]
    async fn list_error_on_second_page_keeps_first_page_deletions() {
        let (dir, factory) = setup(&["a", "b", "c"]).await;
        dir.fail_list_call(2, ClientError::api("InternalErrorException", "boom")).await;

        let err = sweep_user_pools(&name(), &region(), &factory, &SweepOptions::new(2))
            .await
            .unwrap_err();

        assert!(matches!(err, SweepError::List { .. }));
        let left: Vec<String> = dir.remaining().await.into_iter().map(|h| h.id).collect();
        assert_eq!(left, ["c"]);
        assert_eq!(dir.calls().await.last(), Some(&Call::list(2, Some("c"))));
    }

    #[tokio::test]
    #[traced_test]
    async fn skip_on_later_page_reports_partial_progress() {
        let (dir, factory) = setup(&["a", "b", "c"]).await;
        dir.fail_list_call(2, ClientError::api("UnsupportedOperation", "")).await;

        let report = sweep_user_pools(&name(), &region(), &factory, &SweepOptions::new(2))
            .await
            .unwrap();

        assert!(report.outcome.is_skipped());
        assert_eq!(report.deleted.len(), 2);
        assert_eq!(dir.remaining().await.len(), 1);
        assert!(logs_contain("skipping user pool sweep"));
    }

    #[tokio::test]
    #[traced_test]
    async fn fatal_list_error_logs_no_skip() {
        let (dir, factory) = setup(&["a"]).await;
        dir.fail_next_list(ClientError::api("InternalErrorException", "boom")).await;

        let _ = sweep_user_pools(&name(), &region(), &factory, &SweepOptions::default()).await;

        assert!(!logs_contain("skipping user pool sweep"));
    }

    #[tokio::test]
    async fn setup_failure_makes_no_calls() {
        let (dir, factory) = setup(&["a"]).await;

        let err = sweep_user_pools(
            &name(),
            &Region::new("ap-south-1").unwrap(),
            &factory,
            &SweepOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, SweepError::Setup(ClientError::Setup(_))));
        assert!(dir.calls().await.is_empty());
    }

    #[tokio::test]
    async fn second_sweep_is_a_no_op() {
        let (dir, factory) = setup(&["a", "b"]).await;
        let opts = SweepOptions::default();

        sweep_user_pools(&name(), &region(), &factory, &opts).await.unwrap();
        let again = sweep_user_pools(&name(), &region(), &factory, &opts).await.unwrap();

        assert_eq!(again.outcome, SweepOutcome::Done { deleted: 0 });
        assert_eq!(again.pages, 1);
        assert!(dir.remaining().await.is_empty());
    }

    #[tokio::test]
    async fn oversized_page_size_is_clamped() {
        let (dir, factory) = setup(&["a"]).await;
        sweep_user_pools(&name(), &region(), &factory, &SweepOptions::new(1000))
            .await
            .unwrap();
        assert_eq!(dir.calls().await[0], Call::list(60, None));
    }

    /// Serves fixed pages keyed by the token that requests them.
    struct ScriptedPages {
        region: Region,
        pages: HashMap<Option<String>, Page>,
        calls: Mutex<Vec<Call>>,
    }

    #[async_trait]
    impl DirectoryClient for ScriptedPages {
        fn region(&self) -> &Region {
            &self.region
        }

        async fn list_resources(&self, max_results: u32, token: Option<&PageToken>) -> Result<Page, ClientError> {
            let key = token.map(|t| t.as_str().to_string());
            self.calls.lock().unwrap().push(Call::list(max_results, key.as_deref()));
            Ok(self.pages.get(&key).cloned().unwrap_or_default())
        }

        async fn delete_resource(&self, id: &str) -> Result<(), ClientError> {
            self.calls.lock().unwrap().push(Call::delete(id));
            Ok(())
        }

        async fn describe_resource(&self, id: &str) -> Result<ResourceHandle, ClientError> {
            Err(ClientError::api("ResourceNotFoundException", id))
        }
    }

    struct ScriptedFactory(Arc<ScriptedPages>);

    #[async_trait]
    impl ClientFactory for ScriptedFactory {
        async fn client_for(
            &self,
            _region: &Region,
        ) -> Result<Arc<dyn DirectoryClient>, ClientError> {
            let client: Arc<dyn DirectoryClient> = self.0.clone();
            Ok(client)
        }
    }

    #[tokio::test]
    async fn follows_opaque_continuation_tokens() {
        let mut pages = HashMap::new();
        pages.insert(
            None,
            Page::with_next(
                vec![ResourceHandle::new("A", "a"), ResourceHandle::new("B", "b")],
                PageToken::new("t1").unwrap(),
            ),
        );
        pages.insert(Some("t1".to_string()), Page::last(vec![ResourceHandle::new("C", "c")]));
        let scripted = Arc::new(ScriptedPages {
            region: region(),
            pages,
            calls: Mutex::new(Vec::new()),
        });

        let factory = ScriptedFactory(scripted.clone());

        let report = sweep_user_pools(&name(), &region(), &factory, &SweepOptions::default())
            .await
            .unwrap();

        assert_eq!(report.outcome, SweepOutcome::Done { deleted: 3 });
        assert_eq!(
            *scripted.calls.lock().unwrap(),
            vec![
                Call::list(50, None),
                Call::delete("A"),
                Call::delete("B"),
                Call::list(50, Some("t1")),
                Call::delete("C"),
            ]
        );
    }
}
