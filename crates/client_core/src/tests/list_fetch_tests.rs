use super::*;
use crate::test_support::{
    ids, page_of, server_error, GatedSearch, ScriptedSearch, SilentBackend,
};
use futures::future::join_all;

const TIMEOUT: Duration = Duration::from_secs(5);

fn controller(api: Arc<dyn SearchApi>) -> ListFetchController {
    ListFetchController::new(api, 5, TIMEOUT)
}

#[tokio::test]
async fn starts_idle_with_single_empty_page() {
    let list = controller(ScriptedSearch::new(Vec::new()));
    let snapshot = list.snapshot().await;

    assert_eq!(snapshot.phase, ListPhase::Idle);
    assert_eq!(snapshot.generation, Generation(0));
    assert_eq!(snapshot.result, ListResult::default());
    assert_eq!(snapshot.cursor, PageCursor::new(1, 5));
    assert_eq!(snapshot.summary(), EMPTY_LIST_MESSAGE);
}

#[tokio::test]
async fn alice_search_on_single_page_disables_both_directions() {
    let api = ScriptedSearch::new(vec![Ok(page_of(&[1, 2], 1, 2))]);
    let list = controller(api.clone());

    list.edit_filter(FilterField::Name, "Alice").await;
    let outcome = list.submit_search().await;

    assert_eq!(outcome, FetchOutcome::Applied(ListPhase::Success));
    let snapshot = list.snapshot().await;
    assert_eq!(snapshot.phase, ListPhase::Success);
    assert_eq!(snapshot.result.total_pages, 1);
    assert_eq!(snapshot.result.total_items, 2);
    assert_eq!(ids(&snapshot.result.items), vec![1, 2]);

    let controls = snapshot.controls();
    assert!(!controls.prev_enabled);
    assert!(!controls.next_enabled);

    assert_eq!(
        api.last_query().to_query_string(),
        "name=Alice&page=1&page_size=5"
    );
    assert_eq!(list.next_page().await, FetchOutcome::Blocked);
    assert_eq!(list.prev_page().await, FetchOutcome::Blocked);
    assert_eq!(api.queries().len(), 1);
}

#[tokio::test]
async fn editing_filters_does_not_fetch() {
    let api = ScriptedSearch::new(Vec::new());
    let list = controller(api.clone());

    list.edit_filter(FilterField::Region, "Europe").await;
    list.edit_filter(FilterField::Skills, "CRM").await;

    let snapshot = list.snapshot().await;
    assert!(api.queries().is_empty());
    assert_eq!(snapshot.phase, ListPhase::Idle);
    assert_eq!(snapshot.draft.region, "Europe");
    assert!(snapshot.filters.is_empty());
}

#[tokio::test]
async fn later_page_wins_when_earlier_response_arrives_last() {
    let api = GatedSearch::new();
    let page_one = api.gate(1);
    let page_two = api.gate(2);
    let list = controller(api);

    let (first, second, ()) = tokio::join!(
        list.request_list(FilterSet::default(), PageCursor::new(1, 5)),
        list.request_list(FilterSet::default(), PageCursor::new(2, 5)),
        async {
            page_two
                .send(Ok(page_of(&[6, 7], 2, 7)))
                .expect("deliver page two");
            for _ in 0..4 {
                tokio::task::yield_now().await;
            }
            page_one
                .send(Ok(page_of(&[1, 2, 3, 4, 5], 2, 7)))
                .expect("deliver page one");
        }
    );

    assert_eq!(first, FetchOutcome::Discarded);
    assert_eq!(second, FetchOutcome::Applied(ListPhase::Success));
    let snapshot = list.snapshot().await;
    assert_eq!(snapshot.cursor.page, 2);
    assert_eq!(ids(&snapshot.result.items), vec![6, 7]);
}

#[tokio::test]
async fn last_issued_request_wins_for_any_arrival_order() {
    for n in 1..=6usize {
        let orders: Vec<Vec<usize>> = vec![
            (0..n).collect(),
            (0..n).rev().collect(),
            (0..n).map(|i| (i + n / 2) % n).collect(),
            (0..n).map(|i| if i % 2 == 0 { i / 2 } else { n - 1 - i / 2 }).collect(),
        ];

        for order in orders {
            let list = controller(ScriptedSearch::new(Vec::new()));
            let mut pending = Vec::new();
            for i in 0..n {
                pending.push(
                    list.begin_fetch(FilterSet::default(), PageCursor::new(i as u32 + 1, 5))
                        .await,
                );
            }

            for &i in &order {
                let reply = Ok(page_of(&[i as i64 + 100], n as u32, n as u64));
                let outcome = list.apply_response(pending[i].generation, reply).await;
                if i == n - 1 {
                    assert_eq!(outcome, FetchOutcome::Applied(ListPhase::Success));
                } else {
                    assert_eq!(outcome, FetchOutcome::Discarded, "n={n} order={order:?}");
                }
            }

            let snapshot = list.snapshot().await;
            assert_eq!(ids(&snapshot.result.items), vec![n as i64 - 1 + 100]);
            assert_eq!(snapshot.cursor.page, n as u32);
            assert_eq!(snapshot.phase, ListPhase::Success);
        }
    }
}

#[tokio::test]
async fn concurrent_requests_settle_on_the_last_one() {
    let api = GatedSearch::new();
    let senders: Vec<_> = (1..=5).map(|page| api.gate(page)).collect();
    let list = controller(api);

    let requests = join_all(
        (1..=5).map(|page| list.request_list(FilterSet::default(), PageCursor::new(page, 5))),
    );
    let release = async {
        for (idx, tx) in senders.into_iter().enumerate().rev() {
            tx.send(Ok(page_of(&[idx as i64 + 1], 5, 25)))
                .expect("deliver");
            tokio::task::yield_now().await;
        }
    };
    let (outcomes, ()) = tokio::join!(requests, release);

    assert_eq!(
        outcomes,
        vec![
            FetchOutcome::Discarded,
            FetchOutcome::Discarded,
            FetchOutcome::Discarded,
            FetchOutcome::Discarded,
            FetchOutcome::Applied(ListPhase::Success),
        ]
    );
    assert_eq!(ids(&list.snapshot().await.result.items), vec![5]);
}

#[tokio::test]
async fn stale_failure_does_not_touch_newer_request() {
    let list = controller(ScriptedSearch::new(Vec::new()));
    let older = list.begin_fetch(FilterSet::default(), PageCursor::new(1, 5)).await;
    let newer = list.begin_fetch(FilterSet::default(), PageCursor::new(2, 5)).await;

    let outcome = list
        .apply_response(older.generation, Err(server_error(500)))
        .await;
    assert_eq!(outcome, FetchOutcome::Discarded);
    assert_eq!(list.snapshot().await.phase, ListPhase::Loading);

    list.apply_response(newer.generation, Ok(page_of(&[9], 2, 6)))
        .await;
    let snapshot = list.snapshot().await;
    assert_eq!(snapshot.phase, ListPhase::Success);
    assert_eq!(snapshot.last_failure, None);
}

#[tokio::test]
async fn failure_keeps_last_good_page() {
    let api = ScriptedSearch::new(vec![
        Ok(page_of(&[1, 2], 1, 2)),
        Err(server_error(502)),
        Err(FetchError::MalformedResponse("expected value".to_string())),
    ]);
    let list = controller(api);

    list.refresh().await;
    assert_eq!(
        list.refresh().await,
        FetchOutcome::Applied(ListPhase::Error)
    );
    let snapshot = list.snapshot().await;
    assert_eq!(snapshot.phase, ListPhase::Error);
    assert_eq!(snapshot.last_failure, Some(FailureKind::Server));
    assert_eq!(ids(&snapshot.result.items), vec![1, 2]);

    list.refresh().await;
    let snapshot = list.snapshot().await;
    assert_eq!(snapshot.last_failure, Some(FailureKind::MalformedResponse));
    assert_eq!(ids(&snapshot.result.items), vec![1, 2]);
}

#[tokio::test]
async fn loading_keeps_previous_rows_visible() {
    let api = ScriptedSearch::new(vec![Ok(page_of(&[1, 2], 2, 7))]);
    let list = controller(api);
    list.refresh().await;

    list.begin_fetch(FilterSet::default(), PageCursor::new(2, 5))
        .await;
    let snapshot = list.snapshot().await;
    assert!(snapshot.is_loading());
    assert_eq!(ids(&snapshot.result.items), vec![1, 2]);
}

#[tokio::test]
async fn missing_meta_defaults_to_one_page() {
    let api = ScriptedSearch::new(vec![Ok(SalesRepPage {
        data: page_of(&[3], 1, 1).data,
        meta: None,
    })]);
    let list = controller(api);

    list.refresh().await;
    let snapshot = list.snapshot().await;
    assert_eq!(snapshot.result.total_pages, 1);
    assert_eq!(snapshot.result.total_items, 0);
}

#[tokio::test]
async fn clear_twice_matches_clear_once() {
    let api = ScriptedSearch::new(vec![
        Ok(page_of(&[1], 3, 11)),
        Ok(page_of(&[6], 3, 11)),
        Ok(page_of(&[1, 2, 3, 4, 5], 3, 11)),
        Ok(page_of(&[1, 2, 3, 4, 5], 3, 11)),
    ]);
    let list = controller(api.clone());

    list.edit_filter(FilterField::Role, "  Manager ").await;
    list.submit_search().await;
    list.go_to_page(2).await;

    list.clear().await;
    let once = list.snapshot().await;
    list.clear().await;
    let twice = list.snapshot().await;

    assert_eq!(once.draft, FilterSet::default());
    assert_eq!(once.filters, FilterSet::default());
    assert_eq!(once.cursor, PageCursor::new(1, 5));
    assert_eq!(once.draft, twice.draft);
    assert_eq!(once.filters, twice.filters);
    assert_eq!(once.cursor, twice.cursor);
    assert_eq!(api.last_query().to_query_string(), "page=1&page_size=5");
}

#[tokio::test]
async fn page_requests_are_clamped_to_known_bounds() {
    let api = ScriptedSearch::new(vec![
        Ok(page_of(&[1], 3, 11)),
        Ok(page_of(&[11], 3, 11)),
        Ok(page_of(&[1], 3, 11)),
    ]);
    let list = controller(api.clone());
    list.refresh().await;

    list.go_to_page(10).await;
    assert_eq!(api.last_query().page(), 3);
    assert_eq!(list.snapshot().await.cursor.page, 3);
    assert_eq!(list.next_page().await, FetchOutcome::Blocked);

    list.go_to_page(-4).await;
    assert_eq!(api.last_query().page(), 1);
}

#[tokio::test]
async fn page_navigation_reuses_submitted_filters_not_draft() {
    let api = ScriptedSearch::new(vec![
        Ok(page_of(&[1], 2, 6)),
        Ok(page_of(&[6], 2, 6)),
    ]);
    let list = controller(api.clone());

    list.edit_filter(FilterField::Region, "Europe").await;
    list.submit_search().await;
    list.edit_filter(FilterField::Region, "Middle East").await;
    list.next_page().await;

    let query = api.last_query();
    assert_eq!(query.get("region"), Some("Europe"));
    assert_eq!(query.page(), 2);
}

#[tokio::test]
async fn submit_search_restarts_from_first_page() {
    let api = ScriptedSearch::new(vec![
        Ok(page_of(&[1], 3, 12)),
        Ok(page_of(&[6], 3, 12)),
        Ok(page_of(&[2], 1, 1)),
    ]);
    let list = controller(api.clone());
    list.refresh().await;
    list.next_page().await;
    assert_eq!(list.snapshot().await.cursor.page, 2);

    list.edit_filter(FilterField::Skills, "Negotiation").await;
    list.submit_search().await;

    assert_eq!(api.last_query().page(), 1);
    assert_eq!(list.snapshot().await.cursor.page, 1);
}

#[tokio::test]
async fn shrinking_result_pulls_cursor_back_into_range() {
    let api = ScriptedSearch::new(vec![Ok(page_of(&[], 2, 8)), Ok(page_of(&[6, 7, 8], 2, 8))]);
    let list = controller(api.clone());

    let outcome = list
        .request_list(FilterSet::default(), PageCursor::new(4, 5))
        .await;
    assert_eq!(outcome, FetchOutcome::Applied(ListPhase::Success));

    let pages: Vec<u32> = api.queries().iter().map(|query| query.page()).collect();
    assert_eq!(pages, vec![4, 2]);

    let snapshot = list.snapshot().await;
    assert_eq!(snapshot.cursor.page, 2);
    assert_eq!(ids(&snapshot.result.items), vec![6, 7, 8]);
    assert!(snapshot.controls().prev_enabled);
    assert!(!snapshot.controls().next_enabled);
}

#[tokio::test]
async fn in_range_page_is_fetched_once() {
    let api = ScriptedSearch::new(vec![Ok(page_of(&[6], 2, 6))]);
    let list = controller(api.clone());

    list.request_list(FilterSet::default(), PageCursor::new(2, 5))
        .await;
    assert_eq!(api.queries().len(), 1);
    assert_eq!(list.snapshot().await.cursor.page, 2);
}

#[tokio::test]
async fn page_size_change_fetches_first_page() {
    let api = ScriptedSearch::new(vec![
        Ok(page_of(&[1], 3, 12)),
        Ok(page_of(&[6], 3, 12)),
        Ok(page_of(&[1, 2], 2, 12)),
    ]);
    let list = controller(api.clone());
    list.refresh().await;
    list.next_page().await;

    list.set_page_size(10).await;
    let query = api.last_query();
    assert_eq!(query.get("page_size"), Some("10"));
    assert_eq!(query.page(), 1);
    assert_eq!(list.snapshot().await.cursor, PageCursor::new(1, 10));
}

#[tokio::test]
async fn expired_request_reports_timeout() {
    let list = ListFetchController::new(Arc::new(SilentBackend), 5, Duration::from_millis(20));

    let outcome = list.refresh().await;
    assert_eq!(outcome, FetchOutcome::Applied(ListPhase::Error));
    assert_eq!(
        list.snapshot().await.last_failure,
        Some(FailureKind::Timeout)
    );
}
