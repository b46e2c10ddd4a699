//! Fake backends shared by the controller tests.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use shared::{
    domain::RecordId,
    error::FetchError,
    protocol::{ListMeta, SalesRep, SalesRepPage},
};
use tokio::sync::oneshot;

use crate::{
    query::ListQuery,
    transport::{AnswerApi, SearchApi},
};

pub(crate) type PageReply = Result<SalesRepPage, FetchError>;
pub(crate) type AnswerReply = Result<String, FetchError>;

pub(crate) fn rep(id: i64, name: &str) -> SalesRep {
    SalesRep {
        id: Some(RecordId(id)),
        name: Some(name.to_string()),
        ..SalesRep::default()
    }
}

pub(crate) fn page_of(ids: &[i64], total_pages: u32, total_items: u64) -> SalesRepPage {
    SalesRepPage {
        data: ids.iter().map(|id| rep(*id, &format!("rep-{id}"))).collect(),
        meta: Some(ListMeta {
            total_pages: Some(total_pages),
            total_items: Some(total_items),
            ..ListMeta::default()
        }),
    }
}

pub(crate) fn ids(items: &[SalesRep]) -> Vec<i64> {
    items
        .iter()
        .filter_map(|rep| rep.key().map(|key| key.0))
        .collect()
}

pub(crate) fn server_error(status: u16) -> FetchError {
    FetchError::Server {
        status,
        detail: None,
    }
}

/// Replies immediately from a queue; an exhausted queue reads as a network error.
#[derive(Default)]
pub(crate) struct ScriptedSearch {
    replies: Mutex<VecDeque<PageReply>>,
    queries: Mutex<Vec<ListQuery>>,
}

impl ScriptedSearch {
    pub(crate) fn new(replies: Vec<PageReply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn queries(&self) -> Vec<ListQuery> {
        self.queries.lock().expect("queries lock").clone()
    }

    pub(crate) fn last_query(&self) -> ListQuery {
        self.queries().pop().expect("at least one query")
    }
}

#[async_trait]
impl SearchApi for ScriptedSearch {
    async fn search(&self, query: &ListQuery) -> Result<SalesRepPage, FetchError> {
        self.queries
            .lock()
            .expect("queries lock")
            .push(query.clone());
        self.replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Network("script exhausted".to_string())))
    }
}

/// Holds each request open until the test releases the reply for its page.
#[derive(Default)]
pub(crate) struct GatedSearch {
    gates: Mutex<HashMap<u32, oneshot::Receiver<PageReply>>>,
}

impl GatedSearch {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn gate(&self, page: u32) -> oneshot::Sender<PageReply> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().expect("gates lock").insert(page, rx);
        tx
    }
}

#[async_trait]
impl SearchApi for GatedSearch {
    async fn search(&self, query: &ListQuery) -> Result<SalesRepPage, FetchError> {
        let rx = {
            let mut gates = self.gates.lock().expect("gates lock");
            gates.remove(&query.page())
        };
        match rx {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(FetchError::Network("gate dropped".to_string()))),
            None => Err(FetchError::Network(format!("no gate for page {}", query.page()))),
        }
    }
}

/// Never answers; used to exercise request timeouts.
pub(crate) struct SilentBackend;

#[async_trait]
impl SearchApi for SilentBackend {
    async fn search(&self, _query: &ListQuery) -> Result<SalesRepPage, FetchError> {
        futures::future::pending().await
    }
}

#[async_trait]
impl AnswerApi for SilentBackend {
    async fn ask(&self, _question: &str) -> Result<String, FetchError> {
        futures::future::pending().await
    }
}

#[derive(Default)]
pub(crate) struct ScriptedAnswers {
    replies: Mutex<VecDeque<AnswerReply>>,
    questions: Mutex<Vec<String>>,
}

impl ScriptedAnswers {
    pub(crate) fn new(replies: Vec<AnswerReply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            questions: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn questions(&self) -> Vec<String> {
        self.questions.lock().expect("questions lock").clone()
    }
}

#[async_trait]
impl AnswerApi for ScriptedAnswers {
    async fn ask(&self, question: &str) -> Result<String, FetchError> {
        self.questions
            .lock()
            .expect("questions lock")
            .push(question.to_string());
        self.replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Network("script exhausted".to_string())))
    }
}
