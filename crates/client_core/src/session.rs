//! One dashboard view: the list, the AI panel and the expanded row, driven by
//! typed commands from whatever front end is rendering it.

use std::{sync::Arc, time::Duration};

use shared::domain::{FilterField, RecordId, DEFAULT_PAGE_SIZE};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    ai_query::{AiQueryController, AiSnapshot, AskOutcome},
    expansion::ExpansionTracker,
    list_fetch::{FetchOutcome, ListFetchController, ListPhase, ListSnapshot},
    transport::{AnswerApi, SearchApi},
};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub page_size: u32,
    pub request_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardCommand {
    EditFilter { field: FilterField, value: String },
    SubmitSearch,
    ClearSearch,
    Refresh,
    GoToPage(i64),
    NextPage,
    PrevPage,
    SetPageSize(u32),
    ToggleRow(RecordId),
    Ask(String),
}

impl DashboardCommand {
    pub fn name(&self) -> &'static str {
        match self {
            DashboardCommand::EditFilter { .. } => "edit_filter",
            DashboardCommand::SubmitSearch => "submit_search",
            DashboardCommand::ClearSearch => "clear_search",
            DashboardCommand::Refresh => "refresh",
            DashboardCommand::GoToPage(_) => "go_to_page",
            DashboardCommand::NextPage => "next_page",
            DashboardCommand::PrevPage => "prev_page",
            DashboardCommand::SetPageSize(_) => "set_page_size",
            DashboardCommand::ToggleRow(_) => "toggle_row",
            DashboardCommand::Ask(_) => "ask",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandEffect {
    FilterEdited,
    List(FetchOutcome),
    Expansion(Option<RecordId>),
    Ai(AskOutcome),
}

#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub list: ListSnapshot,
    pub ai: AiSnapshot,
    pub expanded: Option<RecordId>,
}

pub struct DashboardSession {
    list: ListFetchController,
    ai: AiQueryController,
    expansion: Mutex<ExpansionTracker>,
}

impl DashboardSession {
    pub fn new<A>(api: Arc<A>, options: SessionOptions) -> Self
    where
        A: SearchApi + AnswerApi + 'static,
    {
        Self::with_apis(api.clone(), api, options)
    }

    pub fn with_apis(
        search: Arc<dyn SearchApi>,
        answers: Arc<dyn AnswerApi>,
        options: SessionOptions,
    ) -> Self {
        Self {
            list: ListFetchController::new(search, options.page_size, options.request_timeout),
            ai: AiQueryController::new(answers, options.request_timeout),
            expansion: Mutex::new(ExpansionTracker::default()),
        }
    }

    pub fn list(&self) -> &ListFetchController {
        &self.list
    }

    pub fn ai(&self) -> &AiQueryController {
        &self.ai
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            list: self.list.snapshot().await,
            ai: self.ai.snapshot().await,
            expanded: self.expansion.lock().await.expanded(),
        }
    }

    pub async fn dispatch(&self, command: DashboardCommand) -> CommandEffect {
        debug!(command = command.name(), "dashboard: dispatch");
        let outcome = match command {
            DashboardCommand::EditFilter { field, value } => {
                self.list.edit_filter(field, value).await;
                return CommandEffect::FilterEdited;
            }
            DashboardCommand::ToggleRow(key) => {
                let expanded = self.expansion.lock().await.toggle(key);
                return CommandEffect::Expansion(expanded);
            }
            DashboardCommand::Ask(question) => {
                return CommandEffect::Ai(self.ai.ask(&question).await);
            }
            DashboardCommand::SubmitSearch => self.list.submit_search().await,
            DashboardCommand::ClearSearch => self.list.clear().await,
            DashboardCommand::Refresh => self.list.refresh().await,
            DashboardCommand::GoToPage(page) => self.list.go_to_page(page).await,
            DashboardCommand::NextPage => self.list.next_page().await,
            DashboardCommand::PrevPage => self.list.prev_page().await,
            DashboardCommand::SetPageSize(size) => self.list.set_page_size(size).await,
        };

        if outcome == FetchOutcome::Applied(ListPhase::Success) {
            self.reconcile_expansion().await;
        }
        CommandEffect::List(outcome)
    }

    /// Collapses the expanded row if its record left the visible page.
    async fn reconcile_expansion(&self) {
        let snapshot = self.list.snapshot().await;
        let mut expansion = self.expansion.lock().await;
        if expansion.retain_visible(snapshot.result.keys()) {
            debug!("dashboard: expanded row no longer visible; collapsed");
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
