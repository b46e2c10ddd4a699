//! Client-side coordination for the sales-rep dashboard: canonical list
//! queries, race-free list fetching, pagination bounds, row expansion and the
//! AI question channel.

pub mod ai_query;
pub mod expansion;
mod generation;
pub mod list_fetch;
pub mod pagination;
pub mod query;
pub mod session;
pub mod transport;

pub use ai_query::{AiExchange, AiPhase, AiQueryController, AiSnapshot, AskOutcome};
pub use expansion::ExpansionTracker;
pub use generation::Generation;
pub use list_fetch::{FetchOutcome, ListFetchController, ListPhase, ListResult, ListSnapshot};
pub use pagination::PageControls;
pub use query::{build_query, ListQuery};
pub use session::{
    CommandEffect, DashboardCommand, DashboardSession, DashboardSnapshot, SessionOptions,
};
pub use transport::{AnswerApi, HttpDashboardApi, SearchApi};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
