//! Plain-text rendering of dashboard snapshots.

use std::fmt::Write as _;

use client_core::{AiSnapshot, DashboardSnapshot, ListPhase, ListSnapshot};
use shared::{
    domain::RecordId,
    protocol::{SalesRep, StatusTone, PLACEHOLDER},
};

const LOADING_TEXT: &str = "Loading...";
const ERROR_TEXT: &str = "Could not refresh sales representatives; showing last loaded page.";

pub fn render_dashboard(snapshot: &DashboardSnapshot) -> String {
    let mut out = render_list(&snapshot.list, snapshot.expanded);
    if let Some(ai) = render_ai(&snapshot.ai) {
        out.push('\n');
        out.push_str(&ai);
    }
    out
}

pub fn render_list(list: &ListSnapshot, expanded: Option<RecordId>) -> String {
    let mut out = String::new();

    match list.phase {
        ListPhase::Loading => {
            let _ = writeln!(out, "{LOADING_TEXT}");
        }
        ListPhase::Error => {
            let _ = writeln!(out, "{ERROR_TEXT}");
        }
        ListPhase::Idle | ListPhase::Success => {}
    }

    let _ = writeln!(
        out,
        "{:<6} {:<24} {:<22} {:<16} {}",
        "ID", "NAME", "ROLE", "REGION", "SKILLS"
    );
    if list.result.items.is_empty() {
        let _ = writeln!(out, "{}", list.summary());
    }
    for rep in &list.result.items {
        let open = rep.key().is_some() && rep.key() == expanded;
        let _ = writeln!(
            out,
            "{} {:<4} {:<24} {:<22} {:<16} {}",
            if open { "v" } else { ">" },
            rep.key().map(|k| k.to_string()).unwrap_or_else(|| PLACEHOLDER.to_string()),
            rep.display_name(),
            rep.display_role(),
            rep.display_region(),
            rep.skills.join(", "),
        );
        if open {
            out.push_str(&render_details(rep));
        }
    }

    let controls = list.controls();
    let _ = writeln!(
        out,
        "{}  ({} total){}{}",
        controls.label(),
        list.result.total_items,
        if controls.prev_enabled { "  [prev]" } else { "" },
        if controls.next_enabled { "  [next]" } else { "" },
    );
    out
}

fn render_details(rep: &SalesRep) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "    Deals");
    if rep.deals.is_empty() {
        let _ = writeln!(out, "      {PLACEHOLDER}");
    }
    for deal in &rep.deals {
        let marker = match deal.tone() {
            StatusTone::Active => "+",
            StatusTone::Pending => "~",
            StatusTone::Neutral => "-",
        };
        let _ = writeln!(
            out,
            "      {:<20} {:>12}  {marker} {}",
            deal.display_client(),
            deal.display_value(),
            deal.display_status(),
        );
    }
    let _ = writeln!(out, "    Clients");
    if rep.clients.is_empty() {
        let _ = writeln!(out, "      {PLACEHOLDER}");
    }
    for client in &rep.clients {
        let _ = writeln!(
            out,
            "      {:<20} {:<16} {}",
            client.display_name(),
            client.display_industry(),
            client.display_contact(),
        );
    }
    out
}

pub fn render_ai(ai: &AiSnapshot) -> Option<String> {
    let exchange = ai.exchange.as_ref()?;
    let mut out = format!("Q: {}\n", exchange.question);
    if let Some(line) = exchange.status_line() {
        let _ = writeln!(out, "A: {line}");
    }
    Some(out)
}
