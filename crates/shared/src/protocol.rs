use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::RecordId;

/// Shown wherever a record field is absent or blank.
pub const PLACEHOLDER: &str = "N/A";

fn or_placeholder(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => PLACEHOLDER,
    }
}

/// Reads an explicit `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesRep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deals: Vec<Deal>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub clients: Vec<ClientInfo>,
}

impl SalesRep {
    pub fn key(&self) -> Option<RecordId> {
        self.id
    }

    pub fn display_name(&self) -> &str {
        or_placeholder(self.name.as_deref())
    }

    pub fn display_role(&self) -> &str {
        or_placeholder(self.role.as_deref())
    }

    pub fn display_region(&self) -> &str {
        or_placeholder(self.region.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Active,
    Pending,
    Neutral,
}

impl Deal {
    pub fn display_client(&self) -> &str {
        or_placeholder(self.client.as_deref())
    }

    pub fn display_status(&self) -> &str {
        or_placeholder(self.status.as_deref())
    }

    pub fn display_value(&self) -> String {
        match self.value {
            Some(value) if value.is_finite() => format_currency(value),
            _ => PLACEHOLDER.to_string(),
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self.status.as_deref().map(str::trim) {
            Some("Closed Won") => StatusTone::Active,
            Some("In Progress") => StatusTone::Pending,
            _ => StatusTone::Neutral,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl ClientInfo {
    pub fn display_name(&self) -> &str {
        or_placeholder(self.name.as_deref())
    }

    pub fn display_industry(&self) -> &str {
        or_placeholder(self.industry.as_deref())
    }

    pub fn display_contact(&self) -> &str {
        or_placeholder(self.contact.as_deref())
    }
}

/// Formats a deal value as dollars with thousands separators, e.g. `$75,000`.
pub fn format_currency(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let (whole, fraction) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if fraction == 0 {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped}.{fraction:02}")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_next: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_prev: Option<bool>,
}

/// Body of `GET /sales-reps`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesRepPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<SalesRep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ListMeta>,
}

impl SalesRepPage {
    /// Total pages reported by the server; absent or zero reads as 1.
    pub fn total_pages(&self) -> u32 {
        self.meta
            .as_ref()
            .and_then(|meta| meta.total_pages)
            .filter(|pages| *pages > 0)
            .unwrap_or(1)
    }

    pub fn total_items(&self) -> u64 {
        self.meta
            .as_ref()
            .and_then(|meta| meta.total_items)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}
