use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(RecordId);

pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Region values offered by the dashboard's region picker.
pub const KNOWN_REGIONS: [&str; 5] = [
    "North America",
    "Europe",
    "Asia-Pacific",
    "South America",
    "Middle East",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Name,
    Role,
    Region,
    Skills,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Name,
        FilterField::Role,
        FilterField::Region,
        FilterField::Skills,
    ];

    pub fn query_key(self) -> &'static str {
        match self {
            FilterField::Name => "name",
            FilterField::Role => "role",
            FilterField::Region => "region",
            FilterField::Skills => "skills",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "name" => Some(FilterField::Name),
            "role" => Some(FilterField::Role),
            "region" => Some(FilterField::Region),
            "skills" | "skill" => Some(FilterField::Skills),
            _ => None,
        }
    }
}

/// Free-text filters applied to a list query. Empty strings mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub skills: String,
}

impl FilterSet {
    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Name => &self.name,
            FilterField::Role => &self.role,
            FilterField::Region => &self.region,
            FilterField::Skills => &self.skills,
        }
    }

    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let slot = match field {
            FilterField::Name => &mut self.name,
            FilterField::Role => &mut self.role,
            FilterField::Region => &mut self.region,
            FilterField::Skills => &mut self.skills,
        };
        *slot = value.into();
    }

    /// Fields whose value is non-empty after trimming, with the trimmed value.
    pub fn active(&self) -> impl Iterator<Item = (FilterField, &str)> + '_ {
        FilterField::ALL.into_iter().filter_map(|field| {
            let value = self.get(field).trim();
            (!value.is_empty()).then_some((field, value))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }
}

/// Page position of the list. Both fields are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    pub page: u32,
    pub page_size: u32,
}

impl PageCursor {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn first(page_size: u32) -> Self {
        Self::new(1, page_size)
    }

    pub fn with_page(self, page: u32) -> Self {
        Self::new(page, self.page_size)
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}
