//! Page bounds. These predicates are the only gate on pagination controls.

/// Clamps a requested page into `[1, total_pages]`. A `total_pages` of zero is
/// treated as a single page.
pub fn clamp(page: i64, total_pages: u32) -> u32 {
    let upper = i64::from(total_pages.max(1));
    page.clamp(1, upper) as u32
}

/// Clamps against bounds that may not be known yet; only the lower bound
/// applies before the first successful fetch.
pub fn clamp_known(page: i64, total_pages: Option<u32>) -> u32 {
    match total_pages {
        Some(total) => clamp(page, total),
        None => page.clamp(1, i64::from(u32::MAX)) as u32,
    }
}

pub fn can_go_prev(page: u32) -> bool {
    page > 1
}

pub fn can_go_next(page: u32, total_pages: u32) -> bool {
    page < total_pages
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageControls {
    pub page: u32,
    pub total_pages: u32,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl PageControls {
    pub fn new(page: u32, total_pages: u32) -> Self {
        let total_pages = total_pages.max(1);
        Self {
            page,
            total_pages,
            prev_enabled: can_go_prev(page),
            next_enabled: can_go_next(page, total_pages),
        }
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages)
    }
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
