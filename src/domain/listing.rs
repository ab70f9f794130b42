//! List screen rules: query-string parsing, page math and the proposal
//! status flag table.

use serde::Serialize;

/// Rows per list page.
pub const PAGE_SIZE: u64 = 10;

/// Query flags understood by the proposal list, checked in this order.
/// Each maps the flag name to the status code it selects.
pub const STATUS_FLAGS: [(&str, &str); 5] = [
    ("c", "c"),
    ("elab", "elab"),
    ("p", "p"),
    ("co", "co"),
    ("a", "a"),
];

/// Parameters of a list request. Parsing never fails: anything malformed
/// is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    search: Option<String>,
    /// 1-based page number
    pub page: u64,
    keys: Vec<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            search: None,
            page: 1,
            keys: Vec::new(),
        }
    }
}

impl ListParams {
    /// Parse a raw `application/x-www-form-urlencoded` query string.
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(raw) = raw else {
            return params;
        };

        for pair in raw.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let (Some(key), Some(value)) = (decode_component(key), decode_component(value))
            else {
                continue;
            };

            match key.as_str() {
                "search_box" => {
                    let trimmed = value.trim();
                    params.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
                }
                "page" => {
                    params.page = value.trim().parse::<u64>().ok().filter(|p| *p >= 1).unwrap_or(1);
                }
                _ => {}
            }
            params.keys.push(key);
        }

        params
    }

    /// Free-text filter, if a non-blank one was supplied.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Whether `key` appeared in the query string, with or without a value.
    pub fn has_key(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// First status flag present, in `STATUS_FLAGS` order.
    pub fn status_flag(&self) -> Option<&'static str> {
        STATUS_FLAGS
            .iter()
            .find(|(flag, _)| self.has_key(flag))
            .map(|(_, code)| *code)
    }

    /// Zero-based page index for the store paginator.
    pub fn page_index(&self) -> u64 {
        self.page.saturating_sub(1)
    }
}

/// Case folding shared by stored search keys and the search query. SQLite's
/// own `LOWER`/`LIKE` only fold ASCII.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(|s| s.into_owned())
}

/// Pagination metadata for a rendered list page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub number: u64,
    pub num_pages: u64,
    pub page_size: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageInfo {
    pub fn new(number: u64, count: u64) -> Self {
        let num_pages = count.div_ceil(PAGE_SIZE).max(1);
        Self {
            number,
            num_pages,
            page_size: PAGE_SIZE,
            has_next: number < num_pages,
            has_previous: number > 1,
        }
    }
}
