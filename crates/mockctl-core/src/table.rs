// ── Table view model ──
//
// Client-side pagination, sorting and filtering over a fully loaded
// collection. Every reload runs filter → sort → slice and recomputes
// `total` from the filtered set, so the page and the count never drift.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::CoreError;
use crate::model::{Record, display_value};

pub const DEFAULT_PAGE_SIZE: usize = 10;

// ── Sorting ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Sort a table by one field.
///
/// Parses from `name`, `-name` (descending) or `name desc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Same field, opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            field: self.field.clone(),
            direction: match self.direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            },
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction)
    }
}

impl FromStr for SortSpec {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(field) = s.strip_prefix('-') {
            return Ok(Self::desc(field.trim()));
        }
        let mut parts = s.split_whitespace();
        let field = parts
            .next()
            .ok_or_else(|| CoreError::validation("empty sort field"))?;
        let direction = match parts.next() {
            None => SortDirection::Asc,
            Some(dir) => dir
                .to_ascii_lowercase()
                .parse()
                .map_err(|_| CoreError::validation(format!("unknown sort direction {dir:?}")))?,
        };
        Ok(Self {
            field: field.to_owned(),
            direction,
        })
    }
}

/// Compare two field values: numbers numerically, strings without
/// regard to case, `false < true`, missing values last.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => display_value(x)
            .to_lowercase()
            .cmp(&display_value(y).to_lowercase()),
    }
}

/// Stable sort of `data` by `spec`. Missing values stay last in both
/// directions.
pub fn order_by<R: Record>(data: Vec<R>, spec: &SortSpec) -> Vec<R> {
    let mut keyed: Vec<(Option<Value>, R)> = data
        .into_iter()
        .map(|record| (record.field(&spec.field), record))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| {
        let a = a.as_ref().filter(|v| !v.is_null());
        let b = b.as_ref().filter(|v| !v.is_null());
        match (a, b) {
            (Some(_), Some(_)) => {
                let ord = compare_values(a, b);
                match spec.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            }
            _ => compare_values(a, b),
        }
    });
    keyed.into_iter().map(|(_, record)| record).collect()
}

// ── Filtering ────────────────────────────────────────────────────

fn field_texts(value: &Value) -> Vec<String> {
    match value {
        Value::Object(map) => map.values().map(|v| display_value(v).to_lowercase()).collect(),
        other => vec![display_value(other).to_lowercase()],
    }
}

/// Keep records where every whitespace-separated token of `term` occurs,
/// case-insensitively, in at least one field value. An empty or absent
/// term keeps everything.
pub fn custom_and_search<R: Record>(data: &[R], term: Option<&str>) -> Vec<R> {
    let tokens: Vec<String> = term
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    if tokens.is_empty() {
        return data.to_vec();
    }

    data.iter()
        .filter(|record| {
            let texts = field_texts(&record.to_json());
            tokens
                .iter()
                .all(|token| texts.iter().any(|text| text.contains(token.as_str())))
        })
        .cloned()
        .collect()
}

// ── TableView ────────────────────────────────────────────────────

/// Paging, sorting and filter state of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableParams {
    /// 1-based page index.
    pub page: usize,
    /// Rows per page.
    pub count: usize,
    pub sorting: Option<SortSpec>,
    pub filter: Option<String>,
    /// Number of rows matching the filter, before paging.
    pub total: usize,
}

impl Default for TableParams {
    fn default() -> Self {
        Self {
            page: 1,
            count: DEFAULT_PAGE_SIZE,
            sorting: Some(SortSpec::asc("name")),
            filter: None,
            total: 0,
        }
    }
}

impl TableParams {
    /// Number of pages for the current `total`; at least one.
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.count.max(1)).max(1)
    }
}

/// A loaded collection plus the page currently shown.
#[derive(Debug, Clone)]
pub struct TableView<R> {
    data: Vec<R>,
    params: TableParams,
    rows: Vec<R>,
}

impl<R: Record> TableView<R> {
    pub fn new(data: Vec<R>) -> Self {
        Self::with_params(data, TableParams::default())
    }

    pub fn with_params(data: Vec<R>, params: TableParams) -> Self {
        let mut view = Self {
            data,
            params,
            rows: Vec::new(),
        };
        view.reload();
        view
    }

    /// Re-run filter, sort and slice over the full collection.
    pub fn reload(&mut self) {
        let filtered = custom_and_search(&self.data, self.params.filter.as_deref());
        let ordered = match &self.params.sorting {
            Some(spec) => order_by(filtered, spec),
            None => filtered,
        };
        self.params.total = ordered.len();

        let count = self.params.count.max(1);
        let start = self.params.page.saturating_sub(1).saturating_mul(count);
        self.rows = ordered.into_iter().skip(start).take(count).collect();
    }

    /// Set the filter term and reload. The page is kept.
    pub fn set_filter(&mut self, term: Option<String>) {
        self.params.filter = term.filter(|t| !t.trim().is_empty());
        self.reload();
    }

    pub fn set_page(&mut self, page: usize) {
        self.params.page = page.max(1);
        self.reload();
    }

    pub fn set_count(&mut self, count: usize) {
        self.params.count = count.max(1);
        self.reload();
    }

    pub fn set_sorting(&mut self, sorting: Option<SortSpec>) {
        self.params.sorting = sorting;
        self.reload();
    }

    pub fn next_page(&mut self) {
        if self.params.page < self.params.page_count() {
            self.set_page(self.params.page + 1);
        }
    }

    pub fn prev_page(&mut self) {
        if self.params.page > 1 {
            self.set_page(self.params.page - 1);
        }
    }

    /// Rows of the current page.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn params(&self) -> &TableParams {
        &self.params
    }

    pub fn total(&self) -> usize {
        self.params.total
    }

    /// The full, unfiltered collection.
    pub fn data(&self) -> &[R] {
        &self.data
    }
}
