//! List request interpretation: filter parsing and pagination.
//!
//! Only one filter shape is understood: a single `userName eq "<value>"`
//! clause (attribute name matched case-insensitively). Anything else,
//! including compound or unparseable expressions, leaves the listing
//! unfiltered rather than failing the request.

use scimlet_core::store::UserFilter;
use serde::{Deserialize, Deserializer, de};

/// `startIndex` when the client sends none.
pub const DEFAULT_START_INDEX: i64 = 1;
/// `count` when the client sends none.
pub const DEFAULT_COUNT: i64 = 100;

/// Raw query parameters of `GET /Users`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub filter:      Option<String>,
  /// 1-based index of the first result to return.
  #[serde(default, deserialize_with = "empty_as_none")]
  pub start_index: Option<i64>,
  /// Maximum number of results to return.
  #[serde(default, deserialize_with = "empty_as_none")]
  pub count:       Option<i64>,
}

/// `?count=` with no value is treated the same as no `count` at all.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<String>::deserialize(deserializer)? {
    Some(s) if !s.trim().is_empty() => {
      s.trim().parse().map(Some).map_err(de::Error::custom)
    }
    _ => Ok(None),
  }
}

/// A normalised list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
  pub filter:      UserFilter,
  /// Always at least 1.
  pub start_index: i64,
  /// Always at least 0.
  pub count:       i64,
}

impl From<ListParams> for ListQuery {
  fn from(p: ListParams) -> Self {
    ListQuery {
      filter:      parse_filter(p.filter.as_deref()),
      start_index: p.start_index.unwrap_or(DEFAULT_START_INDEX).max(1),
      count:       p.count.unwrap_or(DEFAULT_COUNT).max(0),
    }
  }
}

/// One page of a filtered result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
  /// Size of the full filtered set, not of this page.
  pub total_results: usize,
  pub resources:     Vec<T>,
}

impl ListQuery {
  /// Skip the first `start_index - 1` items and keep at most `count`.
  pub fn paginate<T>(&self, items: Vec<T>) -> Page<T> {
    let total_results = items.len();
    let skip = usize::try_from(self.start_index - 1).unwrap_or(0);
    let take = usize::try_from(self.count).unwrap_or(0);
    Page {
      total_results,
      resources: items.into_iter().skip(skip).take(take).collect(),
    }
  }
}

/// Parse a SCIM filter expression into a [`UserFilter`].
pub fn parse_filter(filter: Option<&str>) -> UserFilter {
  let Some(filter) = filter.map(str::trim).filter(|f| !f.is_empty()) else {
    return UserFilter::default();
  };

  let mut terms = filter.split(" eq ");
  let (Some(attribute), Some(operand), None) =
    (terms.next(), terms.next(), terms.next())
  else {
    return UserFilter::default();
  };

  let value = operand
    .trim()
    .strip_prefix('"')
    .and_then(|v| v.strip_suffix('"'))
    .filter(|v| !v.contains('"') && !v.trim().is_empty());

  match value {
    Some(v) if attribute.trim().eq_ignore_ascii_case("username") => UserFilter {
      user_name: Some(v.to_owned()),
    },
    _ => UserFilter::default(),
  }
}
