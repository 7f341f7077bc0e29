// List endpoint options
//
// Three compositional layers: paging, free-text search, and a time window.
// Each renders itself into `QueryParams` for the engine to append.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, SecondsFormat};

/// Default field the search term is matched against.
pub const DEFAULT_SEARCH_FIELD: &str = "name__icontains";

// ── QueryParams ──────────────────────────────────────────────────────

/// Order-insensitive multimap of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, Vec<String>>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `key`, keeping existing values.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Replace all values under `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), vec![value.into()]);
        self
    }

    /// First value under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.0.get(key).map_or(&[], Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge every pair from `other` into `self`.
    pub fn extend(&mut self, other: QueryParams) {
        for (key, values) in other.0 {
            self.0.entry(key).or_default().extend(values);
        }
    }

    /// Flattened `(key, value)` pairs, keys in sorted order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.add(k, v);
        }
        params
    }
}

// ── ListOptions ──────────────────────────────────────────────────────

/// Paging for list endpoints. Zero means "let the Controller decide".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: u32,
    pub offset: u32,
}

impl ListOptions {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    pub fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        if self.limit > 0 {
            query.set("limit", self.limit.to_string());
        }
        if self.offset > 0 {
            query.set("offset", self.offset.to_string());
        }
        query
    }
}

// ── SearchableListOptions ────────────────────────────────────────────

/// Paging plus a case-insensitive substring search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchableListOptions {
    pub list: ListOptions,
    pub search: String,
    /// Query key the search term is sent under.
    pub search_field: String,
}

impl Default for SearchableListOptions {
    fn default() -> Self {
        Self {
            list: ListOptions::default(),
            search: String::new(),
            search_field: DEFAULT_SEARCH_FIELD.to_owned(),
        }
    }
}

impl SearchableListOptions {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..Self::default()
        }
    }

    pub fn with_paging(mut self, limit: u32, offset: u32) -> Self {
        self.list = ListOptions::new(limit, offset);
        self
    }

    pub fn with_search_field(mut self, field: impl Into<String>) -> Self {
        self.search_field = field.into();
        self
    }

    pub fn to_query(&self) -> QueryParams {
        self.to_query_with_field(&self.search_field)
    }

    /// Same as [`to_query`](Self::to_query) but sends the search term under
    /// `field`. An empty `field` is sent as-is.
    pub fn to_query_with_field(&self, field: &str) -> QueryParams {
        let mut query = self.list.to_query();
        if !self.search.is_empty() {
            query.set(field, self.search.clone());
        }
        query
    }

    /// Query for endpoints whose natural search key is not `name`.
    ///
    /// An explicitly chosen `search_field` is honoured; the default one is
    /// replaced by `fallback`.
    pub fn to_query_or_field(&self, fallback: &str) -> QueryParams {
        self.to_query_with_field(self.field_or(fallback))
    }

    fn field_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.search_field == DEFAULT_SEARCH_FIELD {
            fallback
        } else {
            &self.search_field
        }
    }
}

// ── TimeFilteredListOptions ──────────────────────────────────────────

/// Searchable listing restricted to a time window (history endpoints).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeFilteredListOptions {
    pub searchable: SearchableListOptions,
    /// Inclusive lower bound on `start_time`.
    pub start_time: Option<DateTime<FixedOffset>>,
    /// Exclusive upper bound on `end_time`.
    pub end_time: Option<DateTime<FixedOffset>>,
}

impl TimeFilteredListOptions {
    pub fn between(
        start: impl Into<DateTime<FixedOffset>>,
        end: impl Into<DateTime<FixedOffset>>,
    ) -> Self {
        Self {
            start_time: Some(start.into()),
            end_time: Some(end.into()),
            ..Self::default()
        }
    }

    pub fn to_query(&self) -> QueryParams {
        let mut query = self.searchable.to_query();
        self.apply_window(&mut query);
        query
    }

    pub fn to_query_with_field(&self, field: &str) -> QueryParams {
        let mut query = self.searchable.to_query_with_field(field);
        self.apply_window(&mut query);
        query
    }

    pub fn to_query_or_field(&self, fallback: &str) -> QueryParams {
        let mut query = self.searchable.to_query_or_field(fallback);
        self.apply_window(&mut query);
        query
    }

    fn apply_window(&self, query: &mut QueryParams) {
        if let Some(start) = self.start_time {
            query.set("start_time__gte", rfc3339(start));
        }
        if let Some(end) = self.end_time {
            query.set("end_time__lt", rfc3339(end));
        }
    }
}

/// RFC 3339 with whole seconds; UTC renders as `Z`, other zones keep their offset.
fn rfc3339(t: DateTime<FixedOffset>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn zero_paging_is_omitted() {
        assert!(ListOptions::default().to_query().is_empty());
        let q = ListOptions::new(0, 40).to_query();
        assert_eq!(q.get("offset"), Some("40"));
        assert!(!q.contains_key("limit"));
    }

    #[test]
    fn paging_values_are_written() {
        let q = ListOptions::new(25, 50).to_query();
        assert_eq!(q.get("limit"), Some("25"));
        assert_eq!(q.get("offset"), Some("50"));
    }

    #[test]
    fn search_uses_default_field() {
        let q = SearchableListOptions::new("board").to_query();
        assert_eq!(q.get("name__icontains"), Some("board"));
    }

    #[test]
    fn empty_search_is_omitted() {
        let q = SearchableListOptions::default().with_paging(10, 0).to_query();
        assert_eq!(q.pairs().collect::<Vec<_>>(), vec![("limit", "10")]);
    }

    #[test]
    fn custom_and_empty_search_fields() {
        let opts = SearchableListOptions::new("alice");
        let q = opts.to_query_with_field("display_name__icontains");
        assert_eq!(q.get("display_name__icontains"), Some("alice"));
        assert!(!q.contains_key("name__icontains"));

        let q = opts.to_query_with_field("");
        assert_eq!(q.get(""), Some("alice"));
    }

    #[test]
    fn explicit_search_field_beats_fallback() {
        let q = SearchableListOptions::new("bob").to_query_or_field("display_name__icontains");
        assert_eq!(q.get("display_name__icontains"), Some("bob"));

        let q = SearchableListOptions::new("bob")
            .with_search_field("source_alias__icontains")
            .to_query_or_field("display_name__icontains");
        assert_eq!(q.get("source_alias__icontains"), Some("bob"));
        assert!(!q.contains_key("display_name__icontains"));
    }

    #[test]
    fn time_window_formats_rfc3339_and_truncates() {
        let start = Utc
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .unwrap()
            .checked_add_signed(chrono::Duration::nanoseconds(987_654_321))
            .unwrap();
        let tz = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let end = tz.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();

        let q = TimeFilteredListOptions::between(start, end).to_query();
        assert_eq!(q.get("start_time__gte"), Some("2024-01-02T03:04:05Z"));
        assert_eq!(q.get("end_time__lt"), Some("2024-01-03T00:00:00+05:30"));
    }

    #[test]
    fn time_window_composes_with_search() {
        let opts = TimeFilteredListOptions {
            searchable: SearchableListOptions::new("vmr").with_paging(5, 0),
            start_time: None,
            end_time: Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap().into()),
        };
        let q = opts.to_query_with_field("conference_name__icontains");
        assert_eq!(
            q.pairs().collect::<Vec<_>>(),
            vec![
                ("conference_name__icontains", "vmr"),
                ("end_time__lt", "2024-06-01T00:00:00Z"),
                ("limit", "5"),
            ]
        );
    }

    #[test]
    fn query_params_multi_values() {
        let mut q: QueryParams = [("tag", "a")].into_iter().collect();
        q.add("tag", "b");
        assert_eq!(q.get_all("tag"), ["a", "b"]);
        q.set("tag", "c");
        assert_eq!(q.get_all("tag"), ["c"]);
    }
}
