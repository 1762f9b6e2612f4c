//! In-memory record collections backing the mock endpoints.
//!
//! A `Collection` is an ordered `Vec` that supports both pagination styles
//! used by the API: skip/limit slicing and cursor windows that report the
//! identifiers on either side of the returned slice, from which handlers
//! build navigation links.

/// Default page size when a request does not set `limit`.
pub const DEFAULT_LIMIT: usize = 100;

/// A stored record, addressed by a string identifier.
pub trait Record: Clone {
    fn id(&self) -> &str;
}

/// Where a cursor window starts, relative to its marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// From the start of the collection.
    First,
    /// The final `limit` records.
    Last,
    /// Forward, starting at the marker (inclusive).
    Next,
    /// Backward, ending at the marker (inclusive).
    Prev,
}

/// A cursor slice plus its neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window<T> {
    pub items: Vec<T>,
    /// Identifier just before the slice; `None` when it starts the collection.
    pub previous: Option<String>,
    /// Identifier just after the slice; `None` when it reaches the end.
    pub next: Option<String>,
}

impl<T> Window<T> {
    fn empty() -> Self {
        Self {
            items: Vec::new(),
            previous: None,
            next: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Record> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T: Record> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, record: T) {
        self.items.push(record);
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|r| r.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|r| r.id() == id)
    }

    pub fn filter<'a>(&'a self, keep: impl Fn(&T) -> bool + 'a) -> impl Iterator<Item = &'a T> + 'a {
        self.items.iter().filter(move |r| keep(r))
    }

    /// Remove the record with `id`, keeping the order of the rest. Returns
    /// whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        self.remove_where(|r| r.id() == id) > 0
    }

    /// Remove every matching record; returns how many were removed.
    pub fn remove_where(&mut self, matches: impl Fn(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|r| !matches(r));
        before - self.items.len()
    }

    /// Offset slice, with `skip` and the slice end clamped to the length.
    pub fn slice(&self, skip: usize, limit: usize) -> &[T] {
        let len = self.items.len();
        let start = skip.min(len);
        let end = start.saturating_add(limit).min(len);
        &self.items[start..end]
    }

    /// Cursor window over the records whose identifier starts with `prefix`.
    ///
    /// An empty `marker` positions at the start. A marker that is not in the
    /// filtered sequence yields an empty window.
    pub fn window(&self, prefix: &str, direction: Direction, marker: &str, limit: usize) -> Window<T> {
        let filtered: Vec<&T> = self.items.iter().filter(|r| r.id().starts_with(prefix)).collect();
        let len = filtered.len();
        let position = |marker: &str| filtered.iter().position(|r| r.id() == marker);

        let (start, end) = match direction {
            Direction::First => (0, limit.min(len)),
            Direction::Last => (len.saturating_sub(limit), len),
            Direction::Next if marker.is_empty() => (0, limit.min(len)),
            Direction::Next => match position(marker) {
                Some(at) => (at, at.saturating_add(limit).min(len)),
                None => return Window::empty(),
            },
            Direction::Prev if marker.is_empty() => return Window::empty(),
            Direction::Prev => match position(marker) {
                Some(at) => ((at + 1).saturating_sub(limit), at + 1),
                None => return Window::empty(),
            },
        };

        Window {
            items: filtered[start..end].iter().map(|r| (*r).clone()).collect(),
            previous: start.checked_sub(1).map(|i| filtered[i].id().to_string()),
            next: filtered.get(end).map(|r| r.id().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Item(String);

    impl Record for Item {
        fn id(&self) -> &str {
            &self.0
        }
    }

    fn collection(ids: &[&str]) -> Collection<Item> {
        ids.iter().map(|id| Item(id.to_string())).collect()
    }

    fn ids(window: &Window<Item>) -> Vec<&str> {
        window.items.iter().map(|i| i.0.as_str()).collect()
    }

    fn ten() -> Collection<Item> {
        collection(&["a0", "a1", "a2", "a3", "a4", "a5", "a6", "a7", "a8", "a9"])
    }

    #[test]
    fn slice_clamps_skip_and_end() {
        let c = ten();
        assert!(c.slice(15, 5).is_empty());
        assert_eq!(c.slice(8, 5).len(), 2);
        assert_eq!(c.slice(0, 100).len(), 10);
        assert_eq!(c.slice(3, usize::MAX).len(), 7);
    }

    #[test]
    fn remove_reports_whether_anything_matched() {
        let mut c = ten();
        assert!(c.remove("a3"));
        assert_eq!(c.len(), 9);
        assert!(c.get("a3").is_none());
        assert!(!c.remove("a3"));
        assert_eq!(c.len(), 9);
        // Order of the rest survives.
        assert_eq!(c.slice(2, 2).iter().map(|i| i.0.as_str()).collect::<Vec<_>>(), ["a2", "a4"]);
    }

    #[test]
    fn window_from_start_reports_next_marker() {
        let w = ten().window("", Direction::Next, "", 3);
        assert_eq!(ids(&w), ["a0", "a1", "a2"]);
        assert_eq!(w.previous, None);
        assert_eq!(w.next.as_deref(), Some("a3"));
    }

    #[test]
    fn window_forward_from_marker_is_inclusive() {
        let w = ten().window("", Direction::Next, "a3", 3);
        assert_eq!(ids(&w), ["a3", "a4", "a5"]);
        assert_eq!(w.previous.as_deref(), Some("a2"));
        assert_eq!(w.next.as_deref(), Some("a6"));
    }

    #[test]
    fn window_reaching_the_end_has_no_next() {
        let w = ten().window("", Direction::Next, "a9", 3);
        assert_eq!(ids(&w), ["a9"]);
        assert_eq!(w.next, None);
        assert_eq!(w.previous.as_deref(), Some("a8"));
    }

    #[test]
    fn window_backward_ends_at_marker() {
        let w = ten().window("", Direction::Prev, "a5", 3);
        assert_eq!(ids(&w), ["a3", "a4", "a5"]);
        assert_eq!(w.previous.as_deref(), Some("a2"));
        assert_eq!(w.next.as_deref(), Some("a6"));

        let w = ten().window("", Direction::Prev, "a1", 3);
        assert_eq!(ids(&w), ["a0", "a1"]);
        assert_eq!(w.previous, None);
    }

    #[test]
    fn window_last_takes_the_tail() {
        let w = ten().window("", Direction::Last, "", 4);
        assert_eq!(ids(&w), ["a6", "a7", "a8", "a9"]);
        assert_eq!(w.previous.as_deref(), Some("a5"));
        assert_eq!(w.next, None);
    }

    #[test]
    fn window_filters_by_prefix() {
        let c = collection(&["news-1", "promo-1", "news-2", "promo-2", "news-3"]);
        let w = c.window("news", Direction::First, "", 2);
        assert_eq!(ids(&w), ["news-1", "news-2"]);
        assert_eq!(w.next.as_deref(), Some("news-3"));
    }

    #[test]
    fn unknown_marker_or_empty_backward_yields_empty_window() {
        assert_eq!(ten().window("", Direction::Next, "zz", 3), Window::empty());
        assert_eq!(ten().window("", Direction::Prev, "", 3), Window::empty());
        assert_eq!(collection(&[]).window("", Direction::Next, "", 3), Window::empty());
    }
}
