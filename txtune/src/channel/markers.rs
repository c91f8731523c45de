//! Literal marker sets for prompt detection.

use std::fmt;

use memchr::memmem::Finder;

/// An ordered set of literal substrings to wait for.
///
/// Markers are matched as plain substrings, never as regexes, and are tried
/// in the order they were given.
#[derive(Debug, Clone)]
pub struct MarkerSet {
    finders: Vec<Finder<'static>>,
    longest: usize,
}

impl MarkerSet {
    /// Build a marker set from literal strings.
    pub fn new<I, M>(markers: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: AsRef<str>,
    {
        let finders: Vec<Finder<'static>> = markers
            .into_iter()
            .map(|m| Finder::new(m.as_ref().as_bytes()).into_owned())
            .collect();
        let longest = finders.iter().map(|f| f.needle().len()).max().unwrap_or(0);

        Self { finders, longest }
    }

    /// Index of the first marker (in set order) present in `haystack`.
    pub fn find_in(&self, haystack: &[u8]) -> Option<usize> {
        self.finders
            .iter()
            .position(|finder| finder.find(haystack).is_some())
    }

    /// The marker text at `index`.
    pub fn marker(&self, index: usize) -> Option<&str> {
        self.finders
            .get(index)
            .and_then(|f| std::str::from_utf8(f.needle()).ok())
    }

    /// Length in bytes of the longest marker.
    pub fn longest(&self) -> usize {
        self.longest
    }

}

impl fmt::Display for MarkerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, finder) in self.finders.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{:?}", String::from_utf8_lossy(finder.needle()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_anywhere_matches() {
        let markers = MarkerSet::new(["~#"]);
        assert_eq!(markers.find_in(b"root@XiaoQiang:~# "), Some(0));
        assert_eq!(markers.find_in(b"~#"), Some(0));
        assert_eq!(markers.find_in(b"root@XiaoQiang:~$ "), None);
    }

    #[test]
    fn test_first_marker_in_set_order_wins() {
        let markers = MarkerSet::new(["~#", "incorrect"]);
        assert_eq!(markers.find_in(b"Login incorrect\r\n~#"), Some(0));
        assert_eq!(markers.find_in(b"Login incorrect\r\n"), Some(1));
        assert_eq!(markers.marker(1), Some("incorrect"));
        assert_eq!(markers.to_string(), r#""~#" | "incorrect""#);
    }

    #[test]
    fn test_markers_are_literal() {
        let markers = MarkerSet::new(["a.b"]);
        assert_eq!(markers.find_in(b"axb"), None);
        assert_eq!(markers.find_in(b"a.b"), Some(0));
    }

    #[test]
    fn test_empty_set_never_matches() {
        let markers = MarkerSet::new(Vec::<String>::new());
        assert_eq!(markers.longest(), 0);
        assert_eq!(markers.find_in(b"anything"), None);
    }
}
