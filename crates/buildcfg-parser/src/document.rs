//! Parsed configuration document

use indexmap::IndexMap;
use indexmap::map::{Iter, Keys};
use serde::Serialize;

/// Key reserved for `=> ...` directive lines.
pub const PART_DEPENDENCIES_KEY: &str = "<part-dependencies>";

/// Keys and string values of one section, in first-insertion order.
///
/// Equality ignores order, so two sections with the same entries compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Section {
    entries: IndexMap<String, String>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> Keys<'_, String, String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> Iter<'_, String, String> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dependencies declared with `=>`, split on whitespace.
    pub fn part_dependencies(&self) -> Vec<&str> {
        self.get(PART_DEPENDENCIES_KEY)
            .map(|v| v.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Insert or overwrite a key, keeping its original position.
    pub(crate) fn insert(&mut self, key: String, value: String) {
        self.entries.insert(key, value);
    }

    pub fn into_inner(self) -> IndexMap<String, String> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Section {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Section {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Sections in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Document {
    sections: IndexMap<String, Section>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Look up a single value.
    ///
    /// # Example
    /// ```
    /// let doc = buildcfg_parser::parse_str("[s1]\na = 1\n", "example").unwrap();
    /// assert_eq!(doc.get("s1", "a"), Some("1"));
    /// assert_eq!(doc.get("s1", "b"), None);
    /// ```
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.get(key)
    }

    pub fn contains_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn section_names(&self) -> Keys<'_, String, Section> {
        self.sections.keys()
    }

    pub fn iter(&self) -> Iter<'_, String, Section> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// The section called `name`, created empty if this is its first appearance.
    pub(crate) fn section_entry(&mut self, name: &str) -> &mut Section {
        self.sections.entry(name.to_string()).or_default()
    }

    pub fn into_inner(self) -> IndexMap<String, Section> {
        self.sections
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Section);
    type IntoIter = Iter<'a, String, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

impl<N: Into<String>> FromIterator<(N, Section)> for Document {
    fn from_iter<I: IntoIterator<Item = (N, Section)>>(iter: I) -> Self {
        Self {
            sections: iter.into_iter().map(|(n, s)| (n.into(), s)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_entry_merges() {
        let mut doc = Document::new();
        doc.section_entry("s").insert("a".into(), "1".into());
        doc.section_entry("t");
        doc.section_entry("s").insert("b".into(), "2".into());

        assert_eq!(doc.section_names().collect::<Vec<_>>(), ["s", "t"]);
        assert_eq!(doc.get("s", "a"), Some("1"));
        assert_eq!(doc.get("s", "b"), Some("2"));
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut section = Section::new();
        section.insert("a".into(), "1".into());
        section.insert("b".into(), "2".into());
        section.insert("a".into(), "3".into());
        assert_eq!(section.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(section.get("a"), Some("3"));
    }

    #[test]
    fn test_part_dependencies() {
        let section: Section = [(PART_DEPENDENCIES_KEY, "part1  part2")].into_iter().collect();
        assert_eq!(section.part_dependencies(), ["part1", "part2"]);
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: Section = [("x", "1"), ("y", "2")].into_iter().collect();
        let b: Section = [("y", "2"), ("x", "1")].into_iter().collect();
        assert_eq!(a, b);
    }
}
