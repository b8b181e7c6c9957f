//! Shared types for the catalogue collection.
//!
//! [`Entry`] mirrors one object of the `collection.json` array. Every field
//! except `name` and `url` is optional in the source data, and absent values
//! deserialize to empty defaults so lookups, filters and rendering never
//! have to special-case a missing key.
//!
//! `slug` and `index` are never read from the input. They are written once
//! by [`assign_slugs`](crate::slug::assign_slugs) while a [`Collection`] is
//! built, and a published collection is immutable afterwards.

use crate::slug::assign_slugs;
use serde::{Deserialize, Deserializer, Serialize};

/// Read an explicit `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A named link attached to an entry (docs, walkthroughs, write-ups).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

/// One catalogued app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Technology tags, in source order.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub technology: Vec<String>,
    /// Collection facet tags, in source order.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub collection: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<i64>,
    /// ISO-8601 date of the last upstream contribution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contributed: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub references: Vec<Reference>,
    /// Unique identifier within the loaded collection.
    #[serde(skip_deserializing)]
    pub slug: String,
    /// Zero-based position in the source array.
    #[serde(skip_deserializing)]
    pub index: usize,
}

impl Entry {
    /// Entry with only a name set. Mostly useful in tests and fixtures.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A slug-annotated snapshot of the whole catalogue.
///
/// The only way to build one is [`Collection::from_raw`], which runs slug
/// assignment, so every `Collection` upholds the slug uniqueness invariant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Collection {
    entries: Vec<Entry>,
}

impl Collection {
    /// Annotate raw entries with slugs and positions and freeze them.
    pub fn from_raw(mut entries: Vec<Entry>) -> Self {
        assign_slugs(&mut entries);
        Self { entries }
    }

    /// Parse a JSON array of entries and annotate it.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<Entry> = serde_json::from_str(json)?;
        Ok(Self::from_raw(entries))
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_optional_fields_default_to_empty() {
        let collection = Collection::from_json(r#"[{"name": "Juice Shop"}]"#).unwrap();
        let entry = &collection.entries()[0];
        assert_eq!(entry.name, "Juice Shop");
        assert_eq!(entry.url, "");
        assert!(entry.author.is_none());
        assert!(entry.technology.is_empty());
        assert!(entry.collection.is_empty());
        assert!(entry.stars.is_none());
        assert!(entry.references.is_empty());
    }

    #[test]
    fn explicit_nulls_read_as_absent() {
        let json = r#"[
            {
                "name": null,
                "author": null,
                "url": null,
                "notes": null,
                "technology": null,
                "collection": null,
                "stars": null,
                "last_contributed": null,
                "references": [{"name": null, "url": null}]
            },
            {"name": "B", "references": null}
        ]"#;
        let collection = Collection::from_json(json).unwrap();
        assert_eq!(collection.len(), 2);

        let first = &collection.entries()[0];
        assert_eq!(first.name, "");
        assert_eq!(first.url, "");
        assert!(first.author.is_none());
        assert!(first.technology.is_empty());
        assert!(first.collection.is_empty());
        assert!(first.stars.is_none());
        assert_eq!(first.references, vec![Reference::default()]);

        let second = &collection.entries()[1];
        assert_eq!(second.slug, "b");
        assert!(second.references.is_empty());
    }

    #[test]
    fn slug_and_index_in_input_are_ignored() {
        let collection =
            Collection::from_json(r#"[{"name": "Real Name", "slug": "forged", "index": 99}]"#)
                .unwrap();
        let entry = &collection.entries()[0];
        assert_eq!(entry.slug, "real-name");
        assert_eq!(entry.index, 0);
    }

    #[test]
    fn full_entry_parses() {
        let json = r#"[{
            "name": "DVWA",
            "author": "Dewhurst Security",
            "url": "https://github.com/digininja/DVWA",
            "notes": "Damn Vulnerable Web Application",
            "technology": ["PHP", "MySQL"],
            "collection": ["offline", "container"],
            "stars": 10500,
            "last_contributed": "2024-03-04T10:00:00Z",
            "references": [{"name": "Guide", "url": "https://example.com/guide"}]
        }]"#;
        let collection = Collection::from_json(json).unwrap();
        let entry = &collection.entries()[0];
        assert_eq!(entry.technology, vec!["PHP", "MySQL"]);
        assert_eq!(entry.stars, Some(10500));
        assert_eq!(entry.references[0].name, "Guide");
    }

    #[test]
    fn non_array_json_is_error() {
        assert!(Collection::from_json(r#"{"name": "x"}"#).is_err());
    }

    #[test]
    fn serialized_collection_carries_slugs() {
        let collection = Collection::from_raw(vec![Entry::named("A b")]);
        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(json[0]["slug"], "a-b");
        assert_eq!(json[0]["index"], 0);
    }
}
