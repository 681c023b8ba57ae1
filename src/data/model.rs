use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// Record ids
// ---------------------------------------------------------------------------

/// Accept `_id` written either as a JSON string or as a JSON integer.
/// Both end up as the string key of the collection.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Document – one line of the corpus file
// ---------------------------------------------------------------------------

/// A corpus document. Only `_id`, `title` and `text` are kept; any other
/// field on the line is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Document {
    #[serde(rename = "_id", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub text: String,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{_id: {:?}, title: {:?}, text: {:?}}}",
            self.id, self.title, self.text
        )
    }
}

// ---------------------------------------------------------------------------
// Query – one line of the query file
// ---------------------------------------------------------------------------

/// A query. Only `_id` and `text` are kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Query {
    #[serde(rename = "_id", deserialize_with = "deserialize_id")]
    pub id: String,
    pub text: String,
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{_id: {:?}, text: {:?}}}", self.id, self.text)
    }
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// Documents keyed by id, in file order.
pub type Corpus = IndexMap<String, Document>;

/// Queries keyed by id, in file order.
pub type Queries = IndexMap<String, Query>;

/// Relevance judgments: query id → (doc id → score).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Qrels {
    judgments: HashMap<String, HashMap<String, i32>>,
}

impl Qrels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a judgment. A repeated (query, doc) pair keeps the last score.
    pub fn insert(&mut self, query_id: impl Into<String>, doc_id: impl Into<String>, score: i32) {
        self.judgments
            .entry(query_id.into())
            .or_default()
            .insert(doc_id.into(), score);
    }

    /// Whether at least one judgment exists for `query_id`.
    pub fn contains_query(&self, query_id: &str) -> bool {
        self.judgments.contains_key(query_id)
    }

    /// All judgments for one query.
    pub fn get(&self, query_id: &str) -> Option<&HashMap<String, i32>> {
        self.judgments.get(query_id)
    }

    /// Score of a single (query, doc) pair.
    pub fn score(&self, query_id: &str, doc_id: &str) -> Option<i32> {
        self.judgments.get(query_id)?.get(doc_id).copied()
    }

    /// Doc ids judged for `query_id` with a score of at least `min_score`.
    pub fn relevant_docs(&self, query_id: &str, min_score: i32) -> Vec<&str> {
        let mut docs: Vec<&str> = self
            .judgments
            .get(query_id)
            .into_iter()
            .flatten()
            .filter(|&(_, &score)| score >= min_score)
            .map(|(doc, _)| doc.as_str())
            .collect();
        docs.sort_unstable();
        docs
    }

    /// Number of judged queries.
    pub fn len(&self) -> usize {
        self.judgments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.judgments.is_empty()
    }

    /// Total number of (query, doc) judgments.
    pub fn num_judgments(&self) -> usize {
        self.judgments.values().map(HashMap::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &HashMap<String, i32>)> {
        self.judgments.iter()
    }
}

impl From<HashMap<String, HashMap<String, i32>>> for Qrels {
    fn from(judgments: HashMap<String, HashMap<String, i32>>) -> Self {
        Self { judgments }
    }
}

impl From<Qrels> for HashMap<String, HashMap<String, i32>> {
    fn from(qrels: Qrels) -> Self {
        qrels.judgments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_keeps_only_known_fields() {
        let doc: Document = serde_json::from_str(
            r#"{"_id": "d1", "title": "T", "text": "body", "metadata": {"url": "x"}}"#,
        )
        .unwrap();
        assert_eq!(
            doc,
            Document {
                id: "d1".into(),
                title: "T".into(),
                text: "body".into(),
            }
        );
    }

    #[test]
    fn document_title_defaults_to_empty() {
        let doc: Document = serde_json::from_str(r#"{"_id": "d2", "text": "only text"}"#).unwrap();
        assert_eq!(doc.title, "");
    }

    #[test]
    fn numeric_ids_become_strings() {
        let query: Query = serde_json::from_str(r#"{"_id": 42, "text": "q"}"#).unwrap();
        assert_eq!(query.id, "42");
    }

    #[test]
    fn query_requires_text() {
        assert!(serde_json::from_str::<Query>(r#"{"_id": "q1"}"#).is_err());
    }

    #[test]
    fn qrels_counts_and_lookup() {
        let mut qrels = Qrels::new();
        qrels.insert("q1", "d1", 1);
        qrels.insert("q1", "d2", 0);
        qrels.insert("q2", "d1", 2);
        qrels.insert("q1", "d2", 2);

        assert_eq!(qrels.len(), 2);
        assert_eq!(qrels.num_judgments(), 3);
        assert_eq!(qrels.score("q1", "d2"), Some(2));
        assert_eq!(qrels.score("q3", "d1"), None);
        assert!(qrels.contains_query("q2"));
        assert_eq!(qrels.relevant_docs("q1", 1), vec!["d1", "d2"]);
        assert_eq!(qrels.relevant_docs("q2", 3), Vec::<&str>::new());
    }

    #[test]
    fn qrels_converts_to_and_from_nested_map() {
        let mut nested: HashMap<String, HashMap<String, i32>> = HashMap::new();
        nested
            .entry("q1".to_string())
            .or_default()
            .insert("d1".to_string(), 1);
        nested
            .entry("q2".to_string())
            .or_default()
            .insert("d3".to_string(), 0);

        let qrels = Qrels::from(nested.clone());
        assert_eq!(qrels.score("q2", "d3"), Some(0));

        let mut seen: Vec<(&str, usize)> = qrels
            .iter()
            .map(|(query, docs)| (query.as_str(), docs.len()))
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![("q1", 1), ("q2", 1)]);

        let back: HashMap<String, HashMap<String, i32>> = qrels.into();
        assert_eq!(back, nested);
    }
}
