use std::fs;
use std::path::Path;

use beir_loader::{GenericDataLoader, LoaderConfig, LoaderError};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn minimal_dataset() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "corpus.jsonl",
        "{\"_id\":\"d1\",\"title\":\"T\",\"text\":\"body\"}\n",
    );
    write(
        dir.path(),
        "queries.jsonl",
        "{\"_id\":\"q1\",\"text\":\"query text\"}\n",
    );
    write(
        dir.path(),
        "qrels/test.tsv",
        "query-id\tcorpus-id\tscore\nq1\td1\t1\n",
    );
    dir
}

#[test]
fn end_to_end_minimal_dataset() {
    let dir = minimal_dataset();
    let mut loader = GenericDataLoader::new(dir.path());
    let (corpus, queries, qrels) = loader.load("test").unwrap();

    assert_eq!(corpus.len(), 1);
    assert_eq!(corpus["d1"].title, "T");
    assert_eq!(corpus["d1"].text, "body");

    assert_eq!(queries.len(), 1);
    assert_eq!(queries["q1"].text, "query text");

    assert_eq!(qrels.len(), 1);
    assert_eq!(qrels.get("q1").unwrap().len(), 1);
    assert_eq!(qrels.score("q1", "d1"), Some(1));
}

#[test]
fn missing_qrels_keeps_all_queries() {
    let dir = minimal_dataset();
    write(
        dir.path(),
        "queries.jsonl",
        "{\"_id\":\"q1\",\"text\":\"a\"}\n{\"_id\":\"q2\",\"text\":\"b\"}\n",
    );

    let mut loader = GenericDataLoader::new(dir.path());
    let (corpus, queries, qrels) = loader.load("dev").unwrap();

    assert_eq!(corpus.len(), 1);
    assert_eq!(queries.keys().collect::<Vec<_>>(), vec!["q1", "q2"]);
    assert!(qrels.is_empty());
}

#[test]
fn prefixed_dataset_layout() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "corpus.jsonl",
        "{\"_id\":\"d1\",\"title\":\"\",\"text\":\"x\"}\n",
    );
    write(
        dir.path(),
        "msmarco-queries.jsonl",
        "{\"_id\":\"q1\",\"text\":\"a\"}\n{\"_id\":\"q2\",\"text\":\"b\"}\n",
    );
    write(
        dir.path(),
        "msmarco-qrels/dev.tsv",
        "query-id\tcorpus-id\tscore\nq2\td1\t1\n",
    );

    let mut loader = GenericDataLoader::from_config(
        LoaderConfig::default()
            .with_data_folder(dir.path())
            .with_prefix("msmarco"),
    );
    assert!(loader.query_file().ends_with("msmarco-queries.jsonl"));
    assert!(loader.qrels_folder().ends_with("msmarco-qrels"));

    let (_, queries, qrels) = loader.load("dev").unwrap();
    assert_eq!(queries.keys().collect::<Vec<_>>(), vec!["q2"]);
    assert!(qrels.contains_query("q2"));
}

#[test]
fn every_returned_query_is_judged() {
    let dir = TempDir::new().unwrap();
    let mut corpus = String::new();
    let mut queries = String::new();
    let mut qrels = String::from("query-id\tcorpus-id\tscore\n");
    for i in 0..20 {
        corpus.push_str(&format!("{{\"_id\":\"d{i}\",\"title\":\"t\",\"text\":\"doc {i}\"}}\n"));
        queries.push_str(&format!("{{\"_id\":\"q{i}\",\"text\":\"query {i}\"}}\n"));
        if i % 3 == 0 {
            qrels.push_str(&format!("q{i}\td{i}\t1\n"));
        }
    }
    write(dir.path(), "corpus.jsonl", &corpus);
    write(dir.path(), "queries.jsonl", &queries);
    write(dir.path(), "qrels/test.tsv", &qrels);

    let mut loader = GenericDataLoader::new(dir.path());
    let (_, queries, qrels) = loader.load("test").unwrap();

    assert_eq!(queries.len(), 7);
    for id in queries.keys() {
        assert!(qrels.contains_query(id), "query {id} has no judgments");
    }
}

#[test]
fn missing_corpus_is_fatal() {
    let dir = minimal_dataset();
    fs::remove_file(dir.path().join("corpus.jsonl")).unwrap();

    let mut loader = GenericDataLoader::new(dir.path());
    let err = loader.load("test").unwrap_err();
    assert!(matches!(err, LoaderError::MissingFile { .. }));
    assert!(err.to_string().contains("corpus.jsonl"));
}

#[test]
fn into_parts_hands_over_collections() {
    let dir = minimal_dataset();
    let mut loader = GenericDataLoader::new(dir.path());
    loader.load("test").unwrap();

    let (corpus, queries, qrels) = loader.into_parts();
    assert!(corpus.contains_key("d1"));
    assert!(queries.contains_key("q1"));
    assert_eq!(qrels.num_judgments(), 1);
}
