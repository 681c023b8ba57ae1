use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::json;

const TOPICS: [&str; 4] = ["protein folding", "ocean currents", "rust compilers", "bee colonies"];
const DOCS_PER_TOPIC: usize = 5;

/// Linear congruential generator; only needs to be repeatable, not good.
struct Lcg(u64);

impl Lcg {
    fn below(&mut self, n: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) % n
    }
}

/// Writes a small BEIR-layout dataset:
///
/// ```text
/// <out>/corpus.jsonl
/// <out>/queries.jsonl
/// <out>/qrels/test.tsv
/// ```
///
/// The last query of every topic has no judgments, so loading the `test`
/// split drops it.
fn main() -> Result<()> {
    let out: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_dataset"));
    let mut rng = Lcg(42);

    fs::create_dir_all(out.join("qrels")).context("creating output directories")?;
    let mut corpus = BufWriter::new(
        File::create(out.join("corpus.jsonl")).context("creating corpus.jsonl")?,
    );
    let mut queries = BufWriter::new(
        File::create(out.join("queries.jsonl")).context("creating queries.jsonl")?,
    );
    let mut qrels = BufWriter::new(
        File::create(out.join("qrels").join("test.tsv")).context("creating qrels/test.tsv")?,
    );
    writeln!(qrels, "query-id\tcorpus-id\tscore")?;

    let mut n_judgments = 0;
    for (t, topic) in TOPICS.iter().enumerate() {
        for d in 0..DOCS_PER_TOPIC {
            let doc = json!({
                "_id": format!("doc-{t}-{d}"),
                "title": format!("On {topic}, part {}", d + 1),
                "text": format!("Notes number {} about {topic}.", rng.below(1000)),
                "metadata": { "topic": topic },
            });
            writeln!(corpus, "{doc}")?;
        }

        for q in 0..2 {
            let query_id = format!("q-{t}-{q}");
            let query = json!({ "_id": &query_id, "text": format!("what is known about {topic}") });
            writeln!(queries, "{query}")?;

            if q == 1 {
                continue;
            }
            writeln!(qrels, "{query_id}\tdoc-{t}-0\t2")?;
            n_judgments += 1;
            for d in 1..DOCS_PER_TOPIC {
                let score = rng.below(3);
                if score > 0 {
                    writeln!(qrels, "{query_id}\tdoc-{t}-{d}\t{score}")?;
                    n_judgments += 1;
                }
            }
        }
    }

    corpus.flush()?;
    queries.flush()?;
    qrels.flush()?;

    println!(
        "Wrote {} documents, {} queries and {n_judgments} judgments to {}",
        TOPICS.len() * DOCS_PER_TOPIC,
        TOPICS.len() * 2,
        out.display()
    );
    Ok(())
}
