/// Data layer: record types, loading, and query filtering.
///
/// Architecture:
/// ```text
///  corpus.jsonl   queries.jsonl   qrels/<split>.tsv
///        │              │                │
///        ▼              ▼                ▼
///   ┌────────────────────────────────────────┐
///   │  loader   check paths → parse files    │
///   └────────────────────────────────────────┘
///        │              │                │
///        ▼              ▼                ▼
///     Corpus         Queries           Qrels
///                       │                │
///                       ▼                │
///                  ┌──────────┐          │
///                  │  filter   │ ◄────────┘  keep judged queries only
///                  └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
