use super::model::{Qrels, Queries};

// ---------------------------------------------------------------------------
// Query filtering against judgments
// ---------------------------------------------------------------------------

/// Drop every query that has no judgment in `qrels`.
///
/// Surviving queries keep their relative order. Returns how many were removed.
pub fn retain_judged(queries: &mut Queries, qrels: &Qrels) -> usize {
    let before = queries.len();
    queries.retain(|id, _| qrels.contains_query(id));
    before - queries.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Query;

    fn queries(ids: &[&str]) -> Queries {
        ids.iter()
            .map(|id| {
                (
                    id.to_string(),
                    Query {
                        id: id.to_string(),
                        text: format!("text of {id}"),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn removes_unjudged_and_keeps_order() {
        let mut qs = queries(&["q3", "q1", "q2", "q4"]);
        let mut qrels = Qrels::new();
        qrels.insert("q4", "d1", 1);
        qrels.insert("q1", "d9", 0);

        let removed = retain_judged(&mut qs, &qrels);

        assert_eq!(removed, 2);
        assert_eq!(qs.keys().collect::<Vec<_>>(), vec!["q1", "q4"]);
    }

    #[test]
    fn empty_qrels_removes_everything() {
        let mut qs = queries(&["q1", "q2"]);
        assert_eq!(retain_judged(&mut qs, &Qrels::new()), 2);
        assert!(qs.is_empty());
    }
}
