//! Component I: the Result Sorter. Total order: score rounded to 3 decimals
//! (formatted, compared as strings) descending, then title ascending. This
//! rounding-for-sort is a contract, not an approximation: two scores
//! differing only past the third decimal place are equal for ranking
//! purposes.

/// Sorts `items` in place per §4.I, given accessors for score and title.
pub fn sort_by_score_then_title<T>(
    items: &mut [T],
    precision: usize,
    score: impl Fn(&T) -> f64,
    title: impl Fn(&T) -> &str,
) {
    items.sort_by(|a, b| {
        let sa = format!("{:.*}", precision, score(a));
        let sb = format!("{:.*}", precision, score(b));
        sb.cmp(&sa).then_with(|| title(a).cmp(title(b)))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        title: &'static str,
        score: f64,
    }

    #[test]
    fn orders_by_rounded_score_desc_then_title_asc() {
        let mut rows = vec![
            Row { title: "Banana", score: 0.12345 },
            Row { title: "Apple", score: 0.12350 },
        ];
        sort_by_score_then_title(&mut rows, 3, |r| r.score, |r| r.title);
        assert_eq!(rows[0].title, "Apple");
        assert_eq!(rows[1].title, "Banana");
    }

    #[test]
    fn empty_query_orders_by_title_only() {
        let mut rows = vec![
            Row { title: "Zeta", score: 0.0 },
            Row { title: "Alpha", score: 0.0 },
        ];
        sort_by_score_then_title(&mut rows, 3, |r| r.score, |r| r.title);
        assert_eq!(rows[0].title, "Alpha");
        assert_eq!(rows[1].title, "Zeta");
    }

    #[test]
    fn higher_score_always_first_when_not_tied() {
        let mut rows = vec![
            Row { title: "A", score: 0.1 },
            Row { title: "B", score: 0.9 },
        ];
        sort_by_score_then_title(&mut rows, 3, |r| r.score, |r| r.title);
        assert_eq!(rows[0].title, "B");
    }
}
