use crate::types::{CategoryOption, Quote};
use std::collections::HashSet;

/// Distinct categories in first-seen order.
pub fn distinct_categories(quotes: &[Quote]) -> Vec<String> {
    let mut seen = HashSet::new();
    quotes
        .iter()
        .filter(|q| seen.insert(q.category.as_str()))
        .map(|q| q.category.clone())
        .collect()
}

/// Dropdown options: "All Categories" followed by one entry per category.
pub fn category_options(quotes: &[Quote]) -> Vec<CategoryOption> {
    std::iter::once(CategoryOption::all())
        .chain(
            distinct_categories(quotes)
                .iter()
                .map(|c| CategoryOption::category(c)),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_keep_first_seen_order() {
        let quotes = vec![
            Quote::new("Stay hungry.", "Motivation"),
            Quote::new("Keep going.", "Perseverance"),
            Quote::new("Begin.", "Motivation"),
        ];
        let values: Vec<String> = category_options(&quotes)
            .into_iter()
            .map(|o| o.value)
            .collect();
        assert_eq!(values, vec!["all", "Motivation", "Perseverance"]);
        assert_eq!(category_options(&quotes)[0].label, "All Categories");
    }

    #[test]
    fn empty_store_yields_only_all() {
        assert_eq!(category_options(&[]), vec![CategoryOption::all()]);
        assert!(distinct_categories(&[]).is_empty());
    }
}
