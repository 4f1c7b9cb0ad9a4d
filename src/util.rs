use itertools::Itertools;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

/// `(item, count)` pairs, most common first. Ties keep first-seen order.
pub fn item_counts<T, I>(items: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut order: Vec<T> = Vec::new();
    let mut counts: HashMap<T, usize> = HashMap::new();
    for item in items {
        let c = counts.entry(item.clone()).or_insert(0);
        if *c == 0 {
            order.push(item);
        }
        *c += 1;
    }

    order
        .into_iter()
        .map(|item| {
            let c = counts[&item];
            (item, c)
        })
        .sorted_by(|a, b| b.1.cmp(&a.1))
        .collect()
}

/// Most frequent item and its count; `(None, 0)` when empty.
pub fn most_frequent<T, I>(items: I) -> (Option<T>, usize)
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    match item_counts(items).into_iter().next() {
        Some((item, count)) => (Some(item), count),
        None => (None, 0),
    }
}

/// One `item: count` line per pair.
pub fn format_counts<T: Display>(counts: &[(T, usize)]) -> String {
    counts
        .iter()
        .map(|(item, count)| format!("{}: {}", item, count))
        .join("\n")
}
