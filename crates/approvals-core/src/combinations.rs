//! Cartesian enumeration of parameter domains.
//!
//! Order is first-parameter-major, matching nested loops: for
//! `[[a1, a2], [b1, b2]]` the combinations are `(a1, b1)`, `(a1, b2)`,
//! `(a2, b1)`, `(a2, b2)`.

/// Every combination of one value per domain, in lexicographic order.
///
/// An empty domain set yields a single empty combination; an empty inner
/// domain yields no combinations at all.
pub fn enumerate<T: Clone>(domains: &[Vec<T>]) -> Vec<Vec<T>> {
    if domains.iter().any(Vec::is_empty) {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(count(domains));
    enumerate_with_prefix(domains, Vec::with_capacity(domains.len()), &mut out);
    out
}

fn enumerate_with_prefix<T: Clone>(domains: &[Vec<T>], prefix: Vec<T>, out: &mut Vec<Vec<T>>) {
    let Some((first, rest)) = domains.split_first() else {
        out.push(prefix);
        return;
    };

    for value in first {
        let mut next = prefix.clone();
        next.push(value.clone());
        enumerate_with_prefix(rest, next, out);
    }
}

/// Number of combinations [`enumerate`] will produce, saturating at
/// `usize::MAX`.
pub fn count<T>(domains: &[Vec<T>]) -> usize {
    if domains.iter().any(Vec::is_empty) {
        return 0;
    }
    domains
        .iter()
        .try_fold(1usize, |acc, domain| acc.checked_mul(domain.len()))
        .unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn two_domains_follow_nested_loop_order() {
        let combos = enumerate(&[vec!["a1", "a2"], vec!["b1", "b2"]]);
        assert_eq!(
            combos,
            vec![
                vec!["a1", "b1"],
                vec!["a1", "b2"],
                vec!["a2", "b1"],
                vec!["a2", "b2"],
            ]
        );
    }

    #[test]
    fn empty_domain_set_yields_one_empty_combination() {
        let domains: Vec<Vec<i32>> = vec![];
        let combos = enumerate(&domains);
        assert_eq!(combos, vec![Vec::<i32>::new()]);
        assert_eq!(count(&domains), 1);
    }

    #[test]
    fn any_empty_domain_yields_nothing() {
        let domains = vec![vec![1, 2], vec![], vec![3]];
        assert!(enumerate(&domains).is_empty());
        assert_eq!(count(&domains), 0);
    }

    #[test]
    fn size_length_and_uniqueness() {
        let domains = vec![vec![0, 1, 2], vec![10, 11], vec![20, 21, 22, 23]];
        let combos = enumerate(&domains);

        assert_eq!(combos.len(), 3 * 2 * 4);
        assert_eq!(combos.len(), count(&domains));
        assert!(combos.iter().all(|c| c.len() == 3));

        let unique: HashSet<_> = combos.iter().cloned().collect();
        assert_eq!(unique.len(), combos.len());

        let mut sorted = combos.clone();
        sorted.sort();
        assert_eq!(sorted, combos, "values are ascending per domain, so order must be sorted");
    }

    #[test]
    fn empty_domain_after_huge_product_yields_nothing() {
        let mut domains = vec![vec![0u8, 1]; 64];
        domains.push(vec![]);

        assert!(enumerate(&domains).is_empty());
        assert_eq!(count(&domains), 0);
    }

    #[test]
    fn count_saturates_instead_of_overflowing() {
        let domains = vec![vec![0u8, 1]; 65];
        assert_eq!(count(&domains), usize::MAX);
    }

    #[test]
    fn single_domain_keeps_given_order() {
        let combos = enumerate(&[vec![3, 1, 2]]);
        assert_eq!(combos, vec![vec![3], vec![1], vec![2]]);
    }
}
