//! Predicates used by list filters.
//!
//! An absent (or blank) criterion matches everything. An absent field never
//! matches a present criterion.

/// Case-insensitive substring match.
pub fn contains_ci(field: Option<&str>, needle: Option<&str>) -> bool {
    let needle = match needle {
        Some(n) if !n.trim().is_empty() => n,
        _ => return true,
    };
    match field {
        Some(f) => f.to_lowercase().contains(&needle.to_lowercase()),
        None => false,
    }
}

/// Keep values greater than or equal to the threshold.
pub fn at_least<N: PartialOrd>(field: Option<N>, threshold: Option<N>) -> bool {
    match (field, threshold) {
        (_, None) => true,
        (Some(v), Some(t)) => v >= t,
        (None, Some(_)) => false,
    }
}

/// Keep values less than or equal to the threshold.
pub fn at_most<N: PartialOrd>(field: Option<N>, threshold: Option<N>) -> bool {
    match (field, threshold) {
        (_, None) => true,
        (Some(v), Some(t)) => v <= t,
        (None, Some(_)) => false,
    }
}
