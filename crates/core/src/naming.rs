//! Deterministic name transforms shared by every generator.

use std::collections::HashSet;

/// Lowercase `name`, collapse every run of non-alphanumeric characters into
/// a single `-`, and trim leading/trailing `-`.
pub fn slugify(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Split on non-alphanumeric runs, capitalize the first letter of each
/// token and concatenate with no separator (`"vendor audit"` → `"VendorAudit"`).
pub fn title_case(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_ascii_uppercase().to_string() + chars.as_str(),
            }
        })
        .collect()
}

/// Slugs for `names`, in order, guaranteed unique.
///
/// Names that slugify to nothing take `fallback`. A slug already taken gets
/// the smallest numeric suffix (`-2`, `-3`, ...) that is still free.
pub fn unique_slugs<S: AsRef<str>>(names: &[S], fallback: &str) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    names
        .iter()
        .map(|name| {
            let mut base = slugify(name.as_ref());
            if base.is_empty() {
                base = fallback.to_string();
            }
            let mut candidate = base.clone();
            let mut n = 2;
            while taken.contains(&candidate) {
                candidate = format!("{}-{}", base, n);
                n += 1;
            }
            taken.insert(candidate.clone());
            candidate
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("Vendor Audit & Review!"), "vendor-audit-review");
        assert_eq!(slugify("  --Purchase_Order--  "), "purchase-order");
        assert_eq!(slugify("ISO 9001"), "iso-9001");
    }

    #[test]
    fn slugify_empty_and_symbol_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("&&&"), "");
    }

    #[test]
    fn title_case_concatenates_tokens() {
        assert_eq!(title_case("vendor audit"), "VendorAudit");
        assert_eq!(title_case("purchase_order-line"), "PurchaseOrderLine");
        assert_eq!(title_case("Invoice"), "Invoice");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn title_case_keeps_inner_capitals() {
        assert_eq!(title_case("kpiReport"), "KpiReport");
    }

    #[test]
    fn unique_slugs_disambiguates_collisions() {
        let slugs = unique_slugs(&["Order", "order!", "Order Line", "ORDER"], "entity");
        assert_eq!(slugs, vec!["order", "order-2", "order-line", "order-3"]);
    }

    #[test]
    fn unique_slugs_uses_fallback_for_empty() {
        let slugs = unique_slugs(&["???", "", "Page"], "page");
        assert_eq!(slugs, vec!["page", "page-2", "page-3"]);
    }

    #[test]
    fn unique_slugs_skips_suffix_already_taken() {
        let slugs = unique_slugs(&["a-2", "a", "a"], "x");
        assert_eq!(slugs, vec!["a-2", "a", "a-3"]);
    }
}
