//! Builders for Playwright chained selectors

/// `parent >> child`: `child` searched inside each match of `parent`
pub fn within(parent: &str, child: &str) -> String {
    format!("{} >> {}", parent, child)
}

/// The `index`-th (zero based) match of `selector`
pub fn nth(selector: &str, index: usize) -> String {
    format!("{} >> nth={}", selector, index)
}

/// `child` inside the `index`-th match of `parent`
pub fn nth_within(parent: &str, index: usize, child: &str) -> String {
    within(&nth(parent, index), child)
}

/// Attribute selector on `data-test`, the storefront's test hooks
pub fn data_test(value: &str) -> String {
    format!("[data-test=\"{}\"]", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chained_selectors() {
        assert_eq!(nth(".cart_item", 0), ".cart_item >> nth=0");
        assert_eq!(
            nth_within(".inventory_item", 2, "button"),
            ".inventory_item >> nth=2 >> button"
        );
        assert_eq!(data_test("error"), "[data-test=\"error\"]");
    }
}
