//! Fragment keys.
//!
//! A manifest is a set of fragments ordered by `(category, sub_order)`.
//! Category order is document order, so concatenating fragments by key
//! always yields header, dependencies, export envelope, footer.

use std::fmt;

use serde::Serialize;

/// Section of a manifest document, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Root element open plus metadata block.
    Header,
    /// Legacy attribute-style dependencies.
    Depend,
    BuildDepend,
    RunDepend,
    /// System requirements inscribed verbatim.
    ExtraDepend,
    ExportOpen,
    Export,
    ExportClose,
    /// Plugin manifest class entries.
    Entry,
    /// Root element close.
    Footer,
}

impl Category {
    /// Envelope categories are written at most once; later writes are no-ops.
    pub fn is_envelope(&self) -> bool {
        matches!(
            self,
            Category::Header | Category::ExportOpen | Category::ExportClose | Category::Footer
        )
    }

    /// Numeric prefix used when fragments are listed for inspection.
    pub fn order(&self) -> u8 {
        match self {
            Category::Header => 0,
            Category::Depend => 20,
            Category::BuildDepend => 30,
            Category::RunDepend => 40,
            Category::ExtraDepend => 50,
            Category::ExportOpen => 80,
            Category::Export => 85,
            Category::ExportClose => 89,
            Category::Entry => 90,
            Category::Footer => 99,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Header => "header",
            Category::Depend => "depend",
            Category::BuildDepend => "build_depend",
            Category::RunDepend => "run_depend",
            Category::ExtraDepend => "extra_depend",
            Category::ExportOpen => "export_open",
            Category::Export => "export",
            Category::ExportClose => "export_close",
            Category::Entry => "entry",
            Category::Footer => "footer",
        };
        write!(f, "{:02}_{}", self.order(), name)
    }
}

/// Sort key of a fragment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FragmentKey {
    pub category: Category,
    pub sub_order: String,
}

impl FragmentKey {
    pub fn new(category: Category, sub_order: impl Into<String>) -> Self {
        let sub_order = if category.is_envelope() {
            String::new()
        } else {
            sub_order.into()
        };
        FragmentKey {
            category,
            sub_order,
        }
    }
}

impl fmt::Display for FragmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sub_order.is_empty() {
            write!(f, "{}", self.category)
        } else {
            write!(f, "{}/{}", self.category, self.sub_order)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order_matches_order_prefix() {
        let all = [
            Category::Header,
            Category::Depend,
            Category::BuildDepend,
            Category::RunDepend,
            Category::ExtraDepend,
            Category::ExportOpen,
            Category::Export,
            Category::ExportClose,
            Category::Entry,
            Category::Footer,
        ];
        for pair in all.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].order() < pair[1].order());
        }
    }

    #[test]
    fn test_envelope_keys_ignore_sub_order() {
        let a = FragmentKey::new(Category::ExportOpen, "plugin_a");
        let b = FragmentKey::new(Category::ExportOpen, "plugin_b");
        assert_eq!(a, b);

        let c = FragmentKey::new(Category::Export, "plugin_a");
        let d = FragmentKey::new(Category::Export, "plugin_b");
        assert_ne!(c, d);
        assert!(c < d);
    }

    #[test]
    fn test_display() {
        assert_eq!(FragmentKey::new(Category::Footer, "").to_string(), "99_footer");
        assert_eq!(
            FragmentKey::new(Category::RunDepend, "nav_msgs").to_string(),
            "40_run_depend/nav_msgs"
        );
    }
}
