//! Flat BEM class naming.
//!
//! Two levels only: `block` and `block__element`. A third level is never
//! emitted; grandchildren flatten into additional sibling element
//! classes on the same block.

use convert_case::{Case, Casing};
use rustc_hash::FxHashSet;

/// Allocates block and element class names, guaranteeing uniqueness
/// within one generation run.
#[derive(Debug, Default)]
pub struct ClassNamer {
    prefix: Option<String>,
    taken: FxHashSet<String>,
}

impl ClassNamer {
    pub fn new(prefix: Option<&str>) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            taken: FxHashSet::default(),
        }
    }

    /// Class name for a new block.
    pub fn block(&mut self, name: &str) -> String {
        let base = match &self.prefix {
            Some(prefix) => format!("{}-{}", prefix, sanitize(name)),
            None => sanitize(name),
        };
        self.claim(base)
    }

    /// Class name for an element within `block`. Always exactly one `__`
    /// separator, regardless of nesting depth.
    pub fn element(&mut self, block: &str, name: &str) -> String {
        let base = format!("{}__{}", block, sanitize(name));
        self.claim(base)
    }

    fn claim(&mut self, base: String) -> String {
        if self.taken.insert(base.clone()) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Kebab-case a design-layer name into a class fragment. Underscores are
/// squeezed out so they cannot fake a BEM separator.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let kebab = cleaned.trim().to_case(Case::Kebab);
    if kebab.is_empty() {
        "node".to_string()
    } else {
        kebab
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_block_and_element() {
        let mut namer = ClassNamer::new(None);
        let block = namer.block("Card");
        assert_eq!(block, "card");
        assert_eq!(namer.element(&block, "Title"), "card__title");
    }

    #[test]
    fn test_prefix() {
        let mut namer = ClassNamer::new(Some("w"));
        assert_eq!(namer.block("Hero Section"), "w-hero-section");
    }

    #[test]
    fn test_collisions_get_suffixes() {
        let mut namer = ClassNamer::new(None);
        let block = namer.block("Card");
        assert_eq!(namer.element(&block, "Title"), "card__title");
        assert_eq!(namer.element(&block, "Title"), "card__title-2");
        assert_eq!(namer.element(&block, "Title"), "card__title-3");
    }

    #[test]
    fn test_underscores_cannot_fake_separators() {
        let mut namer = ClassNamer::new(None);
        let block = namer.block("odd__name");
        assert_eq!(block.matches("__").count(), 0);
        let element = namer.element(&block, "also__odd");
        assert_eq!(element.matches("__").count(), 1);
    }

    #[test]
    fn test_empty_name_falls_back() {
        let mut namer = ClassNamer::new(None);
        assert_eq!(namer.block(""), "node");
        assert_eq!(namer.block("!!!"), "node-2");
    }

    proptest! {
        /// The flat BEM invariant: no generated class name ever contains
        /// more than one `__` separator.
        #[test]
        fn prop_at_most_one_separator(block in ".{0,24}", element in ".{0,24}") {
            let mut namer = ClassNamer::new(None);
            let b = namer.block(&block);
            prop_assert_eq!(b.matches("__").count(), 0);
            let e = namer.element(&b, &element);
            prop_assert!(e.matches("__").count() <= 1);
        }
    }
}
