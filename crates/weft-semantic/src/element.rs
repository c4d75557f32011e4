//! The generated element tree.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use weft_core::NodeId;

/// A markup element ready for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedElement {
    /// The extracted node this element was generated from.
    pub node: NodeId,
    pub tag: String,
    /// Semantic class first, utility classes after it.
    pub classes: Vec<String>,
    /// Attributes in emission order (accessibility attributes included).
    pub attrs: IndexMap<String, String>,
    /// Text content for text-bearing elements.
    pub text: Option<String>,
    pub children: Vec<GeneratedElement>,
}

impl GeneratedElement {
    pub fn new(node: NodeId, tag: impl Into<String>) -> Self {
        Self {
            node,
            tag: tag.into(),
            classes: Vec::new(),
            attrs: IndexMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    /// Depth-first iterator over this element and all descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

pub struct Walk<'a> {
    stack: Vec<&'a GeneratedElement>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a GeneratedElement;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}
