//! Element Query
//!
//! The selector subset the engine needs: `tag`, `#id`, `.class`, `*`,
//! `[attr]` and `tag[attr]`.

use crate::ElementData;

/// Simple selector for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Tag(String),
    Class(String),
    Id(String),
    /// Elements carrying `attr`, optionally restricted to `tag`
    Attribute { tag: Option<String>, attr: String },
    Universal,
}

impl SimpleSelector {
    /// Parse a simple selector string
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if s == "*" {
            Some(Self::Universal)
        } else if let Some(id) = s.strip_prefix('#') {
            (!id.is_empty()).then(|| Self::Id(id.to_string()))
        } else if let Some(class) = s.strip_prefix('.') {
            (!class.is_empty()).then(|| Self::Class(class.to_string()))
        } else if let Some((tag, rest)) = s.split_once('[') {
            let attr = rest.strip_suffix(']')?.trim();
            if attr.is_empty() {
                return None;
            }
            let tag = (!tag.is_empty()).then(|| tag.to_ascii_lowercase());
            Some(Self::Attribute { tag, attr: attr.to_string() })
        } else {
            Some(Self::Tag(s.to_ascii_lowercase()))
        }
    }

    /// `tag[attr]`
    pub fn tagged(tag: &str, attr: &str) -> Self {
        Self::Attribute {
            tag: Some(tag.to_ascii_lowercase()),
            attr: attr.to_string(),
        }
    }

    /// Check if an element matches
    pub fn matches(&self, elem: &ElementData) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => elem.name == *tag,
            Self::Id(id) => elem.id() == Some(id.as_str()),
            Self::Class(class) => elem.classes().any(|c| c == class),
            Self::Attribute { tag, attr } => {
                tag.as_ref().is_none_or(|t| elem.name == *t) && elem.has_attr(attr)
            }
        }
    }
}
