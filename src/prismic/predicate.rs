//! Query predicates

use std::fmt;

/// A single Prismic query predicate
///
/// Only the `at` predicate is needed to list documents by type and to look
/// one up by uid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    At { path: String, value: String },
}

impl Predicate {
    /// `[at(path, "value")]`
    pub fn at(path: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::At {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Match every document of a custom type
    pub fn document_type(doc_type: &str) -> Self {
        Self::at("document.type", doc_type)
    }

    /// Match the document of `doc_type` whose uid is `uid`
    pub fn uid(doc_type: &str, uid: &str) -> Self {
        Self::at(format!("my.{}.uid", doc_type), uid)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::At { path, value } => {
                write!(f, "[at({}, \"{}\")]", path, value.replace('"', "\\\""))
            }
        }
    }
}

/// Build the `q` query parameter from a set of predicates
pub fn to_query(predicates: &[Predicate]) -> String {
    let inner: String = predicates.iter().map(|p| p.to_string()).collect();
    format!("[{}]", inner)
}
