use crate::Query;

/// A field requested under a caller-chosen name, rendered as `alias: name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Aliased {
    pub name: String,
    pub alias: String,
}

impl Aliased {
    #[must_use]
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
        }
    }
}

/// One entry passed to [`Query::values`].
#[derive(Debug, Clone)]
pub enum Selection {
    /// Plain field name, emitted verbatim.
    Field(String),
    Aliased(Aliased),
    /// A sub-query, copied into the receiving tree.
    Node(Query),
}

impl From<&str> for Selection {
    fn from(name: &str) -> Self {
        Self::Field(name.to_string())
    }
}

impl From<String> for Selection {
    fn from(name: String) -> Self {
        Self::Field(name)
    }
}

impl From<Aliased> for Selection {
    fn from(aliased: Aliased) -> Self {
        Self::Aliased(aliased)
    }
}

impl From<Query> for Selection {
    fn from(query: Query) -> Self {
        Self::Node(query)
    }
}

impl From<&Query> for Selection {
    fn from(query: &Query) -> Self {
        Self::Node(query.clone())
    }
}
