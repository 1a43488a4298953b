//! The selection tree.
//!
//! All nodes of one document live in a single arena owned through an
//! `Rc<RefCell<_>>`. A [`Query`] is a handle onto one node of that arena, so
//! any handle keeps the whole document alive and can walk to the root.
//! Parent links are arena ids and never own anything.

use crate::client::{Client, Variables};
use crate::selection::{Aliased, Selection};
use crate::value::{to_value, Value};
use crate::{printer, Error, Result};
use indexmap::IndexMap;
use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub(crate) type NodeId = usize;

pub(crate) const ROOT: NodeId = 0;

/// A body entry of a node. `N` is an arena id while attached and an owned
/// [`Snapshot`] while being copied between trees.
#[derive(Debug, Clone)]
pub(crate) enum Entry<N = NodeId> {
    Field(String),
    Aliased(Aliased),
    Node(N),
}

#[derive(Debug)]
pub(crate) struct NodeData {
    pub(crate) operation_type: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) arguments: Option<IndexMap<String, Value>>,
    pub(crate) selections: Vec<Entry>,
}

/// Owned copy of a subtree.
#[derive(Debug)]
pub(crate) struct Snapshot {
    operation_type: String,
    arguments: Option<IndexMap<String, Value>>,
    selections: Vec<Entry<Snapshot>>,
    children: Vec<Snapshot>,
}

pub(crate) struct Tree {
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) client: Option<Client>,
    pub(crate) operation_name: Option<String>,
    pub(crate) variables: Vec<(String, String)>,
}

impl Tree {
    fn new(operation_type: String, client: Option<Client>) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            client,
            operation_name: None,
            variables: Vec::new(),
        };
        tree.push(operation_type, None);
        tree
    }

    fn push(&mut self, operation_type: String, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(NodeData {
            operation_type,
            parent,
            children: Vec::new(),
            arguments: None,
            selections: Vec::new(),
        });
        id
    }

    fn snapshot(&self, id: NodeId) -> Snapshot {
        let node = &self.nodes[id];
        Snapshot {
            operation_type: node.operation_type.clone(),
            arguments: node.arguments.clone(),
            selections: node
                .selections
                .iter()
                .map(|entry| match entry {
                    Entry::Field(name) => Entry::Field(name.clone()),
                    Entry::Aliased(aliased) => Entry::Aliased(aliased.clone()),
                    Entry::Node(child) => Entry::Node(self.snapshot(*child)),
                })
                .collect(),
            children: node.children.iter().map(|c| self.snapshot(*c)).collect(),
        }
    }

    fn graft(&mut self, snapshot: Snapshot, parent: NodeId) -> NodeId {
        let id = self.push(snapshot.operation_type, Some(parent));
        self.nodes[id].arguments = snapshot.arguments;
        for entry in snapshot.selections {
            let entry = match entry {
                Entry::Field(name) => Entry::Field(name),
                Entry::Aliased(aliased) => Entry::Aliased(aliased),
                Entry::Node(sub) => Entry::Node(self.graft(sub, id)),
            };
            self.nodes[id].selections.push(entry);
        }
        for child in snapshot.children {
            let child = self.graft(child, id);
            self.nodes[id].children.push(child);
        }
        id
    }
}

/// A node in a GraphQL document under construction.
///
/// Cloning a `Query` clones the handle, not the document.
///
/// ```
/// use graphql_query::Query;
///
/// let query = Query::new();
/// query
///     .field("repository")
///     .args([("owner", "x"), ("name", "y")])
///     .values(["title", "url"])?;
///
/// assert_eq!(
///     query.to_graphql(0)?,
///     r#"query {repository(owner: "x", name: "y") {title url}}"#
/// );
/// # Ok::<(), graphql_query::Error>(())
/// ```
#[derive(Clone)]
pub struct Query {
    tree: Rc<RefCell<Tree>>,
    id: NodeId,
}

impl Default for Query {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("operation_type", &self.operation_type())
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Prints the whole document with two-space indentation.
///
/// Rendering fails for non-finite float arguments; that surfaces as
/// [`fmt::Error`]. Use [`Query::to_graphql`] to see the cause.
impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let document = self.to_graphql(2).map_err(|_| fmt::Error)?;
        f.write_str(&document)
    }
}

impl Query {
    /// Creates an unbound `query` root.
    #[must_use]
    pub fn new() -> Self {
        Self::with_operation_type("query")
    }

    /// Creates an unbound `mutation` root.
    #[must_use]
    pub fn mutation() -> Self {
        Self::with_operation_type("mutation")
    }

    /// Creates an unbound root with an arbitrary operation type.
    #[must_use]
    pub fn with_operation_type(operation_type: impl Into<String>) -> Self {
        Self::root_node(operation_type.into(), None)
    }

    pub(crate) fn bound(operation_type: &str, client: Client) -> Self {
        Self::root_node(operation_type.to_string(), Some(client))
    }

    fn root_node(operation_type: String, client: Option<Client>) -> Self {
        Self {
            tree: Rc::new(RefCell::new(Tree::new(operation_type, client))),
            id: ROOT,
        }
    }

    fn handle(&self, id: NodeId) -> Self {
        Self {
            tree: Rc::clone(&self.tree),
            id,
        }
    }

    /// Appends a child operation and returns a handle to it.
    ///
    /// Further chaining configures the child, not `self`.
    #[allow(clippy::return_self_not_must_use)]
    pub fn field(&self, name: impl Into<String>) -> Self {
        let mut tree = self.tree.borrow_mut();
        let child = tree.push(name.into(), Some(self.id));
        tree.nodes[self.id].children.push(child);
        drop(tree);
        self.handle(child)
    }

    /// Sets the arguments of this node, replacing any earlier ones.
    ///
    /// An empty set of arguments renders without parentheses.
    #[allow(clippy::return_self_not_must_use)]
    pub fn args<I, K, V>(&self, args: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let args = args
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.tree.borrow_mut().nodes[self.id].arguments = Some(args);
        self.clone()
    }

    /// Sets the arguments from any serializable mapping (a struct, a map or
    /// a `serde_json::Value` object), replacing any earlier ones.
    pub fn try_args<T: ?Sized + Serialize>(&self, args: &T) -> Result<Self> {
        match to_value(args)? {
            Value::Map(args) => {
                self.tree.borrow_mut().nodes[self.id].arguments = Some(args);
                Ok(self.clone())
            }
            other => Err(Error::InvalidArguments(format!(
                "expected a mapping, got {other:?}"
            ))),
        }
    }

    /// Appends selections to this node's body, in order.
    ///
    /// Fails with [`Error::ValuesRequiresArguments`] when `selections` is
    /// empty. Nested [`Query`] selections are copied into this document.
    pub fn values<I, S>(&self, selections: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Selection>,
    {
        let selections: Vec<Selection> = selections.into_iter().map(Into::into).collect();
        if selections.is_empty() {
            return Err(Error::ValuesRequiresArguments);
        }

        for selection in selections {
            let entry = match selection {
                Selection::Field(name) => Entry::Field(name),
                Selection::Aliased(aliased) => Entry::Aliased(aliased),
                Selection::Node(query) => {
                    // Release the source borrow before mutating, the source
                    // may be this very tree.
                    let snapshot = query.tree.borrow().snapshot(query.id);
                    let id = self.tree.borrow_mut().graft(snapshot, self.id);
                    Entry::Node(id)
                }
            };
            self.tree.borrow_mut().nodes[self.id].selections.push(entry);
        }
        Ok(self.clone())
    }

    /// Names the operation and declares its variables.
    ///
    /// Always applies to the root. Variable names get a `$` prefix when
    /// missing.
    #[allow(clippy::return_self_not_must_use)]
    pub fn named<I, K, T>(&self, name: impl Into<String>, variables: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<String>,
    {
        let variables = variables
            .into_iter()
            .map(|(k, t)| {
                let k = k.into();
                let k = if k.starts_with('$') { k } else { format!("${k}") };
                (k, t.into())
            })
            .collect();
        let mut tree = self.tree.borrow_mut();
        tree.operation_name = Some(name.into());
        tree.variables = variables;
        drop(tree);
        self.clone()
    }

    #[must_use]
    pub fn root(&self) -> Self {
        self.handle(ROOT)
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.id == ROOT
    }

    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let parent = self.tree.borrow().nodes[self.id].parent;
        parent.map(|id| self.handle(id))
    }

    /// Child operations created with [`Query::field`], in access order.
    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        let ids = self.tree.borrow().nodes[self.id].children.clone();
        ids.into_iter().map(|id| self.handle(id)).collect()
    }

    #[must_use]
    pub fn operation_type(&self) -> String {
        self.tree.borrow().nodes[self.id].operation_type.clone()
    }

    #[must_use]
    pub fn arguments(&self) -> Option<IndexMap<String, Value>> {
        self.tree.borrow().nodes[self.id].arguments.clone()
    }

    /// The response key of the first thing this node selects.
    ///
    /// Prefers the first child operation, falling back to the first entry
    /// passed to [`Query::values`].
    #[must_use]
    pub fn first_selection_name(&self) -> Option<String> {
        let tree = self.tree.borrow();
        let node = &tree.nodes[self.id];
        if let Some(child) = node.children.first() {
            return Some(tree.nodes[*child].operation_type.clone());
        }
        node.selections.first().map(|entry| match entry {
            Entry::Field(name) => name.clone(),
            Entry::Aliased(aliased) => aliased.alias.clone(),
            Entry::Node(id) => tree.nodes[*id].operation_type.clone(),
        })
    }

    /// The client the root was created from, if any.
    #[must_use]
    pub fn client(&self) -> Option<Client> {
        self.tree.borrow().client.clone()
    }

    /// Renders the whole document, starting from the root.
    ///
    /// `indentation` is the number of spaces per nesting level; `0` renders
    /// on a single line.
    pub fn to_graphql(&self, indentation: usize) -> Result<String> {
        printer::render(&self.tree.borrow(), indentation)
    }

    /// Sends the document and returns the response data after middleware.
    pub fn fetch(&self, variables: Option<&Variables>) -> Result<serde_json::Value> {
        let client = self.client().ok_or(Error::Unbound)?;
        client.fetch(&self.root(), variables)
    }

    /// Async variant of [`Query::fetch`]; transport faults are retried.
    pub async fn fetch_async(&self, variables: Option<&Variables>) -> Result<serde_json::Value> {
        let client = self.client().ok_or(Error::Unbound)?;
        client.fetch_async(&self.root(), variables).await
    }

    /// Fetches and returns one top-level key of the result.
    pub fn fetch_key(&self, key: &str) -> Result<serde_json::Value> {
        let mut data = self.fetch(None)?;
        data.get_mut(key)
            .map(serde_json::Value::take)
            .ok_or_else(|| Error::MissingKey(key.to_string()))
    }
}
