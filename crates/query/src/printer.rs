//! Document rendering.
//!
//! With a step of `0` the document is printed on one line with fields
//! separated by single spaces. With a step of `n` every field goes on its
//! own line, padded by `depth * n` spaces; a closing brace is padded one
//! step less than the fields it closes.

use crate::node::{Entry, NodeId, Tree, ROOT};
use crate::value::serialize_arg;
use crate::Result;

/// Renders the document held by `tree`, from its root.
pub(crate) fn render(tree: &Tree, indentation: usize) -> Result<String> {
    let document = render_node(tree, ROOT, 1, indentation)?;
    tracing::trace!(len = document.len(), indentation, "Rendered document");
    Ok(document)
}

fn render_node(tree: &Tree, id: NodeId, depth: usize, step: usize) -> Result<String> {
    let node = &tree.nodes[id];

    let mut header = node.operation_type.clone();
    if let Some(args) = node.arguments.as_ref().filter(|args| !args.is_empty()) {
        let args = args
            .iter()
            .map(|(key, value)| Ok(format!("{key}: {}", serialize_arg(value)?)))
            .collect::<Result<Vec<_>>>()?;
        header.push('(');
        header.push_str(&args.join(", "));
        header.push(')');
    }
    if id == ROOT {
        if let Some(name) = &tree.operation_name {
            header.push(' ');
            header.push_str(name);
            if !tree.variables.is_empty() {
                let variables = tree
                    .variables
                    .iter()
                    .map(|(name, ty)| format!("{name}: {ty}"))
                    .collect::<Vec<_>>();
                header.push('(');
                header.push_str(&variables.join(", "));
                header.push(')');
            }
        }
    }

    let nl = if step == 0 { "" } else { "\n" };

    let mut fields = Vec::with_capacity(node.selections.len() + node.children.len());
    for entry in &node.selections {
        fields.push(match entry {
            Entry::Field(name) => name.clone(),
            Entry::Aliased(aliased) => format!("{}: {}", aliased.alias, aliased.name),
            Entry::Node(sub) => render_node(tree, *sub, depth + 1, step)?,
        });
    }
    for child in &node.children {
        fields.push(render_node(tree, *child, depth + 1, step)?);
    }

    if fields.is_empty() {
        return Ok(format!("{header} {{{nl}}}"));
    }

    let pad = " ".repeat(depth * step);
    let closing_pad = " ".repeat((depth - 1) * step);
    let separator = if step == 0 {
        " ".to_string()
    } else {
        format!("\n{pad}")
    };

    Ok(format!(
        "{header} {{{nl}{pad}{}{nl}{closing_pad}}}",
        fields.join(&separator)
    ))
}

#[cfg(test)]
mod tests {
    use crate::{Aliased, Literal, Query, Selection, Value, Variable};

    fn repository() -> Query {
        let query = Query::new();
        query
            .field("repository")
            .args([("owner", "x"), ("name", "y")])
            .values(["title", "url"])
            .unwrap();
        query
    }

    #[test]
    fn test_pretty() {
        insta::assert_snapshot!(repository().to_graphql(2).unwrap(), @r#"
        query {
          repository(owner: "x", name: "y") {
            title
            url
          }
        }
        "#);
    }

    #[test]
    fn test_compact() {
        assert_eq!(
            repository().to_graphql(0).unwrap(),
            r#"query {repository(owner: "x", name: "y") {title url}}"#
        );
    }

    #[test]
    fn test_empty_nodes() {
        assert_eq!(Query::new().to_graphql(0).unwrap(), "query {}");
        assert_eq!(Query::new().to_graphql(2).unwrap(), "query {\n}");

        let root = Query::new();
        let _ = root.field("tests");
        assert_eq!(root.to_graphql(0).unwrap(), "query {tests {}}");
        assert_eq!(root.to_graphql(2).unwrap(), "query {\n  tests {\n}\n}");
    }

    #[test]
    fn test_render_from_any_node_starts_at_root() {
        let leaf = Query::new().field("a").field("b").values(["c"]).unwrap();
        assert_eq!(leaf.to_graphql(0).unwrap(), "query {a {b {c}}}");
    }

    #[test]
    fn test_deep_chain() {
        let query = Query::new();
        let pr = query
            .field("repository")
            .args([("owner", "juliuscaeser"), ("name", "rome")])
            .field("pullRequest")
            .args([("number", 2)])
            .values(["title", "url"])
            .unwrap();
        pr.field("commits")
            .args([("last", 250)])
            .field("edges")
            .field("node")
            .field("commit")
            .values(["id", "message", "messageBody"])
            .unwrap();

        insta::assert_snapshot!(query.to_graphql(2).unwrap(), @r#"
        query {
          repository(owner: "juliuscaeser", name: "rome") {
            pullRequest(number: 2) {
              title
              url
              commits(last: 250) {
                edges {
                  node {
                    commit {
                      id
                      message
                      messageBody
                    }
                  }
                }
              }
            }
          }
        }
        "#);
    }

    #[test]
    fn test_nested_selection_indents_like_children() {
        let commits = Query::new()
            .field("commits")
            .values([
                Selection::from("id"),
                Query::new().field("authors").values(["name", "id"]).unwrap().into(),
            ])
            .unwrap();
        let query = Query::new();
        query
            .field("repository")
            .args([("test", vec![1])])
            .values([Selection::from("title"), Selection::from("url"), commits.into()])
            .unwrap();

        assert_eq!(
            query.to_graphql(0).unwrap(),
            "query {repository(test: [1]) {title url commits {id authors {name id}}}}"
        );
        insta::assert_snapshot!(query.to_graphql(4).unwrap(), @r"
        query {
            repository(test: [1]) {
                title
                url
                commits {
                    id
                    authors {
                        name
                        id
                    }
                }
            }
        }
        ");
    }

    #[test]
    fn test_argument_kinds() {
        let query = Query::mutation();
        query
            .field("repository")
            .args([
                ("owner", Value::from("juliuscaeser")),
                ("isAdmin", true.into()),
                ("test", Value::Null),
                ("orderBy", Literal::new("age_ASC").into()),
                ("id", Variable::new("id").into()),
                ("filter", [("a", 1)].into_iter().collect()),
            ])
            .values([Aliased::new("title", "xxx")])
            .unwrap();

        assert_eq!(
            query.to_graphql(0).unwrap(),
            r#"mutation {repository(owner: "juliuscaeser", isAdmin: true, test: null, orderBy: age_ASC, id: $id, filter: {a: 1}) {xxx: title}}"#
        );
    }

    #[test]
    fn test_empty_arguments_render_without_parentheses() {
        let query = Query::new();
        query
            .field("viewer")
            .args(Vec::<(String, Value)>::new())
            .values(["login"])
            .unwrap();
        assert_eq!(query.to_graphql(0).unwrap(), "query {viewer {login}}");
    }

    #[test]
    fn test_named_operation() {
        let query = Query::new().named("GetUser", [("id", "ID!"), ("$first", "Int")]);
        query
            .field("user")
            .args([("id", Variable::new("id"))])
            .values(["name"])
            .unwrap();

        assert_eq!(
            query.to_graphql(0).unwrap(),
            "query GetUser($id: ID!, $first: Int) {user(id: $id) {name}}"
        );

        let bare = Query::new().named("Viewer", Vec::<(String, String)>::new());
        bare.field("viewer").values(["login"]).unwrap();
        assert_eq!(bare.to_graphql(0).unwrap(), "query Viewer {viewer {login}}");
    }

    #[test]
    fn test_infinite_argument_fails_render() {
        let query = Query::new();
        query
            .field("repository")
            .args([("xxx", f64::INFINITY)])
            .values(["id"])
            .unwrap();
        assert!(matches!(
            query.to_graphql(2),
            Err(crate::Error::InfinityNotSupported(_))
        ));
    }
}
