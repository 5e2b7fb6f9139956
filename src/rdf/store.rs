use crate::{
    error::BrowserError,
    rdf::term::{Node, Statement},
};

/// A mutable set of statements parsed from one resource.
///
/// Statements keep their insertion order, which is the enumeration order of every query. The store
/// is owned by the component that parsed it; mutations are in place and never persisted by the store
/// itself (see [`TripleStore::to_ntriples`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripleStore {
    statements: Vec<Statement>,
}

impl TripleStore {
    pub fn new() -> Self {
        TripleStore::default()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    /// Insert a statement. Returns false if it was already present.
    pub fn add(&mut self, subject: Node, predicate: impl Into<String>, object: Node) -> bool {
        self.insert(Statement::new(subject, predicate, object))
    }

    pub fn insert(&mut self, statement: Statement) -> bool {
        if self.statements.contains(&statement) {
            false
        } else {
            self.statements.push(statement);
            true
        }
    }

    /// Statements matching the pattern; `None` positions are wildcards.
    pub fn statements_matching<'a>(
        &'a self,
        subject: Option<&'a Node>,
        predicate: Option<&'a str>,
        object: Option<&'a Node>,
    ) -> impl Iterator<Item = &'a Statement> + 'a {
        self.statements
            .iter()
            .filter(move |st| matches(st, subject, predicate, object))
    }

    pub fn any_statement_matching(
        &self,
        subject: Option<&Node>,
        predicate: Option<&str>,
        object: Option<&Node>,
    ) -> Option<&Statement> {
        self.statements
            .iter()
            .find(|st| matches(st, subject, predicate, object))
    }

    /// Lexical value of the first object for `(subject, predicate, *)`.
    pub fn any_value(&self, subject: &Node, predicate: &str) -> Option<&str> {
        self.any_statement_matching(Some(subject), Some(predicate), None)
            .map(|st| st.object.value())
    }

    /// Remove every statement matching the pattern. Returns how many were removed.
    pub fn remove_matches(
        &mut self,
        subject: Option<&Node>,
        predicate: Option<&str>,
        object: Option<&Node>,
    ) -> usize {
        let before = self.statements.len();
        self.statements
            .retain(|st| !matches(st, subject, predicate, object));
        before - self.statements.len()
    }

    /// Serialize the whole store as N-Triples, in enumeration order.
    pub fn to_ntriples(&self) -> Result<String, BrowserError> {
        let mut out = String::new();
        for statement in self.statements.iter() {
            out.push_str(&statement.to_ntriples()?);
        }
        Ok(out)
    }
}

impl Extend<Statement> for TripleStore {
    fn extend<I: IntoIterator<Item = Statement>>(&mut self, iter: I) {
        for statement in iter {
            self.insert(statement);
        }
    }
}

impl FromIterator<Statement> for TripleStore {
    fn from_iter<I: IntoIterator<Item = Statement>>(iter: I) -> Self {
        let mut store = TripleStore::new();
        store.extend(iter);
        store
    }
}

fn matches(
    statement: &Statement,
    subject: Option<&Node>,
    predicate: Option<&str>,
    object: Option<&Node>,
) -> bool {
    subject.is_none_or(|s| &statement.subject == s)
        && predicate.is_none_or(|p| statement.predicate == p)
        && object.is_none_or(|o| &statement.object == o)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TripleStore {
        let a = Node::iri("https://pod.example/a");
        let b = Node::iri("https://pod.example/b");
        let mut store = TripleStore::new();
        store.add(a.clone(), "https://schema.org/name", Node::literal("A"));
        store.add(b.clone(), "https://schema.org/name", Node::literal("B"));
        store.add(a, "https://schema.org/knows", b);
        store
    }

    #[test]
    fn test_add_is_set_semantics() {
        let mut store = sample();
        assert!(!store.add(
            Node::iri("https://pod.example/a"),
            "https://schema.org/name",
            Node::literal("A")
        ));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_matching_keeps_insertion_order() {
        let store = sample();
        let names: Vec<&str> = store
            .statements_matching(None, Some("https://schema.org/name"), None)
            .map(|st| st.object.value())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(
            store.any_value(&Node::iri("https://pod.example/b"), "https://schema.org/name"),
            Some("B")
        );
        assert_eq!(
            store.any_value(&Node::iri("https://pod.example/c"), "https://schema.org/name"),
            None
        );
    }

    #[test]
    fn test_remove_matches() {
        let mut store = sample();
        let a = Node::iri("https://pod.example/a");
        assert_eq!(store.remove_matches(Some(&a), None, None), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.remove_matches(Some(&a), None, None), 0);
    }
}
