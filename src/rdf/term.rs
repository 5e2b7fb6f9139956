use serde::{Deserialize, Serialize};
use std::fmt;

use oxrdf::{BlankNode, Literal, NamedNode, Subject, Term, Triple};

use crate::{error::BrowserError, rdf::vocab::XSD_STRING};

/// An RDF term. Predicates are always IRIs and are stored as plain strings on [`Statement`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Node {
    Iri(String),
    /// Blank node label, without the `_:` prefix
    Blank(String),
    Literal {
        value: String,
        /// None for plain `xsd:string` and language-tagged literals
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl Node {
    pub fn iri(iri: impl Into<String>) -> Self {
        Node::Iri(iri.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Node::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// The lexical value: IRI, blank label or literal text.
    pub fn value(&self) -> &str {
        match self {
            Node::Iri(iri) => iri,
            Node::Blank(label) => label,
            Node::Literal { value, .. } => value,
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Node::Iri(_))
    }

    pub(crate) fn from_subject(subject: Subject) -> Result<Node, BrowserError> {
        #[allow(unreachable_patterns)]
        match subject {
            Subject::NamedNode(node) => Ok(Node::Iri(node.into_string())),
            Subject::BlankNode(node) => Ok(Node::Blank(node.into_string())),
            other => Err(BrowserError::Parse(format!(
                "unsupported subject term {other}"
            ))),
        }
    }

    pub(crate) fn from_term(term: Term) -> Result<Node, BrowserError> {
        #[allow(unreachable_patterns)]
        match term {
            Term::NamedNode(node) => Ok(Node::Iri(node.into_string())),
            Term::BlankNode(node) => Ok(Node::Blank(node.into_string())),
            Term::Literal(literal) => {
                let language = literal.language().map(str::to_string);
                let datatype = literal.datatype().as_str();
                let datatype = if language.is_some() || datatype == XSD_STRING {
                    None
                } else {
                    Some(datatype.to_string())
                };
                Ok(Node::Literal {
                    value: literal.value().to_string(),
                    datatype,
                    language,
                })
            }
            other => Err(BrowserError::Parse(format!(
                "unsupported object term {other}"
            ))),
        }
    }

    fn to_subject(&self) -> Result<Subject, BrowserError> {
        match self {
            Node::Iri(iri) => Ok(NamedNode::new_unchecked(iri.clone()).into()),
            Node::Blank(label) => Ok(BlankNode::new_unchecked(label.clone()).into()),
            Node::Literal { value, .. } => Err(BrowserError::Serialization(format!(
                "literal \"{value}\" cannot be a subject"
            ))),
        }
    }

    fn to_term(&self) -> Term {
        match self {
            Node::Iri(iri) => NamedNode::new_unchecked(iri.clone()).into(),
            Node::Blank(label) => BlankNode::new_unchecked(label.clone()).into(),
            Node::Literal {
                value,
                language: Some(language),
                ..
            } => Literal::new_language_tagged_literal_unchecked(value.clone(), language.clone())
                .into(),
            Node::Literal {
                value,
                datatype: Some(datatype),
                ..
            } => Literal::new_typed_literal(value.clone(), NamedNode::new_unchecked(datatype.clone()))
                .into(),
            Node::Literal { value, .. } => Literal::new_simple_literal(value.clone()).into(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_term())
    }
}

/// One subject-predicate-object statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    pub subject: Node,
    pub predicate: String,
    pub object: Node,
}

impl Statement {
    pub fn new(subject: Node, predicate: impl Into<String>, object: Node) -> Self {
        Statement {
            subject,
            predicate: predicate.into(),
            object,
        }
    }

    /// The statement as an N-Triples line, terminating newline included.
    pub fn to_ntriples(&self) -> Result<String, BrowserError> {
        let triple = Triple::new(
            self.subject.to_subject()?,
            NamedNode::new_unchecked(self.predicate.clone()),
            self.object.to_term(),
        );
        Ok(format!("{triple} .\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_ntriples_escaping() {
        let statement = Statement::new(
            Node::iri("https://pod.example/a"),
            "https://schema.org/name",
            Node::literal("say \"hi\"\n"),
        );
        assert_eq!(
            statement.to_ntriples().unwrap(),
            "<https://pod.example/a> <https://schema.org/name> \"say \\\"hi\\\"\\n\" .\n"
        );
    }

    #[test]
    fn test_literal_subject_is_rejected() {
        let statement = Statement::new(
            Node::literal("nope"),
            "https://schema.org/name",
            Node::literal("x"),
        );
        assert!(statement.to_ntriples().is_err());
    }
}
