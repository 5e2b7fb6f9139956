//! Best-effort parsing of linked-data resources.
//!
//! Only the serializations in [`RdfContentType`] are ever handed to the parser. Anything else is
//! treated as opaque text by the caller. A malformed document of a recognized type is not an error
//! for the view: [`parse_rdf`] logs a warning and reports that no store is available, so the editor
//! falls back to displaying the raw text.

use oxrdfio::{RdfFormat, RdfParser};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    error::BrowserError,
    rdf::{
        store::TripleStore,
        term::{Node, Statement},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RdfContentType {
    Turtle,
    NTriples,
    N3,
    NQuads,
    RdfXml,
}

impl RdfContentType {
    pub const ALL: [RdfContentType; 5] = [
        RdfContentType::Turtle,
        RdfContentType::NTriples,
        RdfContentType::N3,
        RdfContentType::NQuads,
        RdfContentType::RdfXml,
    ];

    /// Match a declared content type against the allow-list. Parameters such as `charset` are
    /// ignored and the comparison is case-insensitive.
    pub fn from_media_type(content_type: &str) -> Option<Self> {
        let essence = media_type_essence(content_type);
        RdfContentType::ALL
            .into_iter()
            .find(|known| known.media_type() == essence)
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            RdfContentType::Turtle => "text/turtle",
            RdfContentType::NTriples => "application/n-triples",
            RdfContentType::N3 => "text/n3",
            RdfContentType::NQuads => "application/n-quads",
            RdfContentType::RdfXml => "application/rdf+xml",
        }
    }

    fn format(&self) -> RdfFormat {
        match self {
            RdfContentType::Turtle => RdfFormat::Turtle,
            RdfContentType::NTriples => RdfFormat::NTriples,
            RdfContentType::N3 => RdfFormat::N3,
            RdfContentType::NQuads => RdfFormat::NQuads,
            RdfContentType::RdfXml => RdfFormat::RdfXml,
        }
    }
}

impl fmt::Display for RdfContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.media_type())
    }
}

/// `text/turtle; charset=utf-8` -> `text/turtle`
pub fn media_type_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Parse `text` into a new store, resolving relative IRIs against `base_uri`.
///
/// Named graphs of quad formats are flattened into the store.
pub fn try_parse(
    text: &str,
    base_uri: &str,
    content_type: RdfContentType,
) -> Result<TripleStore, BrowserError> {
    let mut store = TripleStore::new();
    if text.is_empty() {
        return Ok(store);
    }

    let parser = RdfParser::from_format(content_type.format())
        .with_base_iri(base_uri)
        .map_err(|err| BrowserError::Parse(format!("invalid base IRI {base_uri}: {err}")))?;

    for quad in parser.for_reader(text.as_bytes()) {
        let quad = quad.map_err(|err| BrowserError::Parse(format!("{err}")))?;
        store.insert(Statement {
            subject: Node::from_subject(quad.subject)?,
            predicate: quad.predicate.into_string(),
            object: Node::from_term(quad.object)?,
        });
    }
    Ok(store)
}

/// Best-effort parse.
///
/// Returns `None` without attempting a parse when `content_type` is not a recognized linked-data
/// serialization, and `None` (with a warning) when the text does not parse.
pub fn parse_rdf(text: &str, base_uri: &str, content_type: &str) -> Option<TripleStore> {
    let rdf_type = RdfContentType::from_media_type(content_type)?;
    match try_parse(text, base_uri, rdf_type) {
        Ok(store) => Some(store),
        Err(err) => {
            tracing::warn!("Failed to parse {base_uri} as {rdf_type}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::vocab;

    const BASE: &str = "https://pod.example/actions.ttl";

    #[test]
    fn test_allow_list() {
        assert_eq!(
            RdfContentType::from_media_type("text/turtle"),
            Some(RdfContentType::Turtle)
        );
        assert_eq!(
            RdfContentType::from_media_type("Text/Turtle; charset=UTF-8"),
            Some(RdfContentType::Turtle)
        );
        assert_eq!(
            RdfContentType::from_media_type("application/rdf+xml"),
            Some(RdfContentType::RdfXml)
        );
        assert_eq!(RdfContentType::from_media_type("application/json"), None);
        assert_eq!(RdfContentType::from_media_type("text/plain"), None);
        assert_eq!(RdfContentType::from_media_type(""), None);
    }

    #[test]
    fn test_unrecognized_type_never_parses() {
        // Valid turtle, wrong declared type
        let text = "<a> <b> <c> .";
        for _ in 0..2 {
            assert!(parse_rdf(text, BASE, "application/octet-stream").is_none());
            assert!(parse_rdf(text, BASE, "text/plain").is_none());
        }
    }

    #[test]
    fn test_invalid_text_yields_no_store() {
        let text = "<a> <b> \"unterminated .";
        let first = parse_rdf(text, BASE, "text/turtle");
        let second = parse_rdf(text, BASE, "text/turtle");
        assert!(first.is_none());
        assert_eq!(first, second);
        assert!(try_parse(text, BASE, RdfContentType::Turtle).is_err());
    }

    #[test]
    fn test_empty_text_is_empty_store() {
        let store = parse_rdf("", BASE, "text/turtle").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_relative_iris_resolve_against_base() {
        let text = "@prefix schema: <https://schema.org/> .\n<#a> schema:name \"A\"@en .";
        let store = parse_rdf(text, BASE, "text/turtle").unwrap();
        let statement = store.statements().next().unwrap();
        assert_eq!(
            statement.subject,
            Node::iri("https://pod.example/actions.ttl#a")
        );
        assert_eq!(statement.predicate, vocab::SCHEMA_NAME);
        assert_eq!(
            statement.object,
            Node::Literal {
                value: "A".to_string(),
                datatype: None,
                language: Some("en".to_string())
            }
        );
    }

    #[test]
    fn test_ntriples_output_reparses() {
        let text = r#"@prefix schema: <https://schema.org/> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
<#a> a schema:Action ;
    schema:startTime "2024-01-01"^^xsd:date ;
    schema:object [ schema:name "Song" ] .
"#;
        let store = parse_rdf(text, BASE, "text/turtle").unwrap();
        let ntriples = store.to_ntriples().unwrap();
        let reparsed = parse_rdf(&ntriples, BASE, "application/n-triples").unwrap();
        assert_eq!(reparsed.len(), store.len());
        assert_eq!(reparsed.to_ntriples().unwrap(), ntriples);
    }

    #[test]
    fn test_quads_are_flattened() {
        let text = "<https://pod.example/s> <https://pod.example/p> <https://pod.example/o> <https://pod.example/g> .\n";
        let store = parse_rdf(text, BASE, "application/n-quads").unwrap();
        assert_eq!(store.len(), 1);
    }
}
