//! Linked-data support: terms, an in-memory triple store and best-effort parsing.
//!
//! # Module Organization
//!
//! - [`term`]: RDF terms and statements ([`Node`], [`Statement`])
//! - [`store`]: [`TripleStore`], the mutable statement set owned by one editing session
//! - [`parse`]: content-type allow-list and parsing ([`parse_rdf`], [`try_parse`])
//! - [`vocab`]: IRIs of the predicates and classes this crate reads and writes
//!
//! ```rust
//! use pod_actions::rdf::{parse_rdf, vocab};
//!
//! let profile = "<#me> <http://www.w3.org/ns/pim/space#storage> </> .";
//! let store = parse_rdf(profile, "https://alice.pod.example/profile/card", "text/turtle").unwrap();
//! let storage = store.any_statement_matching(None, Some(vocab::PIM_STORAGE), None);
//! assert_eq!(storage.unwrap().object.value(), "https://alice.pod.example/");
//! ```

pub mod parse;
pub mod store;
pub mod term;

pub use parse::{parse_rdf, try_parse, RdfContentType};
pub use store::TripleStore;
pub use term::{Node, Statement};

pub mod vocab {
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

    pub const SCHEMA_ACTION: &str = "https://schema.org/Action";
    pub const SCHEMA_ADDITIONAL_TYPE: &str = "https://schema.org/additionalType";
    pub const SCHEMA_OBJECT: &str = "https://schema.org/object";
    pub const SCHEMA_NAME: &str = "https://schema.org/name";
    pub const SCHEMA_START_TIME: &str = "https://schema.org/startTime";

    pub const PIM_STORAGE: &str = "http://www.w3.org/ns/pim/space#storage";
    pub const LDP_CONTAINS: &str = "http://www.w3.org/ns/ldp#contains";
}
