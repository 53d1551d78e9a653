//! Valet HTML
//!
//! HTML5 parsing built on html5ever, producing `valet-dom` documents, and
//! serialization of DOM subtrees back to markup.

mod parser;
mod serializer;

pub use parser::HtmlParser;
pub use serializer::HtmlSerializer;
pub use valet_dom::Document;

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}

/// HTML front-end error
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to build document: {0}")]
    Dom(#[from] valet_dom::DomError),
}
