//! Document ingestion: PDF text extraction and folder scanning

mod extractor;
mod parser;

pub use extractor::DocumentExtractor;
pub use parser::PdfParser;
