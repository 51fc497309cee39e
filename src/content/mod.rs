pub mod dom;
pub mod extractor;
pub mod fetcher;
pub mod handler;

pub use extractor::{extract_content, ContentMetadata, ExtractedContent};
pub use fetcher::{FetchError, PageFetcher};
