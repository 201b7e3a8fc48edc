// Profile extraction: free text (typed or transcribed) to structured details.
// Model calls go through llm_client; the keyword fallback needs no network.

pub mod fallback;
pub mod gateway;
pub mod handlers;
pub mod prompts;

pub use gateway::{Extraction, ExtractionGateway, ExtractionSource};
