pub mod counts;
pub mod error;
pub mod extract;
mod http;
pub mod resolver;
pub mod source;
pub mod sources;

pub use error::{ResolveError, SourceError};
pub use extract::{default_extractors, CountExtractor, ExtractedProfile, PageDocument};
pub use resolver::Resolver;
pub use source::ProfileSource;
pub use sources::{live_sources, ApifySource, DemoSource, PublicPageSource, RapidApiSource};
