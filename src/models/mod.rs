pub mod job;
pub mod outcome;
pub mod progress;

pub use job::{Credentials, EstimateSource, ListingLink, PageEstimate, SearchQuery};
pub use outcome::{ApplicationOutcome, ApplyStatus, RunAbort, RunResult};
pub use progress::{Phase, ProgressEvent, ProgressLevel};
