mod orchestrator;
pub mod scheduler;
mod traits;

pub use orchestrator::{run_cycle, CheckOutcome, CycleStats};
pub use traits::{Classifier, Notifier, PageFetcher};
