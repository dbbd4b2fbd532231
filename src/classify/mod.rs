mod models;
mod openai;
mod verdict;

pub use models::{ChangeKind, ChangeResult};
pub use openai::OpenAiClassifier;
pub use verdict::{parse_verdict, NO_CHANGE_SENTINEL};
