pub mod completion;

pub use completion::{CompletionCoordinator, CoordinatorDeps, UploadOutcome, UploadRequest};
