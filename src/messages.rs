use crate::compare::{CompareError, Comparison};
use crate::render::Ticket;
use crate::version::VersionSet;
use std::path::PathBuf;

/// Response messages from background operations
pub enum ResponseMessage {
    VersionsLoaded(Result<(PathBuf, VersionSet), String>), // (source file, versions), error
    ComparisonDone(Ticket, Result<Comparison, CompareError>),
    ActivationDone(Result<String, String>), // success text, error text
}
