use serde::{Deserialize, Serialize};

/// A sentence eligible for deduplication.
///
/// Ids are dense, zero-based, and ascend in candidate-file order; they are
/// assigned by the prepare step and never reused.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Record {
    pub id: u32,
    pub text: String,
}

/// One line of a review file. Fields other than `text` are ignored.
#[derive(Debug, Deserialize)]
pub struct Review {
    pub text: String,
}
