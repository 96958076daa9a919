use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One element of an edit request's operation list. Carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditOperation(pub Value);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The edited document is byte-identical to its source.
    Unchanged,
    Rewritten(Vec<u8>),
}
