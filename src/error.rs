use derive_more::{Display, Error};

/// Priority map custom error
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum PriorityMapError {
    #[display(fmt = "Priority map is empty")]
    Empty,
    #[display(fmt = "Key is already present")]
    DuplicateKey,
    #[display(fmt = "Key is not present")]
    MissingKey,
}

impl PriorityMapError {
    /// Return the name of this error
    pub fn name(&self) -> String {
        match self {
            Self::Empty => "Empty".to_string(),
            Self::DuplicateKey => "Duplicate Key".to_string(),
            Self::MissingKey => "Missing Key".to_string(),
        }
    }
}
