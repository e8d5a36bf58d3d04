/// Result of a partial update. Both variants are success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// An UPDATE ran; `rows` may be 0 when the row vanished meanwhile.
    Applied { rows: u64 },
    /// Nothing present to write, no statement issued.
    NoFields,
}

impl UpdateOutcome {
    pub fn rows(self) -> u64 {
        match self {
            Self::Applied { rows } => rows,
            Self::NoFields => 0,
        }
    }
}
