use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    #[error("commit failed: {0}")]
    CommitFailed(String),
    #[error("page index {index} out of range for {page_count} pages")]
    IndexOutOfRange { index: usize, page_count: usize },
    #[error("another operation is in progress")]
    Busy,
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Quarter-turn page rotation, composed mod 360
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    /// Wrap an angle to a quarter turn; non-right angles fall back to zero
    pub fn from_degrees(degrees: i32) -> Self {
        match degrees.rem_euclid(360) {
            90 => Rotation::Clockwise90,
            180 => Rotation::Clockwise180,
            270 => Rotation::Clockwise270,
            _ => Rotation::None,
        }
    }

    /// Additive composition, wrapping to [0, 360)
    pub fn compose(self, delta: Rotation) -> Rotation {
        Rotation::from_degrees(self.degrees() + delta.degrees())
    }
}
