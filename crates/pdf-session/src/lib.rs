mod codec;
mod history;
mod selection;
pub mod session;
mod snapshot;
mod staged;
mod types;

pub use codec::PageCodec;
pub use history::HistoryStack;
pub use selection::SelectionModel;
pub use session::{EditSession, SessionState};
pub use snapshot::DocumentSnapshot;
pub use staged::StagedEdits;
pub use types::*;
