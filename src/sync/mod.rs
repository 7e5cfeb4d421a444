pub mod synchronizer;

pub use synchronizer::{
    FetchReason, FetchTicket, MessageView, Outcome, OutgoingMessage, Synchronizer,
    SynchronizerState, validate_outgoing,
};
