//! Background upload of finalized instances.

pub mod error;
pub mod fetcher;
pub mod precondition;
pub mod scheduler;
pub mod task;

pub use error::{AutoSendError, SPREADSHEET_ONLY_MESSAGE};
pub use fetcher::{
    at_least_one_form_specifies_auto_send, form_should_be_auto_deleted, instances_to_auto_send,
};
pub use precondition::Precondition;
pub use scheduler::AutoSendScheduler;
pub use task::{AutoSendContext, AutoSendTask, RunOutcome};
