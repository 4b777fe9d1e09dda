pub mod form;
pub mod instance;

pub use form::Form;
pub use instance::{Instance, InstanceStatus};
