//! Account access capability used by the spreadsheet protocol.

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

/// Errors from the account capability.
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Permission to access accounts was not granted")]
    PermissionDenied,

    #[error("No account selected")]
    NoAccountSelected,

    #[error("Failed to obtain access token for '{account}': {reason}")]
    Token { account: String, reason: String },
}

/// Access to the user's spreadsheet-service accounts.
#[async_trait]
pub trait AccountAccess: Send + Sync {
    /// Whether the user granted permission to enumerate accounts.
    fn is_permission_granted(&self) -> bool;

    /// The last account the user picked, if it is still present on the device.
    fn last_selected_account_if_valid(&self) -> Option<String>;

    /// Makes `account` the one used for subsequent requests.
    fn select_account(&self, account: &str);

    /// The currently selected account.
    fn selected_account(&self) -> Option<String>;

    /// Fetches a bearer token for the selected account.
    async fn access_token(&self) -> Result<SecretString, AccountError>;
}
