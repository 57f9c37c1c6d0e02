//! JWT claim structure for access tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims embedded in an access token.
///
/// `userId` is the user's external registration id. `exp` is only present
/// when a token lifetime is configured.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
    /// Token expiration timestamp (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>,
}
