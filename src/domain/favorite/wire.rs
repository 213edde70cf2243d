//! Wire types for the favorites endpoints (REST).

use crate::shared::Symbol;
use serde::{Deserialize, Serialize};

/// One entry of `GET /favorites`. Extra backend columns (id, user_id,
/// created_at) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteResponse {
    pub symbol: Symbol,
}

/// Body of `POST /favorites`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRequest {
    pub symbol: Symbol,
}
