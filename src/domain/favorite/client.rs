//! Favorites sub-client — list, add, remove.
//!
//! Every call needs a bearer token; without one the call fails with
//! `AuthError::NotAuthenticated` and no request is sent.

use crate::client::MarketClient;
use crate::error::{AuthError, SdkError};
use crate::shared::Symbol;

pub struct FavoritesClient<'a> {
    pub(crate) client: &'a MarketClient,
}

impl<'a> FavoritesClient<'a> {
    /// The user's favorited symbols, in backend order.
    pub async fn list(&self) -> Result<Vec<Symbol>, SdkError> {
        self.require_token().await?;
        let resp = self.client.http.get_favorites().await?;
        Ok(resp.into_iter().map(|f| f.symbol).collect())
    }

    pub async fn add(&self, symbol: &Symbol) -> Result<(), SdkError> {
        self.require_token().await?;
        self.client.http.add_favorite(symbol).await?;
        Ok(())
    }

    pub async fn remove(&self, symbol: &Symbol) -> Result<(), SdkError> {
        self.require_token().await?;
        self.client.http.remove_favorite(symbol).await?;
        Ok(())
    }

    async fn require_token(&self) -> Result<(), SdkError> {
        if self.client.http.has_auth_token().await {
            Ok(())
        } else {
            Err(AuthError::NotAuthenticated.into())
        }
    }
}
