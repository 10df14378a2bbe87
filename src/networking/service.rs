//! Seam between the session and the rules collaborator
//!
//! [`GameService`] is one method per remote operation. The HTTP
//! implementation lives in [`crate::networking::http`]; tests and embedders
//! can supply their own.

use crate::game::error::ClientResult;
use async_trait::async_trait;
use shared::{GameRecord, LegalMovesGrid};
use std::sync::Arc;

#[async_trait]
pub trait GameService: Send + Sync {
    /// Start a game in the standard opening position; returns its identifier
    async fn create_game(&self) -> ClientResult<String>;

    /// Read a game, `Ok(None)` if the identifier is unknown
    async fn fetch_game(&self, uid: &str) -> ClientResult<Option<GameRecord>>;

    /// Legal destinations for a square label or hand sentinel
    async fn read_legal_moves(&self, uid: &str, from_square: &str) -> ClientResult<LegalMovesGrid>;

    async fn make_move(
        &self,
        uid: &str,
        from_square: &str,
        to_square: &str,
        promotion: bool,
    ) -> ClientResult<()>;

    /// Let the collaborator's engine play the side to move
    async fn ai_move(&self, uid: &str) -> ClientResult<()>;
}

#[async_trait]
impl<T: GameService + ?Sized> GameService for Arc<T> {
    async fn create_game(&self) -> ClientResult<String> {
        (**self).create_game().await
    }

    async fn fetch_game(&self, uid: &str) -> ClientResult<Option<GameRecord>> {
        (**self).fetch_game(uid).await
    }

    async fn read_legal_moves(&self, uid: &str, from_square: &str) -> ClientResult<LegalMovesGrid> {
        (**self).read_legal_moves(uid, from_square).await
    }

    async fn make_move(
        &self,
        uid: &str,
        from_square: &str,
        to_square: &str,
        promotion: bool,
    ) -> ClientResult<()> {
        (**self)
            .make_move(uid, from_square, to_square, promotion)
            .await
    }

    async fn ai_move(&self, uid: &str) -> ClientResult<()> {
        (**self).ai_move(uid).await
    }
}
