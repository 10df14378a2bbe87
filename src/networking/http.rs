//! HTTP transport for the rules collaborator
//!
//! Every operation is a callable function: the client POSTs
//! `{"data": <request>}` to `<endpoint>/<operation>` and the collaborator
//! answers `{"result": <value>}` on success or `{"error": {...}}` otherwise.
//! A 404, or an error envelope whose status is `NOT_FOUND`, means the game
//! identifier is unknown.

use crate::core::config::ClientConfig;
use crate::core::error::ConfigError;
use crate::game::error::{ClientError, ClientResult};
use crate::networking::service::GameService;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{
    AiMoveRequest, CallError, CallRequest, CallResponse, CreateGameRequest, GameRecord,
    LegalMovesGrid, LegalMovesRequest, MakeMoveRequest, Operation, ReadGameRequest,
};

/// [`GameService`] backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpGameService {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpGameService {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient {
                message: e.to_string(),
            })?;
        Ok(HttpGameService { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Post one callable; `Ok(None)` when the collaborator reports not-found
    async fn call<Req, Res>(&self, operation: Operation, data: Req) -> ClientResult<Option<Res>>
    where
        Req: Serialize + Send,
        Res: DeserializeOwned + Send,
    {
        let url = self.config.operation_url(operation);
        tracing::debug!("[HTTP] POST {}", url);

        let response = self
            .client
            .post(url)
            .json(&CallRequest { data })
            .send()
            .await
            .map_err(|e| ClientError::remote(operation, e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::remote(operation, e.to_string()))?;

        decode_response(operation, status, &body)
    }
}

/// Map a raw HTTP answer onto the callable envelope
fn decode_response<T: DeserializeOwned>(
    operation: Operation,
    status: StatusCode,
    body: &[u8],
) -> ClientResult<Option<T>> {
    if status.is_success() {
        let envelope: CallResponse<T> = serde_json::from_slice(body).map_err(|e| {
            ClientError::remote(operation, format!("unreadable response: {e}"))
        })?;
        return Ok(Some(envelope.result));
    }

    let error = serde_json::from_slice::<CallError>(body).ok();
    if status == StatusCode::NOT_FOUND || error.as_ref().is_some_and(|e| e.error.is_not_found()) {
        return Ok(None);
    }

    let message = match error {
        Some(CallError { error }) => format!("{status}: {} ({})", error.message, error.status),
        None => format!("{status}: {}", String::from_utf8_lossy(body)),
    };
    Err(ClientError::remote(operation, message))
}

fn not_found(uid: &str) -> ClientError {
    ClientError::NotFound {
        uid: uid.to_string(),
    }
}

#[async_trait]
impl GameService for HttpGameService {
    async fn create_game(&self) -> ClientResult<String> {
        self.call(Operation::CreateGame, CreateGameRequest::default())
            .await?
            .ok_or_else(|| ClientError::remote(Operation::CreateGame, "endpoint not found"))
    }

    async fn fetch_game(&self, uid: &str) -> ClientResult<Option<GameRecord>> {
        let request = ReadGameRequest {
            uid: uid.to_string(),
        };
        self.call(Operation::ReadGame, request).await
    }

    async fn read_legal_moves(&self, uid: &str, from_square: &str) -> ClientResult<LegalMovesGrid> {
        let request = LegalMovesRequest {
            from_square: from_square.to_string(),
            uid: uid.to_string(),
        };
        self.call(Operation::ReadLegalMoves, request)
            .await?
            .ok_or_else(|| not_found(uid))
    }

    async fn make_move(
        &self,
        uid: &str,
        from_square: &str,
        to_square: &str,
        promotion: bool,
    ) -> ClientResult<()> {
        let request = MakeMoveRequest {
            from_square: from_square.to_string(),
            to_square: to_square.to_string(),
            uid: uid.to_string(),
            promotion,
        };
        self.call::<_, serde_json::Value>(Operation::MakeMove, request)
            .await?
            .map(|_| ())
            .ok_or_else(|| not_found(uid))
    }

    async fn ai_move(&self, uid: &str) -> ClientResult<()> {
        let request = AiMoveRequest {
            uid: uid.to_string(),
        };
        self.call::<_, serde_json::Value>(Operation::AiMove, request)
            .await?
            .map(|_| ())
            .ok_or_else(|| not_found(uid))
    }
}
