use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Cobre a taxonomia inteira do pipeline: validação, conflito, permissão,
// banco de dados. Falhas de telemetria e da varredura de ciclo de vida
// NUNCA viram uma dessas respostas — são engolidas e logadas na origem.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Token inválido")]
    InvalidToken,

    #[error("Sem permissão para acessar este recurso")]
    Forbidden,

    #[error("Campanha não encontrada")]
    CampaignNotFound,

    #[error("Imóvel não encontrado")]
    PropertyNotFound,

    #[error("Este imóvel já possui uma campanha ativa")]
    PropertyAlreadyPromoted,

    #[error("Consulta já enviada para este anúncio")]
    DuplicateLead,

    #[error("Transição de status não permitida")]
    InvalidTransition,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    // Só erros transitórios do store entram na política de retentativa.
    // Validação/conflito/permissão falham de imediato, sem retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AppError::DatabaseError(
                sqlx::Error::Io(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::WorkerCrashed
            )
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.",
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Você não tem permissão para acessar este recurso.",
            ),
            AppError::CampaignNotFound => (StatusCode::NOT_FOUND, "Campanha não encontrada."),
            AppError::PropertyNotFound => (StatusCode::NOT_FOUND, "Imóvel não encontrado."),
            AppError::PropertyAlreadyPromoted => (
                StatusCode::CONFLICT,
                "Este imóvel já possui uma campanha ativa.",
            ),
            AppError::DuplicateLead => (
                StatusCode::CONFLICT,
                "Você já enviou uma consulta para este anúncio.",
            ),
            AppError::InvalidTransition => (
                StatusCode::CONFLICT,
                "Transição de status não permitida para esta campanha.",
            ),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
