//! # 署名サーバー エラー型
//!
//! 全エンドポイントで共通のエラー型。
//! 全ての内部失敗はクライアントに返す前にこの4カテゴリのいずれかに写像される。

use axum::http::StatusCode;

/// 署名サーバーエラー型。
///
/// `NotFound`は「アカウントが存在しない」と「クレームが一致しない」の両方を
/// 表す。両者を区別して返すと、認証済みの呼び出し元にアカウントの存在有無を
/// 列挙されてしまうため、意図的に同一カテゴリへ畳み込んでいる。
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    /// 認証が行われていない（クレームが空、または身元証明の検証失敗）
    #[error("認証されていません: {0}")]
    Unauthorized(String),
    /// アカウントが見つからない、またはクレームがアカウントと一致しない
    #[error("アカウントが見つかりません")]
    NotFound,
    /// 不正なリクエスト（パース失敗、アドレス形式不正、スコープ違反）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),
    /// 内部エラー（ストア障害、署名処理失敗）。
    /// 詳細はログにのみ記録し、クライアントには返さない。
    #[error("内部エラーが発生しました")]
    Internal(String),
}

impl axum::response::IntoResponse for SignerError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            SignerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            SignerError::NotFound => StatusCode::NOT_FOUND,
            SignerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            SignerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let SignerError::Internal(detail) = &self {
            tracing::error!(%detail, "内部エラー");
        }
        (status, self.to_string()).into_response()
    }
}
