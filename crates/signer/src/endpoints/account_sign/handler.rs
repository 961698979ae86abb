//! /accounts/{address}/sign ハンドラ実装

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use base58::ToBase58;
use base64::Engine;

use haven_types::{AccountSignRequest, AccountSignResponse, TransactionEnvelope};

use crate::authorize;
use crate::config::SignerState;
use crate::error::SignerError;
use crate::infra::identity_auth;

/// Base64エンジン（Standard）
pub(crate) fn b64() -> base64::engine::GeneralPurpose {
    base64::engine::general_purpose::STANDARD
}

/// /accounts/{address}/sign エンドポイントハンドラ。
///
/// 認証済みの呼び出し元が対象アカウントのトランザクションへの副署を
/// 受ける権利を持つかを判定し、持つ場合のみ分離署名を生成して返す。
pub async fn handle_account_sign(
    State(state): State<Arc<SignerState>>,
    Path(address): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<AccountSignResponse>, SignerError> {
    // Step 1. 身元証明の検証とクレームの取り出し
    let (claims, inner_body) =
        identity_auth::verify_identity_proof(state.auth_pubkey.as_ref(), &body)?;

    // Step 2. 最低限の認証が行われているかの確認。
    // クレームが全て空の場合、ストア検索より前に401で打ち切る。
    if claims.is_empty() {
        return Err(SignerError::Unauthorized(
            "証明済みの識別子がありません".to_string(),
        ));
    }

    // Step 3. 対象アドレスの形式検証（Base58エンコードされたEd25519公開鍵）
    haven_crypto::verifying_key_from_base58(&address)
        .map_err(|_| SignerError::BadRequest("対象アドレスの形式が不正です".to_string()))?;

    // リクエスト本文のデコード
    let request: AccountSignRequest = serde_json::from_value(inner_body)
        .map_err(|e| SignerError::BadRequest(format!("リクエスト本文のパースに失敗: {e}")))?;

    // Step 4. アカウントレコードの検索。
    // 不在（Ok(None)）は想定内の404、ストア障害（Err)は500。
    let account = match state.store.get(&address).await {
        Ok(Some(account)) => account,
        Ok(None) => return Err(SignerError::NotFound),
        Err(e) => return Err(SignerError::Internal(e.to_string())),
    };

    // Step 5. クレームとアカウントの照合。
    // 不一致も404を返し、「アカウントが存在しない」と区別できないようにする。
    if !authorize::claims_match_account(&claims, &account) {
        return Err(SignerError::NotFound);
    }

    // Step 6. トランザクションエンベロープのデコードとスコープ検証
    let tx = TransactionEnvelope::from_base64(&request.transaction)
        .map_err(|e| SignerError::BadRequest(e.to_string()))?;
    authorize::validate_source_scope(&tx, &address)
        .map_err(|e| SignerError::BadRequest(e.to_string()))?;

    // Step 7. ネットワークパスフレーズを束縛したダイジェストに署名
    let tx_bytes = tx
        .to_bytes()
        .map_err(|e| SignerError::Internal(format!("エンベロープの再シリアライズに失敗: {e}")))?;
    let hash = haven_crypto::transaction_hash(&state.network_passphrase, &tx_bytes);
    let signature = state
        .custody
        .sign(&hash)
        .map_err(|e| SignerError::Internal(e.to_string()))?;

    Ok(Json(AccountSignResponse {
        public_key: state.custody.public_key().to_base58(),
        signature: b64().encode(&signature),
        network_passphrase: state.network_passphrase.clone(),
    }))
}
