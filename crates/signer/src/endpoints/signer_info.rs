//! # GET /.well-known/haven-signer-info
//!
//! 署名サーバー情報公開エンドポイント。

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use base58::ToBase58;

use haven_types::SignerInfo;

use crate::config::SignerState;

/// GET /.well-known/haven-signer-info — 署名サーバー情報公開。
///
/// クライアント（ウォレット）が分離署名を検証するために必要な
/// カストディ公開鍵とネットワークパスフレーズを返却する。
pub async fn handle_signer_info(State(state): State<Arc<SignerState>>) -> Json<SignerInfo> {
    Json(SignerInfo {
        signing_pubkey: state.custody.public_key().to_base58(),
        network_passphrase: state.network_passphrase.clone(),
    })
}
