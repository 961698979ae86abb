//! # Haven リカバリー署名サーバー
//!
//! 認証済みの呼び出し元が特定アカウントのトランザクションへの副署を受ける
//! 権利を持つかを判定し、持つ場合のみカストディ鍵で分離署名を生成して返す
//! HTTPサーバーのエントリポイント。
//!
//! ## API エンドポイント
//! - `POST /accounts/{address}/sign` — 認可判定と副署
//! - `GET /.well-known/haven-signer-info` — カストディ公開鍵等の公開
//!
//! ## 環境変数
//! - `SIGNING_KEY_SEED` — カストディ署名鍵のシード（32バイトのhex、必須）
//! - `NETWORK_PASSPHRASE` — 署名を束縛するネットワークのパスフレーズ
//! - `AUTH_PUBKEY` — 身元証明サービスのEd25519公開鍵（Base58）。
//!   未設定の場合は身元証明の署名検証をスキップ（開発環境用）
//! - `ACCOUNTS_FILE` — 起動時に読み込むアカウントレコードのJSONファイル
//! - `BIND_ADDR` — バインドアドレス（デフォルト: 0.0.0.0:4000）

mod authorize;
mod config;
mod custody;
mod endpoints;
mod error;
mod infra;
mod store;

use std::sync::Arc;

use base58::ToBase58;

use crate::config::SignerState;
use crate::custody::{LocalKey, SigningBackend};
use crate::store::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // カストディ署名鍵の読み込み
    let seed_hex = std::env::var("SIGNING_KEY_SEED")
        .map_err(|_| anyhow::anyhow!("環境変数 SIGNING_KEY_SEED が未設定です"))?;
    let custody: Box<dyn SigningBackend> = Box::new(LocalKey::from_hex_seed(&seed_hex)?);
    tracing::info!(
        backend = custody.backend_type(),
        signing_pubkey = %custody.public_key().to_base58(),
        "カストディ署名鍵を読み込みました"
    );

    let network_passphrase = std::env::var("NETWORK_PASSPHRASE")
        .unwrap_or_else(|_| "Haven Test Network ; Aug 2026".to_string());

    // 身元証明サービスの公開鍵
    let auth_pubkey = match std::env::var("AUTH_PUBKEY") {
        Ok(encoded) => Some(haven_crypto::verifying_key_from_base58(&encoded)?),
        Err(_) => {
            tracing::warn!("AUTH_PUBKEY が未設定のため、身元証明の署名検証をスキップします（開発環境用）");
            None
        }
    };

    // アカウントストアの初期化
    let store = MemoryStore::from_env()?;
    tracing::info!(accounts = store.len(), "アカウントストアを初期化しました");

    let shared_state = Arc::new(SignerState {
        custody,
        network_passphrase,
        auth_pubkey,
        store: Box::new(store),
    });

    // axumルーターの構築
    let app = axum::Router::new()
        .route(
            "/accounts/{address}/sign",
            axum::routing::post(endpoints::handle_account_sign),
        )
        .route(
            "/.well-known/haven-signer-info",
            axum::routing::get(endpoints::handle_signer_info),
        )
        .with_state(shared_state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:4000".to_string());
    tracing::info!("Haven署名サーバーを {} で起動します", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
