//! # 署名サーバー設定・共有状態
//!
//! 環境変数から組み立てられる共有状態の定義。
//! カストディ鍵とネットワークパスフレーズはプロセスグローバルではなく、
//! この構造体を通じて各ハンドラに注入される。

use haven_crypto::Ed25519VerifyingKey;

use crate::custody::SigningBackend;
use crate::store::AccountStore;

/// 署名サーバーの共有状態。
pub struct SignerState {
    /// カストディ署名鍵のバックエンド
    pub custody: Box<dyn SigningBackend>,
    /// 署名を束縛するネットワークのパスフレーズ
    pub network_passphrase: String,
    /// 身元証明サービスのEd25519公開鍵（環境変数 AUTH_PUBKEY で設定）。
    /// Noneの場合は身元証明ラッパーの署名検証をスキップ（開発環境用）。
    pub auth_pubkey: Option<Ed25519VerifyingKey>,
    /// アカウントレコードのストア（読み取り専用アクセス）
    pub store: Box<dyn AccountStore>,
}
