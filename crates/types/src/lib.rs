//! # Haven 共有型定義
//!
//! リカバリー署名サーバーとその周辺コラボレーター（身元証明サービス、
//! アカウント登録プロセス、クライアントSDK）が共有するデータ構造を提供する。
//!
//! ## エンコーディング規則
//! - Base58: アカウントアドレス、Ed25519公開鍵（人間が読みやすく、紛らわしい文字を除外）
//! - Base64: バイナリデータ（署名、トランザクションエンベロープ等）

use base64::Engine;
use serde::{Deserialize, Serialize};

/// Base64エンジン（Standard）
fn b64() -> base64::engine::GeneralPurpose {
    base64::engine::general_purpose::STANDARD
}

/// 空文字列と未設定を同一視して正規化する。
/// 未証明のクレームが空のまま登録された識別子と一致することを防ぐ。
fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// 身元クレーム
// ---------------------------------------------------------------------------

/// 上流の身元証明サービスが呼び出し元について証明済みと主張する識別子の束。
/// リクエストごとに一度だけ生成され、処理中は不変として扱う。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// 証明済みのアカウントアドレス（Base58）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// 証明済みの電話番号
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// 証明済みのメールアドレス
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl IdentityClaims {
    /// 証明済みアドレス。未設定・空文字列はいずれも「未証明」としてNoneを返す。
    pub fn address(&self) -> Option<&str> {
        non_empty(&self.address)
    }

    /// 証明済み電話番号。未設定・空文字列はNone。
    pub fn phone_number(&self) -> Option<&str> {
        non_empty(&self.phone_number)
    }

    /// 証明済みメールアドレス。未設定・空文字列はNone。
    pub fn email(&self) -> Option<&str> {
        non_empty(&self.email)
    }

    /// いずれの識別子も証明されていない場合にtrue。
    /// この状態のリクエストは認証そのものが行われていないとみなす。
    pub fn is_empty(&self) -> bool {
        self.address().is_none() && self.phone_number().is_none() && self.email().is_none()
    }
}

// ---------------------------------------------------------------------------
// アカウントレコード
// ---------------------------------------------------------------------------

/// アカウントに紐付く名前付き識別子の束（owner / other）。
/// 部分的にのみ設定されている場合や、全て未設定の場合がある。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Identity {
    /// 登録済みアドレス（Base58）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// 登録済み電話番号
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// 登録済みメールアドレス
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Identity {
    /// 登録済みアドレス。未設定・空文字列はNone。
    pub fn address(&self) -> Option<&str> {
        non_empty(&self.address)
    }

    /// 登録済み電話番号。未設定・空文字列はNone。
    pub fn phone_number(&self) -> Option<&str> {
        non_empty(&self.phone_number)
    }

    /// 登録済みメールアドレス。未設定・空文字列はNone。
    pub fn email(&self) -> Option<&str> {
        non_empty(&self.email)
    }
}

/// アカウントストアが保持するアカウントレコード。
/// 外部の登録プロセスが作成・更新し、署名サーバーからは読み取り専用。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    /// アカウントアドレス（Base58エンコードされたEd25519公開鍵、一意キー）
    pub address: String,
    /// アカウント所有者の識別子の束
    #[serde(default)]
    pub owner_identities: Identity,
    /// 所有者以外（復旧代理人等）の識別子の束
    #[serde(default)]
    pub other_identities: Identity,
}

// ---------------------------------------------------------------------------
// トランザクションエンベロープ
// ---------------------------------------------------------------------------

/// 署名対象となるトランザクションの記述。
/// ワイヤー形式はbincodeバイト列のBase64（Standard）エンコード。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    /// トランザクション全体のソースアカウント（Base58）
    pub source_account: String,
    /// ソースアカウントのシーケンス番号
    pub sequence: u64,
    /// オペレーションの列（順序保持）
    pub operations: Vec<Operation>,
}

/// トランザクション内の個別オペレーション。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// オペレーション単位のソースアカウント上書き（Base58）。
    /// Noneの場合はトランザクションのソースアカウントを継承する。
    /// bincodeの正準バイト列に含めるため、未設定でもフィールドは省略しない。
    #[serde(default)]
    pub source_account: Option<String>,
    /// オペレーション本体
    pub body: OperationBody,
}

/// オペレーション本体のバリアント。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OperationBody {
    /// 送金オペレーション
    Payment {
        /// 送金先アドレス（Base58）
        destination: String,
        /// 送金額（最小単位）
        amount: u64,
    },
    /// 署名者の登録・差し替えオペレーション（アカウント復旧で使用）
    SetSigner {
        /// 署名者の公開鍵（Base58）
        signer: String,
        /// 署名者のウェイト（0で削除）
        weight: u8,
    },
}

/// トランザクションエンベロープのエンコード・デコードエラー。
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// Base64デコード失敗
    #[error("エンベロープのBase64デコードに失敗しました: {0}")]
    Base64(#[from] base64::DecodeError),
    /// bincodeデシリアライズ失敗
    #[error("エンベロープのデシリアライズに失敗しました: {0}")]
    Decode(String),
    /// bincodeシリアライズ失敗
    #[error("エンベロープのシリアライズに失敗しました: {0}")]
    Encode(String),
}

impl TransactionEnvelope {
    /// 正準バイト列（bincode）を返す。署名ダイジェストの計算にもこのバイト列を使う。
    pub fn to_bytes(&self) -> Result<Vec<u8>, EnvelopeError> {
        bincode::serialize(self).map_err(|e| EnvelopeError::Encode(e.to_string()))
    }

    /// 正準バイト列からデコードする。
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        bincode::deserialize(bytes).map_err(|e| EnvelopeError::Decode(e.to_string()))
    }

    /// ワイヤー形式（Base64文字列）へエンコードする。
    pub fn to_base64(&self) -> Result<String, EnvelopeError> {
        Ok(b64().encode(self.to_bytes()?))
    }

    /// ワイヤー形式（Base64文字列）からデコードする。
    pub fn from_base64(encoded: &str) -> Result<Self, EnvelopeError> {
        let bytes = b64().decode(encoded)?;
        Self::from_bytes(&bytes)
    }
}

// ---------------------------------------------------------------------------
// APIリクエスト/レスポンス
// ---------------------------------------------------------------------------

/// POST /accounts/{address}/sign リクエスト本文。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSignRequest {
    /// Base64エンコードされたトランザクションエンベロープ
    pub transaction: String,
}

/// POST /accounts/{address}/sign レスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSignResponse {
    /// カストディ署名鍵の公開鍵（Base58）
    pub public_key: String,
    /// Base64エンコードされた分離署名
    pub signature: String,
    /// 署名が有効なネットワークのパスフレーズ
    pub network_passphrase: String,
}

/// GET /.well-known/haven-signer-info レスポンス。
/// クライアントが分離署名を検証するために必要な情報を返却する。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignerInfo {
    /// カストディ署名鍵の公開鍵（Base58）
    pub signing_pubkey: String,
    /// このサーバーが署名を束縛するネットワークのパスフレーズ
    pub network_passphrase: String,
}

// ---------------------------------------------------------------------------
// 身元証明ラッパー
// ---------------------------------------------------------------------------

/// 身元証明の署名対象構造体。
/// IdentityProofWrapperからauth_signatureを除いた構造。
/// 身元証明サービス側で署名対象を構築し、署名サーバー側で検証時に同一構造を再構築する。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityProofSignTarget {
    /// HTTPメソッド
    pub method: String,
    /// リクエストパス
    pub path: String,
    /// 証明済みクレーム
    pub claims: IdentityClaims,
    /// クライアントのリクエスト本文
    pub body: serde_json::Value,
}

/// 身元証明ラッパー。身元証明サービスが署名サーバーに中継するリクエストの構造。
/// クレームの束をEd25519署名で保護する。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityProofWrapper {
    /// HTTPメソッド
    pub method: String,
    /// リクエストパス
    pub path: String,
    /// 証明済みクレーム
    pub claims: IdentityClaims,
    /// クライアントのリクエスト本文
    pub body: serde_json::Value,
    /// Base64エンコードされたEd25519署名
    pub auth_signature: String,
}
