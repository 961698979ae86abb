//! # カストディ鍵の抽象化
//!
//! 署名プリミティブを抽象化するトレイト。鍵のライフサイクル管理（生成・
//! ローテーション・保管）はこの層の責務ではなく、バックエンド実装側に閉じる。
//!
//! 現在のバックエンド実装:
//! - `local` — メモリ内に保持したEd25519鍵で署名する（環境変数からシードを読む）

pub mod local;

pub use local::LocalKey;

/// カストディ操作のエラー型。
#[derive(Debug, thiserror::Error)]
pub enum CustodyError {
    /// 署名プリミティブの失敗
    #[error("署名処理に失敗しました: {0}")]
    SignFailed(String),
}

/// カストディ署名鍵のトレイト。
///
/// 実装はステートレスかつ再入可能であることを前提とする。背後の鍵保管
/// 機構がアクセスを直列化する場合でも、呼び出し側からは見えない。
pub trait SigningBackend: Send + Sync {
    /// バックエンド種別を返す（起動ログに使用）。
    fn backend_type(&self) -> &str;

    /// 署名鍵に対応するEd25519公開鍵を返す。
    fn public_key(&self) -> [u8; 32];

    /// 保持する秘密鍵でメッセージ（トランザクションダイジェスト）に署名する。
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CustodyError>;
}
