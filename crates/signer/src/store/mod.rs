//! # アカウントストア
//!
//! アカウントレコードの読み取りを抽象化するインターフェース。
//! レコードの作成・更新は外部の登録プロセスが行い、署名サーバーは
//! リクエストごとに一度だけ読み取る。
//!
//! 「アカウントが存在しない」（`Ok(None)`）は想定内の結果であり、
//! ストア自体の障害（`Err`）とは区別される。

pub mod memory;

pub use memory::MemoryStore;

use haven_types::AccountRecord;

/// アカウントストアのエラー型。ストアが利用できない場合にのみ返される。
#[derive(Debug, thiserror::Error)]
#[error("アカウントストアへのアクセスに失敗しました: {0}")]
pub struct StoreError(pub String);

/// アカウントストアの抽象インターフェース。
///
/// 運用者はメモリ内ストアのほか、任意の永続化バックエンドを実装として
/// 選択できる。並行性の規律はストア実装側に委ねる（この層は読み取りのみ）。
#[async_trait::async_trait]
pub trait AccountStore: Send + Sync {
    /// アドレスでアカウントレコードを検索する。
    ///
    /// - `Ok(Some(record))`: レコードが存在する
    /// - `Ok(None)`: レコードが存在しない（想定内）
    /// - `Err(_)`: ストア障害
    async fn get(&self, address: &str) -> Result<Option<AccountRecord>, StoreError>;
}
