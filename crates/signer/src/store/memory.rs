//! # メモリ内アカウントストア
//!
//! 起動時にJSONファイルから読み込んだアカウントレコードをメモリ内に保持する
//! ストア実装。起動後は読み取り専用のため、ロックを持たない。

use std::collections::HashMap;

use haven_types::AccountRecord;

use super::{AccountStore, StoreError};

/// メモリ内アカウントストア。
pub struct MemoryStore {
    /// アドレスをキーとしたアカウントレコード
    accounts: HashMap<String, AccountRecord>,
}

impl MemoryStore {
    /// アカウントレコードの一覧から構築する。
    pub fn new(records: Vec<AccountRecord>) -> Self {
        let accounts = records
            .into_iter()
            .map(|record| (record.address.clone(), record))
            .collect();
        Self { accounts }
    }

    /// 環境変数 `ACCOUNTS_FILE` が指すJSONファイルから構築する。
    /// 未設定の場合は空のストアを返す。
    pub fn from_env() -> anyhow::Result<Self> {
        let path = match std::env::var("ACCOUNTS_FILE") {
            Ok(path) => path,
            Err(_) => return Ok(Self::new(Vec::new())),
        };
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("アカウントファイル {path} の読み込みに失敗: {e}"))?;
        let records: Vec<AccountRecord> = serde_json::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("アカウントファイル {path} の解析に失敗: {e}"))?;
        Ok(Self::new(records))
    }

    /// 保持しているレコード数を返す（起動ログに使用）。
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// レコードを保持していない場合にtrue。
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait::async_trait]
impl AccountStore for MemoryStore {
    /// アドレスでアカウントレコードを検索する。メモリ内ストアは失敗しない。
    async fn get(&self, address: &str) -> Result<Option<AccountRecord>, StoreError> {
        Ok(self.accounts.get(address).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haven_types::Identity;

    fn record(address: &str) -> AccountRecord {
        AccountRecord {
            address: address.to_string(),
            owner_identities: Identity::default(),
            other_identities: Identity::default(),
        }
    }

    /// 登録済みレコードの検索と、存在しないレコードのOk(None)を確認
    #[tokio::test]
    async fn test_get_present_and_absent() {
        let store = MemoryStore::new(vec![record("GADDR1"), record("GADDR2")]);
        assert_eq!(store.len(), 2);

        let found = store.get("GADDR1").await.unwrap();
        assert_eq!(found.unwrap().address, "GADDR1");

        let missing = store.get("GADDR3").await.unwrap();
        assert!(missing.is_none());
    }
}
