//! # ローカル署名バックエンド
//!
//! メモリ内に保持したEd25519署名鍵で署名するバックエンド実装。
//! シードは環境変数経由で設定から渡される（32バイトのhex文字列）。

use haven_crypto::{ed25519_sign, CryptoError, Ed25519SigningKey};

use super::{CustodyError, SigningBackend};

/// メモリ内Ed25519鍵によるカストディバックエンド。
pub struct LocalKey {
    /// Ed25519署名鍵
    signing_key: Ed25519SigningKey,
}

impl LocalKey {
    /// 署名鍵から構築する。
    pub fn new(signing_key: Ed25519SigningKey) -> Self {
        Self { signing_key }
    }

    /// 32バイトのhexシードから構築する。
    pub fn from_hex_seed(hex_seed: &str) -> Result<Self, CryptoError> {
        Ok(Self::new(haven_crypto::signing_key_from_hex(hex_seed)?))
    }
}

impl SigningBackend for LocalKey {
    /// ローカルバックエンドの種別を返す。
    fn backend_type(&self) -> &str {
        "local"
    }

    /// 署名鍵に対応するEd25519公開鍵をバイト列で返す。
    fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// 保持しているEd25519秘密鍵でメッセージに署名する。
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CustodyError> {
        let signature = ed25519_sign(&self.signing_key, message);
        Ok(signature.to_bytes().to_vec())
    }
}
