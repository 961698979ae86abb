//! # Haven 暗号処理
//!
//! リカバリー署名サーバーが使用する暗号プリミティブを実装する。
//!
//! ## 暗号アルゴリズム
//! | 用途 | アルゴリズム |
//! |------|------------|
//! | 署名 | Ed25519 |
//! | ハッシュ | SHA-256 |
//!
//! トランザクションダイジェストはネットワークパスフレーズを束縛して計算する。
//! これにより、あるネットワーク向けに生成した署名を別のネットワークで
//! リプレイすることはできない。

use base58::FromBase58;
use ed25519_dalek::{Signer, Verifier};
use sha2::{Digest, Sha256};

pub use ed25519_dalek::{
    Signature as Ed25519Signature, SigningKey as Ed25519SigningKey,
    VerifyingKey as Ed25519VerifyingKey,
};

/// トランザクションダイジェストのドメイン分離タグ。
/// 同じ鍵を他用途の署名に流用した場合の衝突を防ぐ。
pub const TRANSACTION_HASH_TAG: &[u8] = b"haven-tx-v1";

/// 暗号処理のエラー型
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// Ed25519署名検証エラー
    #[error("Ed25519署名検証に失敗しました")]
    SignatureVerifyError,
    /// 署名鍵シードの形式エラー
    #[error("署名鍵シードの解析に失敗しました（32バイトのhex文字列が必要です）")]
    InvalidSeed,
    /// 公開鍵の形式エラー
    #[error("公開鍵の解析に失敗しました（Base58エンコードされた32バイトが必要です）")]
    InvalidPublicKey,
    /// 署名の形式エラー
    #[error("署名の解析に失敗しました（64バイトが必要です）")]
    InvalidSignature,
}

/// Ed25519による署名。
pub fn ed25519_sign(signing_key: &Ed25519SigningKey, message: &[u8]) -> Ed25519Signature {
    signing_key.sign(message)
}

/// Ed25519による署名検証。
pub fn ed25519_verify(
    verifying_key: &Ed25519VerifyingKey,
    message: &[u8],
    signature: &Ed25519Signature,
) -> Result<(), CryptoError> {
    verifying_key
        .verify(message, signature)
        .map_err(|_| CryptoError::SignatureVerifyError)
}

/// SHA-256ハッシュ計算。
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// ネットワーク識別子の計算。
/// `network_id = SHA-256(ネットワークパスフレーズ)`
pub fn network_id(network_passphrase: &str) -> [u8; 32] {
    sha256(network_passphrase.as_bytes())
}

/// ネットワークパスフレーズを束縛したトランザクションダイジェストの計算。
/// `SHA-256(network_id || タグ || エンベロープの正準バイト列)`
///
/// カストディ鍵はこのダイジェストに対して署名する。パスフレーズが異なれば
/// ダイジェストも異なるため、署名は対象ネットワークでのみ有効となる。
pub fn transaction_hash(network_passphrase: &str, tx_bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(network_id(network_passphrase));
    hasher.update(TRANSACTION_HASH_TAG);
    hasher.update(tx_bytes);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// 32バイトのhexシードからEd25519署名鍵を構築する。
pub fn signing_key_from_hex(hex_seed: &str) -> Result<Ed25519SigningKey, CryptoError> {
    let bytes = hex::decode(hex_seed.trim()).map_err(|_| CryptoError::InvalidSeed)?;
    let seed: [u8; 32] = bytes.try_into().map_err(|_| CryptoError::InvalidSeed)?;
    Ok(Ed25519SigningKey::from_bytes(&seed))
}

/// Base58文字列からEd25519公開鍵を構築する。
/// アカウントアドレスの形式検証にも使用する。
pub fn verifying_key_from_base58(encoded: &str) -> Result<Ed25519VerifyingKey, CryptoError> {
    let bytes = encoded
        .from_base58()
        .map_err(|_| CryptoError::InvalidPublicKey)?;
    let arr: [u8; 32] = bytes.try_into().map_err(|_| CryptoError::InvalidPublicKey)?;
    Ed25519VerifyingKey::from_bytes(&arr).map_err(|_| CryptoError::InvalidPublicKey)
}

/// 64バイトのバイト列からEd25519署名を構築する。
pub fn signature_from_bytes(bytes: &[u8]) -> Result<Ed25519Signature, CryptoError> {
    let arr: [u8; 64] = bytes.try_into().map_err(|_| CryptoError::InvalidSignature)?;
    Ok(Ed25519Signature::from_bytes(&arr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base58::ToBase58;

    /// トランザクションダイジェストへの署名→検証のラウンドトリップ
    #[test]
    fn test_transaction_hash_sign_verify_roundtrip() {
        let signing_key = Ed25519SigningKey::generate(&mut rand::rngs::OsRng);
        let verifying_key = signing_key.verifying_key();

        let hash = transaction_hash("Haven Test Network ; Aug 2026", b"tx-bytes");
        let signature = ed25519_sign(&signing_key, &hash);

        assert!(ed25519_verify(&verifying_key, &hash, &signature).is_ok());
    }

    /// ネットワークパスフレーズが異なればダイジェストも異なることを確認
    #[test]
    fn test_transaction_hash_binds_network() {
        let tx_bytes = b"tx-bytes";
        let h1 = transaction_hash("Haven Test Network ; Aug 2026", tx_bytes);
        let h2 = transaction_hash("Haven Public Network ; Aug 2026", tx_bytes);
        assert_ne!(h1, h2);
    }

    /// あるネットワーク向けの署名が別ネットワークのダイジェストで失敗することを確認
    #[test]
    fn test_signature_not_valid_across_networks() {
        let signing_key = Ed25519SigningKey::generate(&mut rand::rngs::OsRng);
        let verifying_key = signing_key.verifying_key();

        let tx_bytes = b"tx-bytes";
        let signature =
            ed25519_sign(&signing_key, &transaction_hash("network-a", tx_bytes));
        let other_hash = transaction_hash("network-b", tx_bytes);

        assert!(ed25519_verify(&verifying_key, &other_hash, &signature).is_err());
    }

    /// hexシードからの署名鍵構築と公開鍵の一致確認
    #[test]
    fn test_signing_key_from_hex() {
        let seed = [7u8; 32];
        let key = signing_key_from_hex(&hex::encode(seed)).unwrap();
        assert_eq!(key.to_bytes(), seed);

        // 不正なhex・長さ不一致は拒否される
        assert!(signing_key_from_hex("not-hex").is_err());
        assert!(signing_key_from_hex(&hex::encode([7u8; 16])).is_err());
    }

    /// Base58公開鍵の解析と不正入力の拒否を確認
    #[test]
    fn test_verifying_key_from_base58() {
        let signing_key = Ed25519SigningKey::generate(&mut rand::rngs::OsRng);
        let encoded = signing_key.verifying_key().to_bytes().to_base58();

        let parsed = verifying_key_from_base58(&encoded).unwrap();
        assert_eq!(parsed, signing_key.verifying_key());

        // Base58として不正な文字（0やl）を含む入力は拒否される
        assert!(verifying_key_from_base58("0Ol").is_err());
        // 長さが32バイトでない入力は拒否される
        assert!(verifying_key_from_base58(&[1u8; 16].to_base58()).is_err());
    }
}
