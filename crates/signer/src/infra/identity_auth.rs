//! # 身元証明の検証ユーティリティ
//!
//! 署名サーバー側で身元証明サービスの署名を検証し、証明済みクレームと
//! リクエスト本文を抽出する。この検証により、信頼された身元証明サービスを
//! 経由したクレームのみを受け付ける。

use base64::Engine;

use haven_crypto::Ed25519VerifyingKey;
use haven_types::{IdentityClaims, IdentityProofSignTarget, IdentityProofWrapper};

use crate::error::SignerError;

/// Base64エンジン（Standard）
fn b64() -> base64::engine::GeneralPurpose {
    base64::engine::general_purpose::STANDARD
}

/// 身元証明を検証し、証明済みクレームと内部のリクエストボディを返す。
///
/// - `auth_pubkey` が `Some` の場合: 身元証明が必須。署名なしまたは不正署名は拒否。
/// - `auth_pubkey` が `None` の場合: 署名検証をスキップ（開発環境用）。
///
/// 受信bodyが IdentityProofWrapper 形式（`auth_signature` フィールドあり）なら
/// 署名を検証し、`claims` と `body` フィールドを返す。
/// 直接リクエスト形式の場合は `auth_pubkey` が `None` のときのみ許可し、
/// body直下の `claims` フィールド（省略時は空クレーム）を使う。
pub fn verify_identity_proof(
    auth_pubkey: Option<&Ed25519VerifyingKey>,
    body: &serde_json::Value,
) -> Result<(IdentityClaims, serde_json::Value), SignerError> {
    if body.get("auth_signature").is_some() {
        // IdentityProofWrapper形式
        // TODO: wrapper.method / wrapper.path を実際のリクエストと比較し、
        // 署名済みラッパーの別パスへの流用を拒否する
        let wrapper: IdentityProofWrapper =
            serde_json::from_value(body.clone()).map_err(|e| {
                SignerError::BadRequest(format!("IdentityProofWrapperのパースに失敗: {e}"))
            })?;

        if let Some(pubkey) = auth_pubkey {
            // 署名対象を再構築（auth_signatureを除いた部分）
            let sign_target = IdentityProofSignTarget {
                method: wrapper.method.clone(),
                path: wrapper.path.clone(),
                claims: wrapper.claims.clone(),
                body: wrapper.body.clone(),
            };
            let sign_bytes = serde_json::to_vec(&sign_target).map_err(|e| {
                SignerError::Internal(format!("署名対象のシリアライズに失敗: {e}"))
            })?;

            // 署名をデコード
            let sig_bytes = b64().decode(&wrapper.auth_signature).map_err(|e| {
                SignerError::BadRequest(format!("auth_signatureのBase64デコードに失敗: {e}"))
            })?;
            let signature = haven_crypto::signature_from_bytes(&sig_bytes).map_err(|_| {
                SignerError::BadRequest("auth_signatureは64バイトである必要があります".to_string())
            })?;

            // Ed25519署名を検証
            haven_crypto::ed25519_verify(pubkey, &sign_bytes, &signature).map_err(|_| {
                SignerError::Unauthorized("身元証明の署名検証に失敗しました".to_string())
            })?;
        }
        // auth_pubkeyがNoneの場合は署名検証をスキップ（開発環境用）

        Ok((wrapper.claims, wrapper.body))
    } else {
        // 直接リクエスト形式
        if auth_pubkey.is_some() {
            return Err(SignerError::Unauthorized(
                "身元証明が必要です。auth_signatureを含むIdentityProofWrapper形式で送信してください"
                    .to_string(),
            ));
        }
        let claims = match body.get("claims") {
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                SignerError::BadRequest(format!("claimsのパースに失敗: {e}"))
            })?,
            None => IdentityClaims::default(),
        };
        Ok((claims, body.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::Signer;
    use haven_crypto::Ed25519SigningKey;

    fn test_claims() -> IdentityClaims {
        IdentityClaims {
            address: Some("GCALLER".to_string()),
            phone_number: None,
            email: Some("caller@example.com".to_string()),
        }
    }

    fn signed_wrapper(
        signing_key: &Ed25519SigningKey,
        claims: &IdentityClaims,
        body: &serde_json::Value,
    ) -> serde_json::Value {
        let sign_target = IdentityProofSignTarget {
            method: "POST".to_string(),
            path: "/accounts/GCALLER/sign".to_string(),
            claims: claims.clone(),
            body: body.clone(),
        };
        let sign_bytes = serde_json::to_vec(&sign_target).unwrap();
        let signature = signing_key.sign(&sign_bytes);
        let sig_b64 = b64().encode(signature.to_bytes());

        serde_json::json!({
            "method": "POST",
            "path": "/accounts/GCALLER/sign",
            "claims": claims,
            "body": body,
            "auth_signature": sig_b64,
        })
    }

    /// 正しい身元証明署名が検証を通過することを確認
    #[test]
    fn test_verify_valid_signature() {
        let signing_key = Ed25519SigningKey::generate(&mut rand::rngs::OsRng);
        let verifying_key = signing_key.verifying_key();

        let body = serde_json::json!({"transaction": "AAAA"});
        let wrapper = signed_wrapper(&signing_key, &test_claims(), &body);

        let (claims, inner_body) = verify_identity_proof(Some(&verifying_key), &wrapper).unwrap();
        assert_eq!(claims.address(), Some("GCALLER"));
        assert_eq!(inner_body, body);
    }

    /// 別の鍵で署名された身元証明が拒否されることを確認
    #[test]
    fn test_verify_invalid_signature() {
        let signing_key = Ed25519SigningKey::generate(&mut rand::rngs::OsRng);
        let other_key = Ed25519SigningKey::generate(&mut rand::rngs::OsRng);
        let other_verifying = other_key.verifying_key();

        let body = serde_json::json!({"transaction": "AAAA"});
        let wrapper = signed_wrapper(&signing_key, &test_claims(), &body);

        let result = verify_identity_proof(Some(&other_verifying), &wrapper);
        assert!(matches!(result, Err(SignerError::Unauthorized(_))));
    }

    /// 身元証明が必須の場合に署名なしリクエストが拒否されることを確認
    #[test]
    fn test_verify_missing_proof_when_required() {
        let signing_key = Ed25519SigningKey::generate(&mut rand::rngs::OsRng);
        let verifying_key = signing_key.verifying_key();

        let body = serde_json::json!({"claims": test_claims(), "transaction": "AAAA"});

        let result = verify_identity_proof(Some(&verifying_key), &body);
        assert!(matches!(result, Err(SignerError::Unauthorized(_))));
    }

    /// auth_signatureを持つがラッパーとして解釈できない本文が400で拒否されることを確認
    #[test]
    fn test_verify_unparsable_wrapper_is_bad_request() {
        let signing_key = Ed25519SigningKey::generate(&mut rand::rngs::OsRng);
        let verifying_key = signing_key.verifying_key();

        // methodフィールドが欠落している
        let body = serde_json::json!({
            "path": "/accounts/GCALLER/sign",
            "claims": test_claims(),
            "body": {"transaction": "AAAA"},
            "auth_signature": "AAAA",
        });
        let result = verify_identity_proof(Some(&verifying_key), &body);
        assert!(matches!(result, Err(SignerError::BadRequest(_))));

        // claimsフィールドの型が不正
        let body = serde_json::json!({
            "method": "POST",
            "path": "/accounts/GCALLER/sign",
            "claims": "not-an-object",
            "body": {"transaction": "AAAA"},
            "auth_signature": "AAAA",
        });
        let result = verify_identity_proof(Some(&verifying_key), &body);
        assert!(matches!(result, Err(SignerError::BadRequest(_))));
    }

    /// 形式不正なauth_signature（Base64不正・長さ不一致）が400で拒否されることを確認
    #[test]
    fn test_verify_malformed_signature_is_bad_request() {
        let signing_key = Ed25519SigningKey::generate(&mut rand::rngs::OsRng);
        let verifying_key = signing_key.verifying_key();

        let inner = serde_json::json!({"transaction": "AAAA"});
        let mut wrapper = signed_wrapper(&signing_key, &test_claims(), &inner);

        // Base64として不正
        wrapper["auth_signature"] = serde_json::json!("これはBase64ではない");
        let result = verify_identity_proof(Some(&verifying_key), &wrapper);
        assert!(matches!(result, Err(SignerError::BadRequest(_))));

        // Base64としては正しいが64バイトではない
        wrapper["auth_signature"] = serde_json::json!(b64().encode([1u8; 16]));
        let result = verify_identity_proof(Some(&verifying_key), &wrapper);
        assert!(matches!(result, Err(SignerError::BadRequest(_))));
    }

    /// 身元証明が不要な場合に直接リクエストが許可されることを確認
    #[test]
    fn test_verify_direct_request_without_auth() {
        let body = serde_json::json!({"claims": test_claims(), "transaction": "AAAA"});

        let (claims, inner_body) = verify_identity_proof(None, &body).unwrap();
        assert_eq!(claims.email(), Some("caller@example.com"));
        assert_eq!(inner_body, body);
    }

    /// claimsフィールドを持たない直接リクエストは空クレームとして扱われる
    #[test]
    fn test_direct_request_without_claims_is_empty() {
        let body = serde_json::json!({"transaction": "AAAA"});

        let (claims, _) = verify_identity_proof(None, &body).unwrap();
        assert!(claims.is_empty());
    }
}
