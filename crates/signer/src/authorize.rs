//! # 認可コア
//!
//! 認証済みクレームとアカウントレコードの照合、およびトランザクションの
//! スコープ検証。いずれも入力のみに依存する純粋関数であり、副作用を持たない。

use haven_types::{AccountRecord, IdentityClaims, TransactionEnvelope};

/// クレームの束がアカウントへのアクセスを認可するかを判定する。
///
/// 判定規則（いずれか1つの一致で認可）:
/// - 証明済みアドレスが、アカウントアドレス・owner・otherのアドレスのいずれかと一致
/// - 証明済み電話番号が、owner・otherの電話番号のいずれかと一致
/// - 証明済みメールアドレスが、owner・otherのメールアドレスのいずれかと一致
///
/// 未証明（空）のクレームフィールドは照合に参加しない。登録側の識別子が
/// 未設定のスロットと「空同士で一致」することはない。
pub fn claims_match_account(claims: &IdentityClaims, account: &AccountRecord) -> bool {
    let address_matched = match claims.address() {
        Some(address) => {
            address == account.address
                || account.owner_identities.address() == Some(address)
                || account.other_identities.address() == Some(address)
        }
        None => false,
    };

    let phone_number_matched = match claims.phone_number() {
        Some(phone_number) => {
            account.owner_identities.phone_number() == Some(phone_number)
                || account.other_identities.phone_number() == Some(phone_number)
        }
        None => false,
    };

    let email_matched = match claims.email() {
        Some(email) => {
            account.owner_identities.email() == Some(email)
                || account.other_identities.email() == Some(email)
        }
        None => false,
    };

    address_matched || phone_number_matched || email_matched
}

/// スコープ違反。対象アカウント以外を参照するトランザクションを表す。
#[derive(Debug, thiserror::Error)]
pub enum ScopeViolation {
    /// トランザクションのソースアカウントが対象アカウントと一致しない
    #[error("トランザクションのソースアカウントが対象アカウントと一致しません")]
    SourceAccountMismatch,
    /// オペレーションのソースアカウント上書きが対象アカウントと一致しない
    #[error("オペレーション{index}のソースアカウントが対象アカウントと一致しません")]
    OperationSourceMismatch {
        /// 違反したオペレーションの位置
        index: usize,
    },
}

/// トランザクションが対象アカウントのみを参照することを検証する。
///
/// アカウントAの認可を得た呼び出し元が、アカウントBに作用するトランザクション
/// への副署をこのサーバーから引き出すことを防ぐ。
///
/// - トランザクションのソースアカウントは対象アカウントと一致しなければならない
/// - ソースアカウントを上書きするオペレーションは、その上書きが対象アカウントと
///   一致しなければならない（上書きのないオペレーションはトランザクションの
///   ソースアカウントを継承するため、追加の検査なしで受理される）
/// - オペレーションが0件のトランザクションはこの層では構造的に有効として受理する
pub fn validate_source_scope(
    tx: &TransactionEnvelope,
    target: &str,
) -> Result<(), ScopeViolation> {
    if tx.source_account != target {
        return Err(ScopeViolation::SourceAccountMismatch);
    }
    for (index, op) in tx.operations.iter().enumerate() {
        let op_source = match &op.source_account {
            Some(source) => source,
            None => continue,
        };
        if op_source != target {
            return Err(ScopeViolation::OperationSourceMismatch { index });
        }
    }
    Ok(())
}
