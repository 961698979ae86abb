//! # 署名サーバー エンドポイント

pub mod account_sign;
pub mod signer_info;

pub use account_sign::handle_account_sign;
pub use signer_info::handle_signer_info;
