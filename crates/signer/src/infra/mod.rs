//! # インフラ層ユーティリティ

pub mod identity_auth;
