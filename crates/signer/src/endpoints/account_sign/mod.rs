//! # POST /accounts/{address}/sign エンドポイント
//!
//! アカウントへの副署リクエストの内部処理。
//!
//! ## 処理フロー
//! 1. 身元証明を検証し、証明済みクレームを取り出す
//! 2. クレームが全て空なら401（認証そのものが行われていない）
//! 3. 対象アドレスとリクエスト本文をデコード（失敗は400）
//! 4. アカウントレコードを検索（不在は404、ストア障害は500）
//! 5. クレームをアカウントと照合（不一致も404 — アカウント存在の秘匿）
//! 6. トランザクションが対象アカウントのみを参照することを検証（違反は400）
//! 7. ネットワークパスフレーズを束縛したダイジェストにカストディ鍵で署名
//!
//! 各ステップの失敗は終端であり、リトライはこの層では行わない。

mod handler;


pub use handler::handle_account_sign;
