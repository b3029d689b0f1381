/*
 * Responsibility
 * - middleware の公開インターフェース
 * - cors / http (request id, trace, limit, timeout) / oauth (synthetic header の付与)
 */
pub mod cors;
pub mod http;
pub mod oauth;
