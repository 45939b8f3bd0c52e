/// Key layout for the `subscriptions` partition
///
/// - `sub:{user_id}\x1f{package_id}\x1f{event_kind:03}` -> SubscriptionRecord (JSON)
///
/// User ids are opaque, so segments are joined with the ASCII unit separator
/// instead of `:`. A user id containing that byte is rejected upstream.
pub const SEPARATOR: char = '\u{1f}';

const PREFIX: &str = "sub:";

/// Encode a subscription key
pub fn encode_subscription_key(user_id: &str, package_id: &str, event_kind: u8) -> Vec<u8> {
    format!("{PREFIX}{user_id}{SEPARATOR}{package_id}{SEPARATOR}{event_kind:03}").into_bytes()
}

/// Prefix covering every subscription of a user
pub fn encode_user_prefix(user_id: &str) -> Vec<u8> {
    format!("{PREFIX}{user_id}{SEPARATOR}").into_bytes()
}

/// Prefix covering a user's subscriptions on one package
pub fn encode_user_package_prefix(user_id: &str, package_id: &str) -> Vec<u8> {
    format!("{PREFIX}{user_id}{SEPARATOR}{package_id}{SEPARATOR}").into_bytes()
}
