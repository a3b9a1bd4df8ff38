//! Push token format checks.

/// Whether `token` looks like an address the relay accepts:
/// `ExponentPushToken[...]`, `ExpoPushToken[...]`, or a hyphenated UUID.
pub fn is_valid_push_token(token: &str) -> bool {
    let bracketed = ["ExponentPushToken[", "ExpoPushToken["]
        .iter()
        .filter_map(|prefix| token.strip_prefix(prefix))
        .any(|rest| rest.len() > 1 && rest.ends_with(']'));

    bracketed || (token.len() == 36 && uuid::Uuid::try_parse(token).is_ok())
}
