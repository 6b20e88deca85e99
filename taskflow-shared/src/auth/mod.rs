/// Authentication utilities
///
/// Password hashing for account registration. Request authentication and
/// token issuance live in the external API layer, not in this crate.

pub mod password;
