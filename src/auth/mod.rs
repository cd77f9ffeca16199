mod claims;
pub mod extractors;
pub mod jwt;
pub mod password;

#[cfg(test)]
pub use claims::Claims;
pub use extractors::AuthUser;
pub use jwt::JwtKeys;
pub use password::PasswordHasher;
