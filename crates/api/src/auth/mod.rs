//! Authentication building blocks: JWT tokens, password hashing, and
//! password-reset delivery.

pub mod jwt;
pub mod password;
pub mod reset;
