//! Service layer for the key-value store.
//! - Separates JSON handling and error classification from row access.
//! - Reuses the `store` entity and row helpers in the `models` crate.

pub mod errors;
pub mod kv;
#[cfg(test)]
pub mod test_support;
