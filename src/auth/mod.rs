pub mod token;
pub mod token_store;

pub use token::TokenSet;
pub use token_store::{FileTokenStore, TokenStore};
