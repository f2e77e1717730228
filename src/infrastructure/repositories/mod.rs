pub mod file_token_repository;
pub mod memory_token_repository;
pub mod pg_token_repository;
pub mod token_repository;

pub use file_token_repository::FileTokenRepository;
pub use memory_token_repository::InMemoryTokenRepository;
pub use pg_token_repository::PgTokenRepository;
pub use token_repository::TokenRepository;
