mod in_memory;
mod postgres;

pub use in_memory::InMemoryClientRepository;
pub use postgres::PostgresClientRepository;
