pub mod hashmap_record_store;
pub mod hashmap_reset_ticket_store;
pub mod postgres_record_store;
pub mod redis_reset_ticket_store;

pub use hashmap_record_store::HashMapRecordStore;
pub use hashmap_reset_ticket_store::HashMapResetTicketStore;
pub use postgres_record_store::PostgresRecordStore;
pub use redis_reset_ticket_store::RedisResetTicketStore;
