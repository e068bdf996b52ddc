pub mod hashmap_credential_store;
pub mod hashmap_session_store;
pub mod hashmap_todo_store;
pub mod postgres_credential_store;
pub mod postgres_session_store;
pub mod postgres_todo_store;
