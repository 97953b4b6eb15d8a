pub mod surrealdb_context;
