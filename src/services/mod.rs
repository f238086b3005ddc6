// Service exports
pub mod cache;
pub mod postgres;
pub mod supabase;

pub use cache::{MatchCache, CacheError};
pub use postgres::{PostgresClient, PostgresError};
pub use supabase::{PopulationSnapshot, SupabaseClient, SupabaseTables, SupabaseError};
