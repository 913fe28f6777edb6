pub mod create_batch;
pub mod delete_batch;
pub mod delete_by_sale_id;
pub mod exist_by_ids;
pub mod find_by_filter;
pub mod find_by_sale_id;
pub mod load;
pub mod load_batch;
pub mod lock_for_update;
pub mod pagination;
pub mod update_batch;

// Re-exports
pub use create_batch::*;
pub use delete_batch::*;
pub use delete_by_sale_id::*;
pub use exist_by_ids::*;
pub use find_by_filter::*;
pub use find_by_sale_id::*;
pub use load::*;
pub use load_batch::*;
pub use lock_for_update::*;
pub use pagination::*;
pub use update_batch::*;
