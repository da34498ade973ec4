pub mod lookup;
pub mod types;

pub use lookup::{AppStoreClient, StoreLookup, check_for_update};
pub use types::AppStoreLookup;
