//! Data models for AssetDesk

pub mod agreement;
pub mod asset;
pub mod borrow_request;
pub mod cartridge;
pub mod enums;
pub mod equipment;
pub mod lookup;
pub mod maintenance;
pub mod pagination;
pub mod settings;
pub mod transaction;
pub mod user;

// Re-export commonly used types
pub use asset::Asset;
pub use borrow_request::{BorrowRequest, BorrowTarget};
pub use enums::{EquipmentKind, ResourceKind, ResourceStatus};
pub use pagination::{Page, PageParams, PageRequest, Pagination};
pub use transaction::TransactionRecord;
pub use user::{Role, UserClaims};
