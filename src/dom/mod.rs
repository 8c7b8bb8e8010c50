// DOM model: parsed document plus live element state
pub mod page;
pub mod selectors;

pub use page::{EventKind, MutationRecord, Page, SharedPage};
pub use ego_tree::NodeId;
