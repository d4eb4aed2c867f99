//! Class rebalancing for binary training sets.

pub mod smote;

pub use smote::Smote;
