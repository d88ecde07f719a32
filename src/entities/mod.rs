//! 实体声明
//!
//! 每个实体种类的元数据只构建一次

pub mod card;
pub mod entity;
pub mod set;
pub mod topic;
pub mod unit;
pub mod user;

pub use card::{Card, CARD_KINDS};
pub use entity::{versioned_meta, Versioned};
pub use set::Set;
pub use topic::Topic;
pub use unit::Unit;
pub use user::{hash_password, verify_password, User, PASSWORD_SENTINEL};
