//! Application Layer
//!
//! 仓储端口定义, 具体实现在 infrastructure 层

pub mod ports;

pub use ports::{NewUser, RepositoryError, UserChanges, UserRecord, UserRepositoryPort};
