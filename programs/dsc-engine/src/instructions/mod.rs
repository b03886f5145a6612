pub mod user;
pub mod permissionless;
