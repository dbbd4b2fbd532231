pub mod alerts;
pub mod connection;
pub mod snapshots;
pub mod targets;
