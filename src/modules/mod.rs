//! Per-platform resource modules.
//!
//! Each submodule pairs a facts parser with the four policy command
//! generators for one resource on one platform. All of them implement
//! [`crate::engine::ResourceModule`]; the engine never knows which platform
//! it is driving.

pub mod ios;
pub mod vyos;
