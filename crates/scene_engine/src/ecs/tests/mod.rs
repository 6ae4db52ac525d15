//! Cross-module tests for the ECS
//!
//! Unit tests live next to the code they cover; these exercise the registry,
//! storages and views together over longer operation sequences.

mod registry_properties;
