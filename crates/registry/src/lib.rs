//! Concurrent registry of configurable properties.
//!
//! Subsystems declare the settings they expose as [`ConfigurableClass`]es.
//! At bring-up each declared field is handed to a [`PropertyDirectory`],
//! which runs a [`BuilderChain`] to turn it into a [`PropertyDescriptor`] and
//! files the result as either active or pending. Management code then reads
//! snapshots by entry set and alias and projects them to
//! [`ComponentProperty`] records.
//!
//! # Modules
//!
//! - [`property`] - Descriptors, widget types, change listeners
//! - [`builder`] - Builder chain and the standard builders
//! - [`directory`] - The indexed, lock-protected directory
//! - [`store`] - Value stores for persisted properties
//! - [`decl`] - Class and field declarations
//! - [`manifest`] - TOML manifests
//! - [`scan`] - Bring-up registration of declared sources
//! - [`summary`] - Management projection

pub mod builder;
pub mod config;
pub mod decl;
pub mod directory;
pub mod error;
pub mod manifest;
pub mod property;
pub mod scan;
pub mod store;
pub mod summary;

pub use builder::{BuildOutcome, BuilderChain, PropertyBuilder};
pub use config::{BuilderFailurePolicy, DirectoryConfig};
pub use decl::{ConfigurableClass, ConfigurableField, PropertySource, PropertyStorage};
pub use directory::{Family, InvariantViolation, PropertyDirectory};
pub use error::{BuildError, ConfigError, PropertyError, RegistryError, Result, StoreError};
pub use manifest::PropertyManifest;
pub use property::{NoopListener, PropertyChangeListener, PropertyDescriptor, WidgetType};
pub use scan::{ScanReport, register_source, register_sources};
pub use store::{MemoryStore, PropertyStore, StoreKey, WriteThrough};
pub use summary::ComponentProperty;
