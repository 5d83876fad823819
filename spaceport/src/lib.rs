//! spaceport: move saved objects between Kibana instances, space by space
//!
//! An export run lists the spaces on the source instance, applies the space
//! and type filters, and writes one NDJSON bundle per space plus a manifest
//! of the space records. An import run reads that manifest, recreates missing
//! spaces on the destination and replays each bundle under the chosen
//! conflict mode.

pub mod client;
pub mod config;
pub mod confirm;
pub mod directory;
pub mod error;
pub mod exporter;
pub mod importer;
pub mod manifest;
pub mod mode;
pub mod progress;
pub mod provisioner;
pub mod selector;
pub mod space;
pub mod store;

pub use client::{ClientOptions, Credentials, KibanaClient};
pub use config::Config;
pub use confirm::{AutoConfirm, Confirm};
pub use error::{MigrateError, Result};
pub use exporter::{run_export, ExportReport, ExportRequest};
pub use importer::{plan_import, run_import, ImportPlan, ImportReport};
pub use manifest::{Manifest, ManifestEntry};
pub use mode::{validate as validate_mode, ConflictMode, ModeFlags};
pub use progress::{NoopProgress, RunProgress, SpaceProgress};
pub use provisioner::{ensure_space, Provisioned};
pub use selector::{resolve, Selection, TypeFilter};
pub use space::Space;
pub use store::{BundleStore, LocalStore};
