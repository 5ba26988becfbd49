//! Command implementations for forge-cli

pub mod edit;
pub mod render;
pub mod scan;
pub mod status;
pub mod sync;

pub use edit::{
    run_package_add, run_package_remove, run_service_set, run_service_toggle, run_service_unset,
    run_source_add, run_source_remove,
};
pub use render::run_render;
pub use scan::run_scan_options;
pub use status::run_status;
pub use sync::{run_check, run_import, run_sync};
