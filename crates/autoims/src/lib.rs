//! Facade crate for AutoIMS.
//!
//! Re-exports the shared crates and composes the feature slices: their
//! migrations in dependency order, their initializers and their routes.
//! Business logic lives in the slices, not here.

use autoims_database::Migration;
pub use autoims_domain as domain;
pub use autoims_kernel as kernel;
#[cfg(feature = "ui")]
pub use autoims_ui as ui;

/// Feature registry for runtime introspection.
pub mod features {
    pub use autoims_customers as customers;
    pub use autoims_dashboard as dashboard;
    pub use autoims_identity as identity;
    pub use autoims_inventory as inventory;
    pub use autoims_requests as requests;
    pub use autoims_vehicles as vehicles;
    pub use autoims_workforce as workforce;
    pub use autoims_workshop as workshop;

    /// Slices compiled into this build.
    pub const ENABLED: &[&str] = &[
        "identity",
        "customers",
        "vehicles",
        "workforce",
        "inventory",
        "service_requests",
        "workshop",
        "dashboard",
        #[cfg(feature = "ui")]
        "ui",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Every slice migration, parents before the tables that reference them.
#[must_use]
pub fn migrations() -> Vec<Migration> {
    [
        features::identity::MIGRATIONS,
        features::customers::MIGRATIONS,
        features::vehicles::MIGRATIONS,
        features::workforce::MIGRATIONS,
        features::inventory::MIGRATIONS,
        features::requests::MIGRATIONS,
        features::workshop::MIGRATIONS,
    ]
    .concat()
}

#[cfg(feature = "server")]
pub mod server {
    use super::features;
    use autoims_kernel::prelude::ApiState;
    use utoipa_axum::router::OpenApiRouter;

    pub mod router {
        pub use autoims_kernel::server::router::system_router;
    }

    /// Every slice route, relative to `/api`.
    pub fn api_router() -> OpenApiRouter<ApiState> {
        OpenApiRouter::new()
            .merge(features::identity::router())
            .merge(features::customers::router())
            .merge(features::vehicles::router())
            .merge(features::requests::router())
            .merge(features::inventory::router())
            .merge(features::workshop::router())
            .merge(features::workforce::router())
            .merge(features::dashboard::router())
    }
}

/// Initialize all feature slices for server mode.
///
/// # Errors
/// Returns an error if any feature initialization fails.
#[cfg(feature = "server")]
pub fn init() -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error>> {
    Ok(vec![
        features::identity::init()?,
        features::customers::init()?,
        features::vehicles::init()?,
        features::workforce::init()?,
        features::inventory::init()?,
        features::requests::init()?,
        features::workshop::init()?,
        features::dashboard::init()?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parents_migrate_first() {
        let slices: Vec<_> = migrations().iter().map(|m| m.slice).collect();
        let position = |name: &str| slices.iter().position(|slice| *slice == name).expect(name);

        assert!(position("customers") < position("vehicles"));
        assert!(position("vehicles") < position("service_requests"));
        assert!(position("workforce") < position("workshop"));
        assert!(position("inventory") < position("workshop"));
        assert!(position("service_requests") < position("workshop"));
    }

    #[test]
    fn every_slice_is_listed() {
        for name in ["identity", "service_requests", "workshop", "dashboard"] {
            assert!(features::is_enabled(name), "{name}");
        }
        assert!(!features::is_enabled("licensing"));
    }
}
