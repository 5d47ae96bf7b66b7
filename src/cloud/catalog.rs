//! Service catalog
//!
//! Maps the service names used by data sources to the host prefix of their
//! API endpoint.

#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    /// Host prefix, e.g. `workspace` in `workspace.{region}.{cloud}`
    pub name: &'static str,
}

const CATALOG: &[(&str, CatalogEntry)] = &[
    (
        "workspace",
        CatalogEntry {
            name: "workspace",
        },
    ),
    // Workspace application streaming (APP) shares the appstream host
    (
        "appstream",
        CatalogEntry {
            name: "appstream",
        },
    ),
];

/// Find a service by name
pub fn lookup(service: &str) -> Option<CatalogEntry> {
    CATALOG
        .iter()
        .find(|(key, _)| *key == service)
        .map(|(_, entry)| *entry)
}

/// Names of all known services
pub fn services() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|(key, _)| *key)
}
