// Module layout (Clean Architecture style)
// - bootstrap: configuration and startup wiring
// - infrastructure: MySQL repositories, password hashing, JWT
// - presentation: HTTP handlers, extractors and routing
// - application: use cases, ports and access policy
// - domain: core models

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
