// Services - authorization gate, reference resolver and the query/mutation layer

pub mod auth_service;
pub mod authorization;
pub mod mutation_service;
pub mod query_service;
pub mod reference_resolver;

pub use auth_service::{AuthPayload, AuthService, Credentials};
pub use authorization::authorize;
pub use mutation_service::MutationService;
pub use query_service::QueryService;
pub use reference_resolver::ReferenceResolver;
