// GraphQL schema and context
pub mod context;
pub mod schema;

pub use context::GraphQLContext;
pub use schema::{Schema, schema};
