//! Schema compilation: the one-shot projection of the registry into an
//! executable [`async_graphql::dynamic::Schema`].

mod adapt;
mod compiler;
mod resolve;
