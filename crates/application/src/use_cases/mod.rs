mod handle_query;
mod recursive_lookup;

pub use handle_query::HandleQueryUseCase;
pub use recursive_lookup::RecursiveResolver;
