#![allow(dead_code)]
#![allow(unused_imports)]

mod builders;
mod mock_resolver;
mod mock_upstream;

pub use builders::*;
pub use mock_resolver::MockResolver;
pub use mock_upstream::{MockUpstream, SentQuery};
