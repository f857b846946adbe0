mod decode;
mod lookup;

pub use decode::run_decode;
pub use lookup::run_lookup;
