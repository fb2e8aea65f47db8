mod now;
pub use now::*;
