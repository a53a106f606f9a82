pub use self::{board::*, codec::*, rules::*};

pub(crate) mod board;
pub(crate) mod codec;
pub(crate) mod rules;
