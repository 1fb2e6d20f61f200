mod player;
mod results;
mod season;
mod standings;
mod statistics;

pub use player::*;
pub use results::*;
pub use season::*;
pub use standings::*;
pub use statistics::*;
