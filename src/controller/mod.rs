pub mod cache;
pub mod get_data;
pub mod hole;
pub mod identity;
pub mod normalize;
mod payload;
pub mod player_stats;
pub mod points;
pub mod round;
pub mod score;
pub mod season;
pub mod selection;
