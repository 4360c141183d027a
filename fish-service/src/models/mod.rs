pub mod fish;

pub use fish::{parse_fish_id, Fish, ID_FIELD};
