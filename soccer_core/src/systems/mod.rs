pub mod ai;
pub mod buffs;
pub mod collision;
pub mod gc;
pub mod movement;
pub mod particles;
pub mod pickups;
pub mod scoring;

pub use ai::*;
pub use buffs::*;
pub use collision::*;
pub use gc::*;
pub use movement::*;
pub use particles::*;
pub use pickups::*;
pub use scoring::*;
