pub mod contact;
pub mod movement;
pub mod progression;
pub mod projectiles;
pub mod upgrades;
