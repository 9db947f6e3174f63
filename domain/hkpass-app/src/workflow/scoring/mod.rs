pub mod attack;
pub mod complete_minigame;
