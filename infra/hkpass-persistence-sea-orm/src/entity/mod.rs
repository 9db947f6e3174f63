pub mod attack_record;
pub mod common_setting;
pub mod minigame;
pub mod player;
pub mod team;
