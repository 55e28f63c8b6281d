// Learning roadmaps: fixed phase templates plus the skill complexity / prerequisite catalog.

pub mod generator;
pub mod handlers;
pub mod learning;
