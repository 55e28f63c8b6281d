// Per-user session state: the persisted view-model behind every gap-analysis screen.

pub mod handlers;
pub mod ledger;
pub mod persistence;
pub mod service;
pub mod store;
pub mod view;
