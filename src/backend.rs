//! Background services: the revision API client, the comparison worker,
//! API key persistence and export of revised texts.

pub mod ai_backend;
pub mod diff_worker;
pub mod export;
pub mod key_store;
pub mod prompt;
