pub mod cache;
pub mod config;
pub mod debounce;
pub mod indicator;
pub mod logging;
pub mod mailbox;
pub mod mutation;
pub mod notify;
pub mod settings;
