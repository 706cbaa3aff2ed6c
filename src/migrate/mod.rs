pub mod audit;
pub mod config;
pub mod copy;
pub mod migrator;
pub mod offline_id;
pub mod paths;
pub mod targets;
pub mod usercache;
pub mod util;
pub mod warn;
