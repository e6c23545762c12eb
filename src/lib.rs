pub mod accumulator;
pub mod config;
pub mod note;
pub mod recorder;
pub mod rpc;
pub mod runner;
pub mod submitter;
pub mod transaction;
