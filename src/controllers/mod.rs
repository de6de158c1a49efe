pub mod cli;
pub mod coordinator;
pub mod ports;
pub mod worker;
