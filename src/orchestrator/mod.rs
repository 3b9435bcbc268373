pub mod contract;

pub mod deploy;

pub mod error;

pub mod events;
