pub mod cfg;

pub mod key;

pub mod network;

pub mod error;
