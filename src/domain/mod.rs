pub mod audit;
pub mod error;
pub mod id;
pub mod invoice;
pub mod money;
pub mod payment;
pub mod ports;
