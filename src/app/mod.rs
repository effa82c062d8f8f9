pub mod ports;
pub mod publish;
