pub mod cpu;
pub mod display;
pub mod gpu;
pub mod memory;
pub mod monitor;
