pub mod demo_mode;
pub mod run_mode;
