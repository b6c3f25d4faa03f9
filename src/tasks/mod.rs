pub mod poll_sweeper;
pub mod scheduler;
