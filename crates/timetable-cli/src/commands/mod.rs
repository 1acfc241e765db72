pub mod add;
pub mod hide;
pub mod init;
pub mod schedule;
pub mod usage;
