pub mod feeds;
pub mod folders;
pub mod run;
pub mod seed;
pub mod stars;
