mod helpers;

mod stats_test;
mod verify_test;
