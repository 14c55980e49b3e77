pub mod clock;
pub mod event;
pub mod mailbox;
pub mod step;
pub mod world;
