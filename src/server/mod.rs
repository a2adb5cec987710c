// Server module entry
// Listener setup, connection handling and the accept loop

pub mod connection;
pub mod listener;
pub mod server_loop;
pub mod signal;

pub use listener::create_listener;
pub use server_loop::run;
