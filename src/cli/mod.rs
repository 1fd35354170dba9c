mod commands;
mod handlers;

pub use commands::{Cli, Commands};
pub use handlers::{
    handle_add, handle_complete, handle_delete, handle_init, handle_list, handle_say,
    handle_status,
};
