mod commands;
mod handlers;
mod shell;

pub use commands::{Cli, Commands};
pub use handlers::{
    already_notified, handle_create, handle_delete, handle_list, handle_login, handle_logout,
    handle_register, handle_update,
};
pub use shell::{run_shell, ShellInput};
