mod add;
mod close;
mod delete;
mod export;
mod history;
mod list;
mod login;
mod show;
mod update;

pub use add::cmd_add;
pub use close::cmd_close;
pub use delete::{cmd_delete_all, cmd_delete_machine, cmd_delete_closed_older_than};
pub use export::cmd_export;
pub use history::cmd_history;
pub use list::cmd_list;
pub use login::cmd_login;
pub use show::cmd_show;
pub use update::cmd_update;

/// Clips long issue text for the fixed-width table views.
fn clip(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}
