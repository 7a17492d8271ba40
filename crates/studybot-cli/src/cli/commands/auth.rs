//! Logout command handler.

use anyhow::Result;
use studybot_core::shell::Screen;

pub fn logout() -> Result<()> {
    let (mut shell, _) = super::restore_state()?;
    match shell.screen() {
        Screen::Chat { user } => {
            let name = user.name.clone();
            shell.logout();
            println!("Signed out {name}.");
        }
        Screen::Landing | Screen::Auth { .. } => println!("No user is signed in."),
    }
    Ok(())
}
