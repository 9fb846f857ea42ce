use anyhow::Result;
use qrtrail_core::session::SessionState;

use crate::app::App;

pub async fn login(app: &App, email: &str, password: &str) -> Result<()> {
    let identity = app.session.login(email, password).await?;
    println!("Signed in as {} <{}>", identity.display_name, identity.email);
    Ok(())
}

pub async fn register(app: &App, name: &str, email: &str, password: &str) -> Result<()> {
    let identity = app.session.register(name, email, password).await?;
    println!("Account created for {} <{}>", identity.display_name, identity.email);
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    app.session.logout().await?;
    println!("Signed out");
    Ok(())
}

pub async fn whoami(app: &App) {
    match app.session.current().await {
        SessionState::Authenticated { identity, .. } => {
            println!("{} <{}>", identity.display_name, identity.email)
        }
        SessionState::Anonymous => println!("Not signed in"),
    }
}
