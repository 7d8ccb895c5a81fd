//! Handlers for the `matrix` and `token` subcommands.

use std::fmt::Write as _;

use chrono::Utc;
use portico_auth::{Session, TokenCodec};
use portico_rbac::{Module, PermissionMatrix, Role};

use crate::config::{ConfigManager, PorticoConfig};
use crate::Result;

/// Print the permission matrix, optionally for one role.
pub fn cmd_matrix(config_path: Option<&str>, role: Option<Role>) -> Result<()> {
    let config = PorticoConfig::load(config_path)?;
    print!("{}", render_matrix(&config.matrix(), role));
    Ok(())
}

/// Issue a token for `subject` with `role` using the configured lifetime.
pub fn cmd_token_issue(config_path: Option<&str>, subject: &str, role: Role) -> Result<()> {
    let config = PorticoConfig::load(config_path)?;
    let (token, session) = config.token_codec().issue(subject, role)?;
    println!("{token}");
    eprintln!("expires {}", session.expires_at.to_rfc3339());
    Ok(())
}

/// Decode a token and report whether it is still accepted.
pub fn cmd_token_inspect(token: &str) -> Result<()> {
    let session = TokenCodec::inspect(token)?;
    print!("{}", render_session(&session));
    Ok(())
}

/// Text table of the matrix.
pub fn render_matrix(matrix: &PermissionMatrix, only: Option<Role>) -> String {
    let roles: Vec<Role> = match only {
        Some(role) => vec![role],
        None => Role::ALL.to_vec(),
    };

    let mut out = String::new();
    for role in roles {
        let profile = matrix.profile(role);
        let scope = profile
            .data_scope
            .map(|s| s.as_str())
            .unwrap_or("none");
        let _ = writeln!(out, "{role} ({}) scope={scope}", role.label());

        if profile.modules.is_empty() {
            let _ = writeln!(out, "  (no access)");
            continue;
        }
        for module in Module::ALL {
            let permissions = matrix.permissions_for(role, module);
            if permissions.is_empty() {
                continue;
            }
            let names: Vec<&str> = permissions.iter().map(|p| p.as_str()).collect();
            let _ = writeln!(out, "  {:<12} {}", module.as_str(), names.join(", "));
        }
    }
    out
}

fn render_session(session: &Session) -> String {
    let now = Utc::now();
    let status = if session.is_expired_at(now) {
        "expired".to_string()
    } else {
        format!("valid ({}s remaining)", session.remaining_secs(now))
    };
    format!(
        "subject: {}\nrole:    {}\nissued:  {}\nexpires: {}\nstatus:  {status}\n",
        session.subject,
        session.role,
        session.issued_at.to_rfc3339(),
        session.expires_at.to_rfc3339(),
    )
}
