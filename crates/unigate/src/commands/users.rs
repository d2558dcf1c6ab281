//! User account administration.

use tabled::Tabled;

use unigate_api::types::{AssignRoleRequest, AvatarUpload, RegisterRequest, UpdateUserRequest};
use unigate_core::User;

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::config::SessionContext;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.full_name(),
            email: u.email.clone(),
            role: u.role.to_string(),
        }
    }
}

pub async fn handle(
    ctx: &SessionContext,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_session(ctx).await?;
    let api = ctx.session.api();

    match args.command {
        UsersCommand::List => {
            let mut users: Vec<User> = api
                .list_users()
                .await?
                .into_iter()
                .map(User::from)
                .collect();
            users.sort_by(|a, b| a.last_name.cmp(&b.last_name).then(a.id.cmp(&b.id)));
            let out = output::render_list(&global.output, &users, |u| UserRow::from(u), |u| {
                u.email.clone()
            });
            output::print_output(&out, global.quiet);
        }

        UsersCommand::Register {
            first_name,
            last_name,
            email,
            role,
        } => {
            let message = api
                .register(&RegisterRequest {
                    first_name,
                    last_name,
                    email: email.clone(),
                    role,
                })
                .await?;
            tracing::info!(%email, %role, "account registered");
            output::notice(&format!("✓ {message}"), global.quiet);
        }

        UsersCommand::Update {
            id,
            first_name,
            last_name,
            email,
        } => {
            let message = api
                .update_user(&UpdateUserRequest {
                    id,
                    first_name,
                    last_name,
                    email,
                })
                .await?;
            output::notice(&format!("✓ {message}"), global.quiet);
        }

        UsersCommand::Delete { id } => {
            if !util::confirm(&format!("Delete user {id}? This cannot be undone."), global.yes)? {
                return Ok(());
            }
            api.delete_user(id).await?;
            output::notice(&format!("✓ User {id} deleted"), global.quiet);
        }

        UsersCommand::AssignRole { email, role } => {
            let message = api
                .assign_role(&AssignRoleRequest {
                    email,
                    role_name: role,
                })
                .await?;
            output::notice(&format!("✓ {message}"), global.quiet);
        }

        UsersCommand::Avatar { file } => {
            let bytes = tokio::fs::read(&file).await?;
            let name = file
                .file_name()
                .map_or_else(|| "avatar".to_owned(), |n| n.to_string_lossy().into_owned());
            let response = api.update_avatar(AvatarUpload::new(name, bytes)).await?;
            output::notice(
                &format!("✓ Avatar updated: {}", response.avatar_url),
                global.quiet,
            );
        }
    }
    Ok(())
}
