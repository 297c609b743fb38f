//! User provisioning commands.

use nextcloud_api::wrappers::UserField;
use nextcloud_api::{NextCloud, Response};

use crate::cli::UsersAction;
use crate::error::{CliError, CliResult};

pub fn run(client: &NextCloud, action: UsersAction) -> CliResult<Response> {
    let users = client.users();
    let response = match action {
        UsersAction::List {
            search,
            limit,
            offset,
        } => users.get_users(search.as_deref(), limit, offset)?,
        UsersAction::Get { uid } => users.get_user(&uid)?,
        UsersAction::Edit { uid, field, value } => {
            let field: UserField = field.parse().map_err(CliError::Config)?;
            users.edit_user(&uid, field, &value)?
        }
        UsersAction::Enable { uid } => users.enable_user(&uid)?,
        UsersAction::Disable { uid } => users.disable_user(&uid)?,
    };
    Ok(response)
}
