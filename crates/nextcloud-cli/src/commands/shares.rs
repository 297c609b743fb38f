//! Shares commands.

use nextcloud_api::wrappers::ShareOptions;
use nextcloud_api::{NextCloud, Permission, Response, ShareType};

use crate::cli::{ShareKind, SharesAction};
use crate::error::CliResult;

impl From<ShareKind> for ShareType {
    fn from(kind: ShareKind) -> Self {
        match kind {
            ShareKind::User => ShareType::User,
            ShareKind::Group => ShareType::Group,
            ShareKind::Link => ShareType::PublicLink,
            ShareKind::Federated => ShareType::FederatedCloudShare,
        }
    }
}

pub fn run(client: &NextCloud, action: SharesAction) -> CliResult<Response> {
    let shares = client.shares();
    let response = match action {
        SharesAction::List { path } => shares.get_shares(path.as_deref(), None, None)?,
        SharesAction::Get { id } => shares.get_share_info(id)?,
        SharesAction::Create {
            path,
            r#type,
            with,
            permissions,
            password,
        } => {
            let options = ShareOptions {
                share_with: with,
                password,
                permissions: permissions.map(Permission::from_bits),
                ..Default::default()
            };
            shares.create_share(&path, r#type.into(), &options)?
        }
        SharesAction::Delete { id } => shares.delete_share(id)?,
    };
    Ok(response)
}
