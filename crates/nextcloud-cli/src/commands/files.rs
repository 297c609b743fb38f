//! Files commands.

use nextcloud_api::wrappers::Depth;
use nextcloud_api::{NextCloud, Response};
use tracing::info;

use crate::cli::FilesAction;
use crate::error::CliResult;

pub fn run(client: &NextCloud, action: FilesAction) -> CliResult<Response> {
    let files = client.files();
    let response = match action {
        FilesAction::Ls { path, all } => files.list_folders(None, &path, Depth::One, all)?,
        FilesAction::Info { path } => files.get_file_info(None, &path, None)?,
        FilesAction::Mkdir { path } => files.create_folder(None, &path)?,
        FilesAction::Rm { path } => files.delete_path(None, &path)?,
        FilesAction::Put { local, remote } => {
            let contents = std::fs::read(&local)?;
            info!(local = %local.display(), remote = %remote, bytes = contents.len(), "Uploading");
            files.upload_file_contents(None, &remote, contents, None)?
        }
        FilesAction::Cp {
            source,
            destination,
            overwrite,
        } => files.copy_path(None, &source, &destination, overwrite)?,
        FilesAction::Mv {
            source,
            destination,
            overwrite,
        } => files.move_path(None, &source, &destination, overwrite)?,
        FilesAction::Favorite { path, unset } => files.set_favorites(None, &path, !unset)?,
        FilesAction::Favorites { path } => files.list_favorites(None, &path)?,
        FilesAction::Versions { path, file_id } => {
            files.list_file_versions(None, file_id, Some(&path))?
        }
    };
    Ok(response)
}
