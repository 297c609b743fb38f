//! Endpoint wrappers, one per area of the server API.

mod capabilities;
mod group_folders;
mod shares;
mod spreed;
mod users;
mod webdav;

pub use capabilities::Capabilities;
pub use group_folders::GroupFolders;
pub use shares::{ShareOptions, ShareUpdate, Shares};
pub use spreed::{
    ChatQuery, ListableScope, NotificationLevel, PermissionMode, ReadOnlyState, RoomType, Spreed,
};
pub use users::{UserField, Users};
pub use webdav::{Depth, WebDav};
