//! Talk commands.

use nextcloud_api::wrappers::{ChatQuery, RoomType};
use nextcloud_api::{NextCloud, Response};

use crate::cli::{RoomKind, TalkAction};
use crate::error::CliResult;

impl From<RoomKind> for RoomType {
    fn from(kind: RoomKind) -> Self {
        match kind {
            RoomKind::OneToOne => RoomType::OneToOne,
            RoomKind::Group => RoomType::Group,
            RoomKind::Public => RoomType::Public,
        }
    }
}

pub fn run(client: &NextCloud, action: TalkAction) -> CliResult<Response> {
    let talk = client.talk();
    let response = match action {
        TalkAction::List { include_status } => {
            talk.get_user_conversations(None, include_status.then_some(true))?
        }
        TalkAction::Create {
            name,
            r#type,
            invite,
            source,
        } => talk.create_new_conversation(
            &name,
            r#type.into(),
            invite.as_deref(),
            source.as_deref(),
        )?,
        TalkAction::Get { token } => talk.get_single_conversation(&token)?,
        TalkAction::Open { search } => talk.get_open_conversations(search.as_deref())?,
        TalkAction::Rename { token, name } => talk.rename_conversation(&token, &name)?,
        TalkAction::Delete { token } => talk.delete_conversation(&token)?,
        TalkAction::Participants {
            token,
            include_status,
        } => talk.get_room_participants(&token, include_status.then_some(true))?,
        TalkAction::Add {
            token,
            participant,
            source,
        } => talk.add_participant(&token, &participant, source.as_deref())?,
        TalkAction::Messages {
            token,
            limit,
            after,
        } => {
            let mut query = ChatQuery::default().with_limit(limit);
            if let Some(after) = after {
                query = query.after(after);
            }
            talk.receive_chat_message_in_conversation(&token, &query)?
        }
    };
    Ok(response)
}
