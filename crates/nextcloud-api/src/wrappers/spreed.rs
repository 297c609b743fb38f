//! Talk (spreed) conversations, participants and chat.
//!
//! Endpoints follow the Talk API v3 documentation at
//! <https://nextcloud-talk.readthedocs.io/en/stable/>. Every method issues
//! exactly one request and returns the envelope unmodified.

use nextcloud_core::Dialect;

use crate::error::ApiResult;
use crate::request::{ParamValue, Params};
use crate::requester::Requester;
use crate::response::Response;
use crate::segments;
use crate::wrapper::{ApiWrapper, WrapperDescriptor};

/// Conversation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomType {
    OneToOne = 1,
    Group = 2,
    Public = 3,
    Changelog = 4,
}

/// Read-only state of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOnlyState {
    ReadWrite = 0,
    ReadOnly = 1,
}

/// Participant notification level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Default = 0,
    Always = 1,
    Mention = 2,
    Never = 3,
}

/// Who can find a conversation in the open conversation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListableScope {
    Participants = 0,
    Users = 1,
    Everyone = 2,
}

macro_rules! int_enum_param {
    ($($ty:ty),*) => {
        $(impl From<$ty> for ParamValue {
            fn from(value: $ty) -> Self {
                ParamValue::Int(value as i64)
            }
        })*
    };
}

int_enum_param!(RoomType, ReadOnlyState, NotificationLevel, ListableScope);

/// How attendee permissions are modified.
///
/// The server decides the starting value when current permissions are the
/// default; the client only forwards the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionMode {
    Set,
    Add,
    Remove,
}

impl PermissionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

impl From<PermissionMode> for ParamValue {
    fn from(value: PermissionMode) -> Self {
        ParamValue::Str(value.as_str().to_string())
    }
}

/// Options for receiving chat messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatQuery {
    /// Number of messages to receive.
    pub limit: u32,
    /// Wait for new messages instead of reading history.
    pub look_into_future: bool,
    /// Seconds to wait when polling.
    pub timeout: Option<u32>,
    /// Offset, taken from the `X-Chat-Last-Given` header of a previous call.
    pub last_known_message_id: Option<i64>,
    /// Last `X-Chat-Last-Common-Read` value seen.
    pub last_common_read_id: Option<i64>,
    pub set_read_marker: Option<bool>,
    pub include_last_known: Option<bool>,
}

impl Default for ChatQuery {
    fn default() -> Self {
        Self {
            limit: 5,
            look_into_future: false,
            timeout: None,
            last_known_message_id: None,
            last_common_read_id: None,
            set_read_marker: None,
            include_last_known: None,
        }
    }
}

impl ChatQuery {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn polling(mut self, timeout: Option<u32>) -> Self {
        self.look_into_future = true;
        self.timeout = timeout;
        self
    }

    pub fn after(mut self, last_known_message_id: i64) -> Self {
        self.last_known_message_id = Some(last_known_message_id);
        self
    }

    fn to_params(&self) -> Params {
        Params::new()
            .with("limit", self.limit)
            .with("lookIntoFuture", u8::from(self.look_into_future))
            .with_opt("timeout", self.timeout)
            .with_opt("lastKnownMessageId", self.last_known_message_id)
            .with_opt("lastCommonReadId", self.last_common_read_id)
            .with_opt("setReadMarker", self.set_read_marker.map(u8::from))
            .with_opt("includeLastKnown", self.include_last_known.map(u8::from))
    }
}

/// Talk API wrapper.
#[derive(Debug, Clone)]
pub struct Spreed {
    requester: Requester,
}

impl ApiWrapper for Spreed {
    const DESCRIPTOR: WrapperDescriptor =
        WrapperDescriptor::new("spreed", Dialect::OcsV2).with_api_path("/ocs/v2.php/apps/spreed/api/v3");

    fn from_requester(requester: Requester) -> Self {
        Self { requester }
    }
}

impl Spreed {
    // Conversations

    /// Lists the conversations of the current user.
    ///
    /// `no_status_update` keeps the user's online status from being
    /// refreshed; `include_status` loads the status of one-to-one partners.
    pub fn get_user_conversations(
        &self,
        no_status_update: Option<bool>,
        include_status: Option<bool>,
    ) -> ApiResult<Response> {
        let params = Params::new()
            .with_opt("noStatusUpdate", no_status_update.map(u8::from))
            .with_opt("includeStatus", include_status);
        self.requester.get(&segments!["room"], params)
    }

    /// Creates a conversation.
    ///
    /// `invite` is a user id for one-to-one rooms, or a group or circle id
    /// for group rooms, with `source` naming which.
    pub fn create_new_conversation(
        &self,
        room_name: &str,
        room_type: RoomType,
        invite: Option<&str>,
        source: Option<&str>,
    ) -> ApiResult<Response> {
        let params = Params::new()
            .with("roomName", room_name)
            .with("roomType", room_type)
            .with_opt("invite", invite)
            .with_opt("source", source);
        self.requester.post(&segments!["room"], params)
    }

    pub fn get_single_conversation(&self, token: &str) -> ApiResult<Response> {
        self.requester.get(&segments!["room", token], Params::new())
    }

    /// Lists conversations open to the current user, filtered by `search_term`.
    pub fn get_open_conversations(&self, search_term: Option<&str>) -> ApiResult<Response> {
        let params = Params::new().with_opt("searchTerm", search_term.filter(|s| !s.is_empty()));
        self.requester.get(&segments!["listable-rooms"], params)
    }

    pub fn rename_conversation(&self, token: &str, room_name: &str) -> ApiResult<Response> {
        let params = Params::new().with("roomName", room_name);
        self.requester.put(&segments!["room", token], params)
    }

    pub fn delete_conversation(&self, token: &str) -> ApiResult<Response> {
        self.requester.delete(&segments!["room", token], Params::new())
    }

    pub fn set_conversation_description(
        &self,
        token: &str,
        description: &str,
    ) -> ApiResult<Response> {
        let params = Params::new().with("description", description);
        self.requester.put(&segments!["room", token, "description"], params)
    }

    /// Makes the conversation public.
    pub fn allow_guests_in_conversation(&self, token: &str) -> ApiResult<Response> {
        self.requester.post(&segments!["room", token, "public"], Params::new())
    }

    /// Turns a public conversation back into a group conversation.
    pub fn disallow_guests_in_conversation(&self, token: &str) -> ApiResult<Response> {
        self.requester.delete(&segments!["room", token, "public"], Params::new())
    }

    pub fn set_readonly_conversation(
        &self,
        token: &str,
        state: ReadOnlyState,
    ) -> ApiResult<Response> {
        let params = Params::new().with("state", state);
        self.requester.put(&segments!["room", token, "read-only"], params)
    }

    pub fn set_password_for_conversation(&self, token: &str, password: &str) -> ApiResult<Response> {
        let params = Params::new().with("password", password);
        self.requester.put(&segments!["room", token, "password"], params)
    }

    pub fn add_conversation_to_favorites(&self, token: &str) -> ApiResult<Response> {
        self.requester.post(&segments!["room", token, "favorite"], Params::new())
    }

    pub fn delete_conversation_from_favorites(&self, token: &str) -> ApiResult<Response> {
        self.requester.delete(&segments!["room", token, "favorite"], Params::new())
    }

    pub fn set_notification_level(
        &self,
        token: &str,
        level: NotificationLevel,
    ) -> ApiResult<Response> {
        let params = Params::new().with("level", level);
        self.requester.post(&segments!["room", token, "notify"], params)
    }

    /// Sets who can find the conversation in the open conversation list.
    pub fn open_conversation(&self, token: &str, scope: ListableScope) -> ApiResult<Response> {
        let params = Params::new().with("scope", scope);
        self.requester.put(&segments!["room", token, "listable"], params)
    }

    // Participants

    pub fn get_room_participants(
        &self,
        token: &str,
        include_status: Option<bool>,
    ) -> ApiResult<Response> {
        let params = Params::new().with_opt("includeStatus", include_status);
        self.requester.get(&segments!["room", token, "participants"], params)
    }

    /// Adds a user, group, email or circle to a conversation.
    ///
    /// `source` is the source returned by the autocomplete endpoint; the
    /// server assumes `users` when it is omitted.
    pub fn add_participant(
        &self,
        token: &str,
        new_participant: &str,
        source: Option<&str>,
    ) -> ApiResult<Response> {
        let params = Params::new()
            .with("newParticipant", new_participant)
            .with_opt("source", source);
        self.requester.post(&segments!["room", token, "participants"], params)
    }

    pub fn delete_attendee(&self, token: &str, attendee_id: i64) -> ApiResult<Response> {
        let params = Params::new().with("attendeeId", attendee_id);
        self.requester.delete(&segments!["room", token, "attendees"], params)
    }

    pub fn remove_self_from_conversation(&self, token: &str) -> ApiResult<Response> {
        self.requester
            .delete(&segments!["room", token, "participants", "self"], Params::new())
    }

    /// Joins a conversation for call and chat.
    ///
    /// With `force` false the server answers 409 when the user already has
    /// an active session.
    pub fn join_conversation(
        &self,
        token: &str,
        password: Option<&str>,
        force: bool,
    ) -> ApiResult<Response> {
        let params = Params::new()
            .with("force", force)
            .with_opt("password", password.filter(|p| !p.is_empty()));
        self.requester
            .post(&segments!["room", token, "participants", "self"], params)
    }

    /// Resends invitation emails, to one attendee or to all of them.
    pub fn resend_participant_emails(
        &self,
        token: &str,
        attendee_id: Option<i64>,
    ) -> ApiResult<Response> {
        let params = Params::new().with_opt("attendeeId", attendee_id);
        self.requester.post(
            &segments!["room", token, "participants", "resend-invitations"],
            params,
        )
    }

    pub fn leave_conversation(&self, token: &str) -> ApiResult<Response> {
        self.requester
            .delete(&segments!["room", token, "participants", "active"], Params::new())
    }

    pub fn promote_moderator(&self, token: &str, attendee_id: i64) -> ApiResult<Response> {
        let params = Params::new().with("attendeeId", attendee_id);
        self.requester.post(&segments!["room", token, "moderators"], params)
    }

    pub fn demote_moderator(&self, token: &str, attendee_id: i64) -> ApiResult<Response> {
        let params = Params::new().with("attendeeId", attendee_id);
        self.requester.delete(&segments!["room", token, "moderators"], params)
    }

    pub fn set_permissions(
        &self,
        token: &str,
        attendee_id: i64,
        mode: PermissionMode,
        permissions: u32,
    ) -> ApiResult<Response> {
        let params = Params::new()
            .with("attendeeId", attendee_id)
            .with("mode", mode)
            .with("permissions", permissions);
        self.requester
            .put(&segments!["room", token, "attendees", "permissions"], params)
    }

    pub fn set_permissions_for_all_attendees(
        &self,
        token: &str,
        mode: PermissionMode,
        permissions: u32,
    ) -> ApiResult<Response> {
        let params = Params::new()
            .with("mode", mode)
            .with("permissions", permissions);
        self.requester.put(
            &segments!["room", token, "attendees", "permissions", "all"],
            params,
        )
    }

    /// Looks a participant up by PIN. Only allowed for SIP bridge requests.
    pub fn get_participant(&self, token: &str, pin: &str) -> ApiResult<Response> {
        self.requester
            .get(&segments!["room", token, "pin", pin], Params::new())
    }

    pub fn set_displayname_as_guest(&self, token: &str, display_name: &str) -> ApiResult<Response> {
        let params = Params::new().with("displayName", display_name);
        self.requester.post(&segments!["guest", token, "name"], params)
    }

    // Chat

    /// Receives chat messages of a conversation.
    ///
    /// The next page offset is in the `X-Chat-Last-Given` response header.
    pub fn receive_chat_message_in_conversation(
        &self,
        token: &str,
        query: &ChatQuery,
    ) -> ApiResult<Response> {
        self.requester.get(&segments!["chat", token], query.to_params())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_query_defaults() {
        let pairs = ChatQuery::default().to_params().to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("limit".to_string(), "5".to_string()),
                ("lookIntoFuture".to_string(), "0".to_string()),
            ]
        );
    }

    #[test]
    fn chat_query_polling() {
        let params = ChatQuery::default()
            .with_limit(100)
            .polling(Some(30))
            .after(1234)
            .to_params();
        assert_eq!(params.get("lookIntoFuture"), Some(&ParamValue::Int(1)));
        assert_eq!(params.get("timeout"), Some(&ParamValue::Int(30)));
        assert_eq!(params.get("lastKnownMessageId"), Some(&ParamValue::Int(1234)));
        assert!(!params.contains_key("setReadMarker"));
    }

    #[test]
    fn enum_params_encode_as_numbers() {
        assert_eq!(ParamValue::from(RoomType::Public), ParamValue::Int(3));
        assert_eq!(ParamValue::from(ReadOnlyState::ReadOnly), ParamValue::Int(1));
        assert_eq!(ParamValue::from(ListableScope::Everyone), ParamValue::Int(2));
        assert_eq!(ParamValue::from(PermissionMode::Remove), ParamValue::Str("remove".into()));
    }
}
