// Wire protocol DTOs for the room WebSocket. Payload fields are camelCase
// JSON; message types use the backend's "scope:action" naming.

use serde::{Deserialize, Serialize};

use crate::domain::Comment;
use crate::use_cases::battle::VoteCommand;

/// Messages this client sends to the room server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    #[serde(rename = "room:join")]
    RoomJoin(RoomRef),
    #[serde(rename = "room:leave")]
    RoomLeave(RoomRef),
    #[serde(rename = "vote:cast")]
    VoteCast(VotePayload),
    #[serde(rename = "vote:retract")]
    VoteRetract(VotePayload),
    #[serde(rename = "vote:chase")]
    VoteChase(VotePayload),
    #[serde(rename = "comment:add")]
    CommentAdd(CommentPayload),
}

/// Messages the room server pushes to this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    #[serde(rename = "sync:state")]
    SyncState(SyncStateDto),
    #[serde(rename = "item:add")]
    ItemAdd(WireItem),
    #[serde(rename = "item:remove")]
    ItemRemove(ItemRef),
    #[serde(rename = "vote:update")]
    VoteUpdate(VoteUpdateDto),
    #[serde(rename = "vote:received")]
    VoteReceived(FishRef),
    #[serde(rename = "fish:eliminate")]
    FishEliminate(EliminateDto),
    #[serde(rename = "game:victory")]
    GameVictory(VictoryDto),
    #[serde(rename = "game:defeat")]
    GameDefeat(DefeatDto),
    #[serde(rename = "comment:add")]
    CommentAdd(CommentPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRef {
    pub room_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRef {
    pub item_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FishRef {
    pub fish_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotePayload {
    pub fish_id: String,
    pub voter_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPayload {
    pub item_id: String,
    pub comment: CommentDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentDto {
    #[serde(default)]
    pub author: String,
    pub content: String,
}

impl From<CommentDto> for Comment {
    fn from(dto: CommentDto) -> Self {
        Self {
            author: dto.author,
            content: dto.content,
        }
    }
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            author: comment.author,
            content: comment.content,
        }
    }
}

impl From<VoteCommand> for ClientMessage {
    fn from(command: VoteCommand) -> Self {
        match command {
            VoteCommand::Cast { fish_id, voter_id } => {
                ClientMessage::VoteCast(VotePayload { fish_id, voter_id })
            }
            VoteCommand::Retract { fish_id, voter_id } => {
                ClientMessage::VoteRetract(VotePayload { fish_id, voter_id })
            }
            VoteCommand::Chase { fish_id, voter_id } => {
                ClientMessage::VoteChase(VotePayload { fish_id, voter_id })
            }
        }
    }
}

/// Full room snapshot. Every field is optional; absent fields leave the
/// current client state untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStateDto {
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub total_items: Option<u32>,
    #[serde(default)]
    pub ai_count: Option<u32>,
    #[serde(default)]
    pub turbidity: Option<f32>,
    #[serde(default)]
    pub theme: Option<WireTheme>,
    #[serde(default)]
    pub items: Option<Vec<WireItem>>,
}

/// Item as the backend ships it. Numeric fields may be missing or garbage
/// (the drawing pipeline is lossy); the reconciler fills gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, rename = "isAI")]
    pub is_ai: bool,
    #[serde(default)]
    pub created_at: Option<u64>,
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
    #[serde(default)]
    pub vx: Option<f32>,
    #[serde(default)]
    pub vy: Option<f32>,
    #[serde(default)]
    pub rotation: Option<f32>,
    #[serde(default)]
    pub scale: Option<f32>,
    #[serde(default)]
    pub flip_x: Option<bool>,
    #[serde(default)]
    pub comments: Vec<CommentDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteUpdateDto {
    pub fish_id: String,
    pub count: u32,
    #[serde(default)]
    pub voters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EliminateDto {
    pub fish_id: String,
    #[serde(default)]
    pub fish_name: String,
    #[serde(default, rename = "isAI")]
    pub is_ai: bool,
    #[serde(default)]
    pub fish_owner_id: Option<String>,
    #[serde(default)]
    pub killer_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VictoryDto {
    #[serde(default)]
    pub mvp_name: Option<String>,
    #[serde(default)]
    pub ai_remaining: u32,
    #[serde(default)]
    pub human_remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefeatDto {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub human_killed: Option<u32>,
    #[serde(default)]
    pub ai_remaining: u32,
    #[serde(default)]
    pub human_remaining: u32,
}

/// Theme block inside `sync:state`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTheme {
    #[serde(default)]
    pub theme_id: Option<String>,
    #[serde(default)]
    pub theme_name: Option<String>,
    #[serde(default)]
    pub background_url: Option<String>,
    #[serde(default)]
    pub particle_effect: Option<String>,
    #[serde(default)]
    pub palette: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub prompt_style: Option<String>,
    #[serde(default)]
    pub spawn_rate: Option<f32>,
    #[serde(default)]
    pub max_imposters: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_message_uses_scope_action_tags() {
        let msg = ClientMessage::VoteCast(VotePayload {
            fish_id: "fish-1".into(),
            voter_id: "p1".into(),
        });
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "vote:cast");
        assert_eq!(json["data"]["fishId"], "fish-1");
        assert_eq!(json["data"]["voterId"], "p1");
    }

    #[test]
    fn sync_state_tolerates_sparse_payloads() {
        let raw = r#"{"type":"sync:state","data":{"phase":"voting","items":[{"id":"f1","isAI":true}]}}"#;
        let msg: ServerMessage = serde_json::from_str(raw).unwrap();
        let ServerMessage::SyncState(dto) = msg else {
            panic!("wrong variant");
        };
        assert_eq!(dto.phase.as_deref(), Some("voting"));
        assert_eq!(dto.room_id, None);
        let items = dto.items.unwrap();
        assert_eq!(items[0].id.as_deref(), Some("f1"));
        assert!(items[0].is_ai);
        assert_eq!(items[0].x, None);
    }

    #[test]
    fn eliminate_payload_round_trips_optionals() {
        let raw = r#"{"type":"fish:eliminate","data":{"fishId":"f1","fishName":"Bloop","isAI":false,"fishOwnerId":"p2","killerNames":["a","b"]}}"#;
        let msg: ServerMessage = serde_json::from_str(raw).unwrap();
        let ServerMessage::FishEliminate(dto) = msg else {
            panic!("wrong variant");
        };
        assert_eq!(dto.fish_owner_id.as_deref(), Some("p2"));
        assert_eq!(dto.killer_names.as_deref(), Some(&["a".to_string(), "b".to_string()][..]));
    }
}
