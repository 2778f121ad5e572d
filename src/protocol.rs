use crate::types::*;
use serde::{Deserialize, Serialize};

/// Inbound frames. Fields of the wrong JSON type are decoded as absent so that
/// they reach the same validation path as a missing field.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    Join {
        #[serde(default, deserialize_with = "lenient::string")]
        name: Option<String>,
        #[serde(default, deserialize_with = "lenient::string")]
        role: Option<String>,
        #[serde(default, deserialize_with = "lenient::string")]
        avatar: Option<String>,
        /// Only consulted when the server has an admin secret configured
        #[serde(
            default,
            rename = "adminSecret",
            deserialize_with = "lenient::string"
        )]
        admin_secret: Option<String>,
    },
    Paint {
        #[serde(default, deserialize_with = "lenient::integer")]
        x: Option<i64>,
        #[serde(default, deserialize_with = "lenient::integer")]
        y: Option<i64>,
        #[serde(default, deserialize_with = "lenient::string")]
        color: Option<String>,
    },
    Kick {
        #[serde(
            default,
            rename = "targetUserId",
            deserialize_with = "lenient::string"
        )]
        target_user_id: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    /// Decode a text frame
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    Init {
        size: usize,
        pixels: Vec<HexColor>,
        owners: Vec<Option<PixelOwner>>,
        users: Vec<User>,
    },
    Pixel {
        pixel: PixelBroadcast,
    },
    Users {
        users: Vec<User>,
    },
    UserAccepted {
        user: User,
    },
    Error {
        message: String,
    },
    Kicked {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }
}

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    /// Accepts any JSON number with no fractional part (`5` and `5.0` alike).
    /// Numeric strings such as `"5"` are not coerced and read as missing.
    pub fn integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .filter(|f| *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ada() -> User {
        User {
            id: "01HZX3Y1Q2W3E4R5T6Y7U8I9O0".to_string(),
            name: "Ada".to_string(),
            role: Role::Participant,
            avatar: Avatar::PixelFox,
        }
    }

    #[test]
    fn test_decode_join() {
        let msg = ClientMessage::decode(
            r#"{"type":"join","name":"Ada","role":"participant","avatar":"pixel-fox"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::Join {
                name: Some("Ada".to_string()),
                role: Some("participant".to_string()),
                avatar: Some("pixel-fox".to_string()),
                admin_secret: None,
            }
        );
    }

    #[test]
    fn test_decode_join_with_wrong_field_types() {
        let msg = ClientMessage::decode(r#"{"type":"join","name":42,"avatar":null}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Join {
                name: None,
                role: None,
                avatar: None,
                admin_secret: None,
            }
        );
    }

    #[test]
    fn test_decode_paint_coordinates() {
        let msg = ClientMessage::decode(r##"{"type":"paint","x":5,"y":7.0,"color":"#fff000"}"##)
            .unwrap();
        assert_eq!(
            msg,
            ClientMessage::Paint {
                x: Some(5),
                y: Some(7),
                color: Some("#fff000".to_string()),
            }
        );

        let msg =
            ClientMessage::decode(r##"{"type":"paint","x":1.5,"y":"2","color":"#fff000"}"##)
                .unwrap();
        assert!(matches!(
            msg,
            ClientMessage::Paint {
                x: None,
                y: None,
                ..
            }
        ));
    }

    #[test]
    fn test_decode_kick() {
        let msg = ClientMessage::decode(r#"{"type":"kick","targetUserId":"abc"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Kick {
                target_user_id: Some("abc".to_string())
            }
        );
    }

    #[test]
    fn test_decode_unknown_type() {
        let msg = ClientMessage::decode(r#"{"type":"dance","speed":3}"#).unwrap();
        assert_eq!(msg, ClientMessage::Unknown);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(ClientMessage::decode("not json").is_err());
        assert!(ClientMessage::decode(r#"{"name":"Ada"}"#).is_err());
        assert!(ClientMessage::decode("42").is_err());
    }

    #[test]
    fn test_server_message_wire_shapes() {
        let owner = PixelOwner::from(&ada());

        let init = ServerMessage::Init {
            size: 1,
            pixels: vec![HexColor::parse("#f8fafc").unwrap()],
            owners: vec![None],
            users: vec![],
        };
        assert_eq!(
            serde_json::to_value(&init).unwrap(),
            json!({"type":"init","size":1,"pixels":["#f8fafc"],"owners":[null],"users":[]})
        );

        let pixel = ServerMessage::Pixel {
            pixel: PixelBroadcast {
                x: 5,
                y: 5,
                color: HexColor::parse("#ABCDEF").unwrap(),
                owner,
            },
        };
        assert_eq!(
            serde_json::to_value(&pixel).unwrap(),
            json!({"type":"pixel","pixel":{"x":5,"y":5,"color":"#abcdef","owner":{"name":"Ada","avatar":"pixel-fox"}}})
        );

        let accepted = ServerMessage::UserAccepted { user: ada() };
        assert_eq!(
            serde_json::to_value(&accepted).unwrap()["type"],
            json!("user-accepted")
        );

        assert_eq!(
            serde_json::to_value(ServerMessage::Kicked { reason: None }).unwrap(),
            json!({"type":"kicked"})
        );
        assert_eq!(
            serde_json::to_value(ServerMessage::error("invalid avatar")).unwrap(),
            json!({"type":"error","message":"invalid avatar"})
        );
    }

    #[test]
    fn test_server_messages_survive_serde() {
        let owner = PixelOwner::from(&ada());
        let messages = vec![
            ServerMessage::Init {
                size: 2,
                pixels: vec![HexColor::parse("#000000").unwrap(); 4],
                owners: vec![None, Some(owner.clone()), None, None],
                users: vec![ada()],
            },
            ServerMessage::Pixel {
                pixel: PixelBroadcast {
                    x: 1,
                    y: 0,
                    color: HexColor::parse("#123abc").unwrap(),
                    owner,
                },
            },
            ServerMessage::Users { users: vec![ada()] },
            ServerMessage::UserAccepted { user: ada() },
            ServerMessage::error("administrators only"),
            ServerMessage::Kicked {
                reason: Some("bye".to_string()),
            },
        ];

        for msg in messages {
            let json = serde_json::to_string(&msg).unwrap();
            let decoded: ServerMessage = serde_json::from_str(&json).unwrap();
            assert_eq!(decoded, msg);
        }
    }
}
