use album_core::{Page, Post};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{FailureKind, FetchError};

/// `ec` value of a successful listing response.
pub const SUCCESS_CODE: i64 = 200;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default, deserialize_with = "deserialize_int_or_string")]
    ec: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    em: Option<String>,
    #[serde(default)]
    data: Option<ListData>,
}

#[derive(Debug, Deserialize)]
struct ListData {
    #[serde(default)]
    list: Option<Vec<WirePost>>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    has_more: bool,
}

#[derive(Debug, Deserialize)]
struct WirePost {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    content: Option<String>,
    #[serde(default, deserialize_with = "deserialize_int_or_string")]
    rank: Option<i64>,
    #[serde(default)]
    albums: Option<Vec<WireAlbum>>,
    #[serde(default)]
    user: Option<WireUser>,
}

#[derive(Debug, Deserialize)]
struct WireAlbum {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    #[serde(default)]
    name: Option<String>,
}

impl From<WirePost> for Post {
    fn from(wire: WirePost) -> Self {
        Post {
            title: wire.title.unwrap_or_default(),
            content: wire.content.unwrap_or_default(),
            rank: wire.rank,
            album_title: wire
                .albums
                .and_then(|albums| albums.into_iter().next())
                .and_then(|album| album.title),
            author_name: wire.user.and_then(|user| user.name),
        }
    }
}

/// Decode one listing response body. A missing `data` or `list` is an empty page.
pub fn decode_page(bytes: &[u8]) -> Result<Page, FetchError> {
    let envelope: Envelope = serde_json::from_slice(bytes)
        .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;

    match envelope.ec {
        Some(SUCCESS_CODE) => {}
        Some(code) => {
            return Err(FetchError::new(
                FailureKind::Api { code },
                envelope.em.unwrap_or_default(),
            ));
        }
        None => {
            return Err(FetchError::new(
                FailureKind::Decode,
                "response has no status code field",
            ));
        }
    }

    let Some(data) = envelope.data else {
        return Ok(Page::default());
    };
    Ok(Page {
        posts: data
            .list
            .unwrap_or_default()
            .into_iter()
            .map(Post::from)
            .collect(),
        has_more: data.has_more,
    })
}

fn deserialize_int_or_string<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected integer, got {n}"))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected integer string, got {s:?}"))),
        Some(other) => Err(D::Error::custom(format!(
            "expected integer or string, got {:?}",
            other
        ))),
    }
}

fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {:?}",
            other
        ))),
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(b),
        Some(Value::Number(n)) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
        Some(Value::String(s)) => match s.trim() {
            "" | "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            other => Err(D::Error::custom(format!("expected flag, got {other:?}"))),
        },
        Some(other) => Err(D::Error::custom(format!("expected flag, got {:?}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_posts_and_naming_fields() {
        let body = br#"{
            "ec": 200,
            "em": "ok",
            "data": {
                "list": [
                    {"title": "One", "content": "a\nb", "rank": 3,
                     "albums": [{"title": "Album"}, {"title": "Other"}],
                     "user": {"name": "Author"}},
                    {"title": null, "rank": "4"}
                ],
                "has_more": 1
            }
        }"#;

        let page = decode_page(body).unwrap();
        assert!(page.has_more);
        assert_eq!(page.posts.len(), 2);
        assert_eq!(page.posts[0].album_title.as_deref(), Some("Album"));
        assert_eq!(page.posts[0].author_name.as_deref(), Some("Author"));
        assert_eq!(page.posts[0].content, "a\nb");
        assert_eq!(page.posts[1].title, "");
        assert_eq!(page.posts[1].content, "");
        assert_eq!(page.posts[1].rank, Some(4));
        assert_eq!(page.posts[1].album_title, None);
    }

    #[test]
    fn missing_data_or_flag_is_final_empty_page() {
        let page = decode_page(br#"{"ec": 200}"#).unwrap();
        assert_eq!(page, Page::default());

        let page = decode_page(br#"{"ec": 200, "data": {"list": [{"title": "x"}]}}"#).unwrap();
        assert!(!page.has_more);
        assert_eq!(page.posts[0].rank, None);
    }

    #[test]
    fn boolean_continuation_flag_is_accepted() {
        let page = decode_page(br#"{"ec": 200, "data": {"list": [], "has_more": true}}"#).unwrap();
        assert!(page.has_more);
    }

    #[test]
    fn non_success_code_is_api_error() {
        let err = decode_page(br#"{"ec": 401, "em": "not logged in"}"#).unwrap_err();
        assert_eq!(err.kind, FailureKind::Api { code: 401 });
        assert_eq!(err.message, "not logged in");
    }

    #[test]
    fn numeric_error_message_keeps_api_error() {
        let err = decode_page(br#"{"ec": 401, "em": 123}"#).unwrap_err();
        assert_eq!(err.kind, FailureKind::Api { code: 401 });
        assert_eq!(err.message, "123");
    }

    #[test]
    fn numeric_title_and_content_are_rendered_as_text() {
        let body = br#"{"ec": 200, "data": {"list": [{"title": 42, "content": 7.5, "rank": 1}]}}"#;
        let page = decode_page(body).unwrap();
        assert_eq!(page.posts[0].title, "42");
        assert_eq!(page.posts[0].content, "7.5");
    }

    #[test]
    fn malformed_bodies_are_decode_errors() {
        assert_eq!(decode_page(b"<html>").unwrap_err().kind, FailureKind::Decode);
        assert_eq!(decode_page(br#"{"em": "?"}"#).unwrap_err().kind, FailureKind::Decode);
        assert_eq!(
            decode_page(br#"{"ec": 200, "data": {"list": [{"rank": "abc"}]}}"#)
                .unwrap_err()
                .kind,
            FailureKind::Decode
        );
        assert_eq!(
            decode_page(br#"{"ec": 200, "data": {"list": [{"title": ["x"]}]}}"#)
                .unwrap_err()
                .kind,
            FailureKind::Decode
        );
    }
}
