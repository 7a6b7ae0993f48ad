//! Client command parsing
//!
//! One command per line, fields separated by `:`. The first colon separates
//! the action from the remainder; for PUBLISH the remainder splits once more
//! into topic and body, and the body may itself contain colons (it is
//! everything after the second colon).

use thiserror::Error;

/// A parsed client command, one variant per broker operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Subscribe { topic: String },
    Unsubscribe { topic: String },
    Publish { topic: String, body: String },
    Consume { topic: String },
    Acknowledge { topic: String, message_id: u64 },
    Requeue { topic: String, message_id: Option<u64> },
}

/// Why a protocol line could not be parsed. Malformed lines are ignored by
/// the session (no response, connection stays open); the reason is only
/// logged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing ':' separator")]
    MissingSeparator,

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("empty topic name")]
    EmptyTopic,

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid message id: {0}")]
    InvalidMessageId(String),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let (action, rest) = line.split_once(':').ok_or(ParseError::MissingSeparator)?;

        let command = match action {
            "SUBSCRIBE" => Command::Subscribe {
                topic: topic(rest)?,
            },
            "UNSUBSCRIBE" => Command::Unsubscribe {
                topic: topic(rest)?,
            },
            "PUBLISH" => {
                let (topic_name, body) = rest
                    .split_once(':')
                    .ok_or(ParseError::MissingField("body"))?;
                Command::Publish {
                    topic: topic(topic_name)?,
                    body: body.to_string(),
                }
            }
            "CONSUME" => Command::Consume {
                topic: topic(rest)?,
            },
            "ACKNOWLEDGE" => {
                let (topic_name, id) = rest
                    .split_once(':')
                    .ok_or(ParseError::MissingField("message id"))?;
                Command::Acknowledge {
                    topic: topic(topic_name)?,
                    message_id: message_id(id)?,
                }
            }
            "REQUEUE" => match rest.split_once(':') {
                Some((topic_name, id)) => Command::Requeue {
                    topic: topic(topic_name)?,
                    message_id: Some(message_id(id)?),
                },
                None => Command::Requeue {
                    topic: topic(rest)?,
                    message_id: None,
                },
            },
            other => return Err(ParseError::UnknownAction(other.to_string())),
        };

        Ok(command)
    }
}

fn topic(name: &str) -> Result<String, ParseError> {
    if name.is_empty() {
        return Err(ParseError::EmptyTopic);
    }
    Ok(name.to_string())
}

fn message_id(id: &str) -> Result<u64, ParseError> {
    id.parse()
        .map_err(|_| ParseError::InvalidMessageId(id.to_string()))
}
