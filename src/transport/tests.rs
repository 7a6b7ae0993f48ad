use crate::broker::Broker;
use crate::transport::command::{Command, ParseError};
use crate::transport::server::dispatch;

#[test]
fn test_parse_subscribe() {
    assert_eq!(
        Command::parse("SUBSCRIBE:news"),
        Ok(Command::Subscribe {
            topic: "news".to_string()
        })
    );
}

#[test]
fn test_parse_unsubscribe() {
    assert_eq!(
        Command::parse("UNSUBSCRIBE:news"),
        Ok(Command::Unsubscribe {
            topic: "news".to_string()
        })
    );
}

#[test]
fn test_parse_publish_body_keeps_colons() {
    assert_eq!(
        Command::parse("PUBLISH:orders:a:b:c"),
        Ok(Command::Publish {
            topic: "orders".to_string(),
            body: "a:b:c".to_string()
        })
    );
}

#[test]
fn test_parse_publish_empty_body() {
    assert_eq!(
        Command::parse("PUBLISH:orders:"),
        Ok(Command::Publish {
            topic: "orders".to_string(),
            body: String::new()
        })
    );
}

#[test]
fn test_parse_acknowledge() {
    assert_eq!(
        Command::parse("ACKNOWLEDGE:orders:42"),
        Ok(Command::Acknowledge {
            topic: "orders".to_string(),
            message_id: 42
        })
    );
}

#[test]
fn test_parse_requeue_forms() {
    assert_eq!(
        Command::parse("REQUEUE:orders"),
        Ok(Command::Requeue {
            topic: "orders".to_string(),
            message_id: None
        })
    );
    assert_eq!(
        Command::parse("REQUEUE:orders:7"),
        Ok(Command::Requeue {
            topic: "orders".to_string(),
            message_id: Some(7)
        })
    );
}

#[test]
fn test_parse_malformed_lines() {
    assert_eq!(Command::parse("HELLO"), Err(ParseError::MissingSeparator));
    assert_eq!(
        Command::parse("SHOUT:news"),
        Err(ParseError::UnknownAction("SHOUT".to_string()))
    );
    assert_eq!(Command::parse("SUBSCRIBE:"), Err(ParseError::EmptyTopic));
    assert_eq!(
        Command::parse("PUBLISH:orders"),
        Err(ParseError::MissingField("body"))
    );
    assert_eq!(
        Command::parse("ACKNOWLEDGE:orders:abc"),
        Err(ParseError::InvalidMessageId("abc".to_string()))
    );
    // Actions are case-sensitive, like the original protocol.
    assert_eq!(
        Command::parse("subscribe:news"),
        Err(ParseError::UnknownAction("subscribe".to_string()))
    );
}

#[test]
fn test_dispatch_subscribe_has_no_response() {
    let broker = Broker::new();
    let response = dispatch(
        &broker,
        "client1",
        Command::Subscribe {
            topic: "news".to_string(),
        },
    );
    assert_eq!(response, None);
}

#[test]
fn test_dispatch_publish_consume_acknowledge() {
    let broker = Broker::new();

    let response = dispatch(
        &broker,
        "producer",
        Command::Publish {
            topic: "orders".to_string(),
            body: "hello".to_string(),
        },
    );
    assert_eq!(response, Some("1".to_string()));

    let response = dispatch(
        &broker,
        "consumer",
        Command::Consume {
            topic: "orders".to_string(),
        },
    );
    assert_eq!(response, Some("1:hello".to_string()));

    let response = dispatch(
        &broker,
        "consumer",
        Command::Acknowledge {
            topic: "orders".to_string(),
            message_id: 1,
        },
    );
    assert_eq!(response, Some("OK".to_string()));

    let response = dispatch(
        &broker,
        "consumer",
        Command::Acknowledge {
            topic: "orders".to_string(),
            message_id: 1,
        },
    );
    assert_eq!(response, Some("NOT_FOUND".to_string()));
}

#[test]
fn test_dispatch_consume_empty_topic() {
    let broker = Broker::new();
    let response = dispatch(
        &broker,
        "consumer",
        Command::Consume {
            topic: "empty-topic".to_string(),
        },
    );
    assert_eq!(response, Some("QUEUE_EMPTY".to_string()));
}

#[test]
fn test_dispatch_acknowledge_foreign_client() {
    let broker = Broker::new();
    broker.publish("orders", "hello".to_string());
    broker.consume("orders", "consumer").unwrap();

    let response = dispatch(
        &broker,
        "intruder",
        Command::Acknowledge {
            topic: "orders".to_string(),
            message_id: 1,
        },
    );
    assert_eq!(response, Some("NOT_FOUND".to_string()));
}

#[test]
fn test_dispatch_requeue_empty() {
    let broker = Broker::new();
    let response = dispatch(
        &broker,
        "consumer",
        Command::Requeue {
            topic: "orders".to_string(),
            message_id: None,
        },
    );
    assert_eq!(response, Some("EMPTY".to_string()));
}

#[test]
fn test_dispatch_requeue_roundtrip() {
    let broker = Broker::new();
    broker.publish("orders", "hello".to_string());
    let message = broker.consume("orders", "consumer").unwrap();

    let response = dispatch(
        &broker,
        "consumer",
        Command::Requeue {
            topic: "orders".to_string(),
            message_id: Some(message.id),
        },
    );
    assert_eq!(response, Some("OK".to_string()));

    let response = dispatch(
        &broker,
        "consumer",
        Command::Requeue {
            topic: "orders".to_string(),
            message_id: None,
        },
    );
    assert_eq!(response, Some("OK".to_string()));

    let response = dispatch(
        &broker,
        "other",
        Command::Consume {
            topic: "orders".to_string(),
        },
    );
    assert_eq!(response, Some("1:hello".to_string()));
}
