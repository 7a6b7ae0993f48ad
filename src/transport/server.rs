//! TCP transport
//!
//! This file implements the line-protocol server that translates client
//! commands into broker operations. Responsibilities:
//! - Accept TCP connections and assign each one a client id
//! - Read one command per line, parse it, and forward it to the `Broker`
//! - Write the response line back, where the command has one
//! - Treat a disconnect as an implicit unsubscribe from every topic, while
//!   leaving that client's in-flight messages in the pending log
//!
//! Malformed lines are ignored (no response, connection stays open); the
//! parse failure is logged at debug level. A failure on one connection only
//! ever terminates that one session.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::broker::Broker;
use crate::transport::command::Command;

pub async fn start_server(addr: &str, broker: Arc<Broker>) {
    let listener = TcpListener::bind(addr).await.expect("Can't bind");

    info!("Broker listening on {addr}");

    while let Ok((stream, _)) = listener.accept().await {
        let broker = broker.clone();
        let client_id = format!("client-{}", uuid::Uuid::new_v4());

        tokio::spawn(async move {
            info!("{client_id} connected");
            if let Err(e) = handle_connection(stream, &broker, &client_id).await {
                warn!("Session {client_id} ended with error: {e}");
            }
            info!("{client_id} disconnected");
            broker.disconnect(&client_id);
        });
    }

    error!("Accept loop exited");
}

async fn handle_connection(
    stream: TcpStream,
    broker: &Broker,
    client_id: &str,
) -> std::io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Ok(command) => {
                if let Some(response) = dispatch(broker, client_id, command) {
                    writer.write_all(response.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                }
            }
            Err(e) => {
                // Matches the original protocol: bad lines get no reply.
                debug!("Ignoring malformed command from {client_id}: {e}");
            }
        }
    }

    Ok(())
}

/// Map one parsed command onto one broker call and render the response
/// line, if the command has one.
pub(crate) fn dispatch(broker: &Broker, client_id: &str, command: Command) -> Option<String> {
    match command {
        Command::Subscribe { topic } => {
            broker.subscribe(&topic, client_id);
            info!("{client_id} subscribed to {topic}");
            None
        }
        Command::Unsubscribe { topic } => {
            broker.unsubscribe(&topic, client_id);
            info!("{client_id} unsubscribed from {topic}");
            None
        }
        Command::Publish { topic, body } => {
            let id = broker.publish(&topic, body);
            info!("{client_id} published message {id} to {topic}");
            Some(id.to_string())
        }
        Command::Consume { topic } => match broker.consume(&topic, client_id) {
            Some(message) => {
                info!("{client_id} consumed message {} from {topic}", message.id);
                Some(format!("{}:{}", message.id, message.body))
            }
            None => Some("QUEUE_EMPTY".to_string()),
        },
        Command::Acknowledge { topic, message_id } => {
            match broker.acknowledge(&topic, message_id, client_id) {
                Ok(()) => {
                    info!("{client_id} acknowledged message {message_id} on {topic}");
                    Some("OK".to_string())
                }
                Err(_) => Some("NOT_FOUND".to_string()),
            }
        }
        Command::Requeue { topic, message_id } => match broker.requeue(&topic, message_id) {
            Ok(()) => {
                info!("{client_id} requeued on {topic}");
                Some("OK".to_string())
            }
            Err(_) => Some("EMPTY".to_string()),
        },
    }
}
