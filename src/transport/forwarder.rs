use super::config::TransportConfig;
use crate::input::emitter::ButtonEvent;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const DEFAULT_PORT: u16 = 1883;
const REQUEST_CAPACITY: usize = 100;
const RECONNECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid broker url: {0}")]
    InvalidUrl(String),

    #[error("MQTT client error: {0}")]
    Client(#[from] rumqttc::ClientError),

    #[error("Failed to encode button event: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Transport task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disabled,
    Connecting,
    Connected,
    Failed,
}

/// Splits `host[:port]`, accepting an optional `mqtt://` or `tcp://` scheme.
pub fn parse_broker_url(url: &str) -> Result<(String, u16), TransportError> {
    let trimmed = url.trim();
    let address = trimmed
        .strip_prefix("mqtt://")
        .or_else(|| trimmed.strip_prefix("tcp://"))
        .unwrap_or(trimmed);

    let (host, port) = match address.rsplit_once(':') {
        Some((host, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", url, e)))?;
            (host, port)
        }
        None => (address, DEFAULT_PORT),
    };

    if host.is_empty() {
        return Err(TransportError::InvalidUrl(format!("{}: missing host", url)));
    }
    Ok((host.to_string(), port))
}

pub fn topic_for(prefix: &str, connection_code: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        format!("{}/buttons", connection_code)
    } else {
        format!("{}/{}/buttons", prefix, connection_code)
    }
}

pub fn encode_event(event: &ButtonEvent) -> Result<Vec<u8>, TransportError> {
    Ok(serde_json::to_vec(event)?)
}

/// Publishes button events to the broker until the channel closes or the
/// shutdown token fires.
pub struct EventForwarder {
    config: TransportConfig,
    connection_code: String,
    events: mpsc::Receiver<ButtonEvent>,
    state: watch::Sender<ConnectionState>,
    shutdown: CancellationToken,
}

impl EventForwarder {
    pub fn new(
        config: TransportConfig,
        connection_code: String,
        events: mpsc::Receiver<ButtonEvent>,
        shutdown: CancellationToken,
    ) -> (Self, watch::Receiver<ConnectionState>) {
        let (state, state_rx) = watch::channel(ConnectionState::default());
        (
            Self {
                config,
                connection_code,
                events,
                state,
                shutdown,
            },
            state_rx,
        )
    }

    pub async fn run(self) -> Result<(), TransportError> {
        if self.config.enabled {
            self.forward().await
        } else {
            self.drain().await;
            Ok(())
        }
    }

    async fn drain(mut self) {
        info!("Transport disabled, button events stay local");
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                event = self.events.recv() => match event {
                    Some(event) => debug!("Dropping {:?} event for {}", event.kind, event.name),
                    None => break,
                },
            }
        }
    }

    async fn forward(self) -> Result<(), TransportError> {
        let Self {
            config,
            connection_code,
            mut events,
            state,
            shutdown,
        } = self;
        let (host, port) = parse_broker_url(&config.url)?;
        let topic = topic_for(&config.topic_prefix, &connection_code);

        let mut options = MqttOptions::new(
            format!("virtualpad-{}", connection_code),
            host.clone(),
            port,
        );
        options.set_keep_alive(Duration::from_secs(config.keep_alive_secs.max(1)));
        if !config.user.is_empty() {
            options.set_credentials(config.user, config.pw);
        }

        let (client, eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);
        info!("Forwarding button events to {}:{} on {}", host, port, topic);

        let poll_token = shutdown.child_token();
        let poller = tokio::spawn(poll_connection(eventloop, state, poll_token.clone()));

        let result = loop {
            tokio::select! {
                _ = shutdown.cancelled() => break Ok(()),
                event = events.recv() => {
                    let Some(event) = event else {
                        debug!("Button event channel closed");
                        break Ok(());
                    };
                    let payload = match encode_event(&event) {
                        Ok(payload) => payload,
                        Err(e) => {
                            warn!("Skipping event for {}: {}", event.name, e);
                            continue;
                        }
                    };
                    if let Err(e) = client
                        .publish(topic.as_str(), QoS::AtLeastOnce, false, payload)
                        .await
                    {
                        error!("Failed to publish event for {}: {}", event.name, e);
                        break Err(TransportError::from(e));
                    }
                }
            }
        };

        if let Err(e) = client.try_disconnect() {
            debug!("Disconnect request not queued: {}", e);
        }
        poll_token.cancel();
        poller.await?;
        info!("Event forwarder stopped");
        result
    }
}

async fn poll_connection(
    mut eventloop: EventLoop,
    state: watch::Sender<ConnectionState>,
    token: CancellationToken,
) {
    state.send_replace(ConnectionState::Connecting);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            notification = eventloop.poll() => match notification {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("Connected to broker");
                    state.send_replace(ConnectionState::Connected);
                }
                Ok(notification) => debug!("MQTT: {:?}", notification),
                Err(e) => {
                    warn!("Broker connection error: {}", e);
                    state.send_replace(ConnectionState::Failed);
                    tokio::select! {
                        _ = token.cancelled() => break,
                        _ = tokio::time::sleep(RECONNECT_DELAY) => {
                            state.send_replace(ConnectionState::Connecting);
                        }
                    }
                }
            },
        }
    }
}
