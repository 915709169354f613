#![allow(dead_code)]

use bond_dns_infrastructure::relay::RelayEvent;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

/// What the stub relay does after receiving a `REQ`.
#[derive(Clone, Default)]
pub struct RelayScript {
    pub events: Vec<RelayEvent>,
    /// Raw frames sent before the events.
    pub raw_frames: Vec<String>,
    /// Send `EOSE` after the events; otherwise keep the socket open.
    pub eose: bool,
}

impl RelayScript {
    pub fn events(events: Vec<RelayEvent>) -> Self {
        Self {
            events,
            raw_frames: vec![],
            eose: true,
        }
    }
}

/// In-process NIP-01 relay over websocket.
pub struct RelayStub {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<Value>>>,
    closes: Arc<Mutex<usize>>,
    task: JoinHandle<()>,
}

impl RelayStub {
    pub async fn start(script: RelayScript) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let closes = Arc::new(Mutex::new(0));

        let task = {
            let requests = Arc::clone(&requests);
            let closes = Arc::clone(&closes);
            tokio::spawn(async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let script = script.clone();
                    let requests = Arc::clone(&requests);
                    let closes = Arc::clone(&closes);
                    tokio::spawn(async move {
                        let Ok(mut ws) = accept_async(stream).await else {
                            return;
                        };
                        while let Some(Ok(message)) = ws.next().await {
                            let Message::Text(text) = message else {
                                continue;
                            };
                            let frame: Value = serde_json::from_str(&text).unwrap();
                            match frame[0].as_str() {
                                Some("REQ") => {
                                    let sub = frame[1].as_str().unwrap().to_string();
                                    requests.lock().unwrap().push(frame.clone());
                                    for raw in &script.raw_frames {
                                        let raw = raw.replace("{sub}", &sub);
                                        let _ = ws.send(Message::Text(raw)).await;
                                    }
                                    for event in &script.events {
                                        let out = serde_json::json!(["EVENT", sub, event]);
                                        let _ = ws.send(Message::Text(out.to_string())).await;
                                    }
                                    if script.eose {
                                        let out = serde_json::json!(["EOSE", sub]);
                                        let _ = ws.send(Message::Text(out.to_string())).await;
                                    }
                                }
                                Some("CLOSE") => {
                                    *closes.lock().unwrap() += 1;
                                }
                                _ => {}
                            }
                        }
                    });
                }
            })
        };

        Self {
            addr,
            requests,
            closes,
            task,
        }
    }

    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    pub fn closes(&self) -> usize {
        *self.closes.lock().unwrap()
    }
}

impl Drop for RelayStub {
    fn drop(&mut self) {
        self.task.abort();
    }
}
