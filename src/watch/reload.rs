// src/watch/reload.rs

//! Local websocket channel that tells connected browser clients to refresh.
//!
//! The browser side is out of scope; this end only broadcasts the
//! JSON-serialized [`RebuildComplete`] payload to whoever is connected. Plain
//! blocking sockets on dedicated threads keep this independent of the async
//! runtime.

use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tracing::{debug, warn};
use tungstenite::WebSocket;

use crate::watch::watcher::RebuildComplete;

/// Broadcasts rebuild notifications to connected websocket clients.
///
/// Lives for the process lifetime; dropping it closes the broadcast channel.
pub struct ReloadServer {
    tx: Sender<String>,
    port: u16,
}

impl ReloadServer {
    /// Bind the preferred port, falling back to an ephemeral one when taken,
    /// and spawn the accept and broadcast threads.
    pub fn start(preferred_port: u16) -> Result<Self> {
        let listener = match TcpListener::bind(("127.0.0.1", preferred_port)) {
            Ok(sock) => sock,
            Err(_) => TcpListener::bind("127.0.0.1:0")
                .context("binding live-reload websocket port")?,
        };
        let port = listener
            .local_addr()
            .context("resolving live-reload socket address")?
            .port();

        let clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>> = Arc::new(Mutex::new(Vec::new()));
        spawn_accept_thread(listener, clients.clone());
        let tx = spawn_broadcast_thread(clients);

        Ok(Self { tx, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Fan a rebuild notification out to all connected clients.
    pub fn notify(&self, note: &RebuildComplete) {
        match serde_json::to_string(note) {
            Ok(payload) => {
                let _ = self.tx.send(payload);
            }
            Err(err) => warn!(error = %err, "failed to serialize reload payload"),
        }
    }
}

fn spawn_accept_thread(listener: TcpListener, clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>>) {
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(err) => {
                    warn!(error = %err, "reload client connection failed");
                    continue;
                }
            };
            match tungstenite::accept(stream) {
                Ok(socket) => {
                    debug!("reload client connected");
                    clients.lock().expect("reload client list poisoned").push(socket);
                }
                Err(err) => warn!(error = %err, "websocket handshake failed"),
            }
        }
    });
}

fn spawn_broadcast_thread(clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>>) -> Sender<String> {
    let (tx, rx) = std::sync::mpsc::channel::<String>();

    std::thread::spawn(move || {
        while let Ok(payload) = rx.recv() {
            let mut clients = clients.lock().expect("reload client list poisoned");
            let mut broken = Vec::new();

            for (i, socket) in clients.iter_mut().enumerate() {
                match socket.send(payload.clone().into()) {
                    Ok(()) => {}
                    Err(tungstenite::error::Error::Io(err))
                        if err.kind() == std::io::ErrorKind::BrokenPipe =>
                    {
                        broken.push(i);
                    }
                    Err(err) => warn!(error = %err, "reload broadcast failed"),
                }
            }

            for i in broken.into_iter().rev() {
                clients.remove(i);
                debug!("pruned disconnected reload client");
            }
        }
    });

    tx
}
