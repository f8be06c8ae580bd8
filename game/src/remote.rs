//! Fire-and-forget commands for the set-top box's external control protocol.
//!
//! Requests are queued to one background thread that owns a current-thread tokio runtime and
//! a hyper client; the render loop never waits on the network.

use std::io;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::Empty;
use hyper::{Method, Request};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tokio::sync::mpsc;

use crate::catalog::MediaType;
use crate::settings::RemoteSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteKey {
    Up,
    Down,
    Left,
    Right,
    Select,
    Home,
    Back,
    Play,
}

impl RemoteKey {
    pub fn as_str(self) -> &'static str {
        match self {
            RemoteKey::Up => "Up",
            RemoteKey::Down => "Down",
            RemoteKey::Left => "Left",
            RemoteKey::Right => "Right",
            RemoteKey::Select => "Select",
            RemoteKey::Home => "Home",
            RemoteKey::Back => "Back",
            RemoteKey::Play => "Play",
        }
    }
}

/// Outbound commands. Nothing is returned and nothing is retried.
pub trait RemoteSender {
    fn send_key(&self, key: RemoteKey);
    fn launch_content(&self, channel_id: u32, content_id: &str, media_type: MediaType);
}

/// Drops every command.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledRemote;

impl RemoteSender for DisabledRemote {
    fn send_key(&self, key: RemoteKey) {
        tracing::debug!(key = key.as_str(), "remote disabled, key dropped");
    }

    fn launch_content(&self, channel_id: u32, content_id: &str, _media_type: MediaType) {
        tracing::debug!(channel_id, content_id, "remote disabled, launch dropped");
    }
}

pub fn keypress_url(base: &str, key: RemoteKey) -> String {
    format!("{base}/keypress/{}", key.as_str())
}

/// Deep link into a channel; without a content id the channel just opens.
pub fn launch_url(base: &str, channel_id: u32, content_id: &str, media_type: MediaType) -> String {
    let mut url = format!("{base}/launch/{channel_id}");
    if !content_id.is_empty() {
        url.push_str("?ContentID=");
        url.push_str(&encode_query_value(content_id));
        url.push_str("&MediaType=");
        url.push_str(media_type.as_str());
    }
    url
}

fn encode_query_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for b in raw.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

type HttpClient = Client<HttpConnector, Empty<Bytes>>;

/// Sends commands over HTTP from a background thread.
#[derive(Debug)]
pub struct EcpRemote {
    base: String,
    tx: mpsc::UnboundedSender<String>,
}

impl EcpRemote {
    pub fn start(host: &str, port: u16, timeout: Duration) -> io::Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel::<String>();

        // Built before spawning so setup errors reach the caller.
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("remote-dispatch".to_string())
            .spawn(move || rt.block_on(dispatch(rx, timeout)))?;

        Ok(Self {
            base: format!("http://{host}:{port}"),
            tx,
        })
    }

    fn queue(&self, url: String) {
        tracing::debug!(%url, "remote command queued");
        if self.tx.send(url).is_err() {
            tracing::debug!("remote dispatcher has stopped");
        }
    }
}

impl RemoteSender for EcpRemote {
    fn send_key(&self, key: RemoteKey) {
        self.queue(keypress_url(&self.base, key));
    }

    fn launch_content(&self, channel_id: u32, content_id: &str, media_type: MediaType) {
        self.queue(launch_url(&self.base, channel_id, content_id, media_type));
    }
}

async fn dispatch(mut rx: mpsc::UnboundedReceiver<String>, timeout: Duration) {
    let client: HttpClient = Client::builder(TokioExecutor::new()).build_http();
    while let Some(url) = rx.recv().await {
        let client = client.clone();
        tokio::spawn(async move { post(&client, &url, timeout).await });
    }
}

async fn post(client: &HttpClient, url: &str, timeout: Duration) {
    let request = match Request::builder()
        .method(Method::POST)
        .uri(url)
        .body(Empty::<Bytes>::new())
    {
        Ok(request) => request,
        Err(err) => {
            tracing::debug!(%err, %url, "invalid remote url");
            return;
        }
    };

    match tokio::time::timeout(timeout, client.request(request)).await {
        Ok(Ok(response)) => {
            tracing::debug!(%url, status = %response.status(), "remote command sent")
        }
        Ok(Err(err)) => tracing::debug!(%err, %url, "remote command failed"),
        Err(_) => tracing::debug!(%url, "remote command timed out"),
    }
}

/// The sender the settings ask for; falls back to [`DisabledRemote`] if the dispatcher cannot
/// start.
pub fn from_settings(settings: &RemoteSettings) -> Rc<dyn RemoteSender> {
    if !settings.enabled {
        tracing::info!("remote control disabled");
        return Rc::new(DisabledRemote);
    }
    match EcpRemote::start(&settings.host, settings.port, settings.timeout()) {
        Ok(remote) => {
            tracing::info!(host = %settings.host, port = settings.port, "remote control enabled");
            Rc::new(remote)
        }
        Err(err) => {
            tracing::warn!(%err, "remote dispatcher failed to start");
            Rc::new(DisabledRemote)
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Sent {
        Key(RemoteKey),
        Launch {
            channel_id: u32,
            content_id: String,
            media_type: MediaType,
        },
    }

    /// Remembers what it was asked to send.
    #[derive(Debug, Default)]
    pub struct RecordingRemote {
        pub sent: RefCell<Vec<Sent>>,
    }

    impl RemoteSender for RecordingRemote {
        fn send_key(&self, key: RemoteKey) {
            self.sent.borrow_mut().push(Sent::Key(key));
        }

        fn launch_content(&self, channel_id: u32, content_id: &str, media_type: MediaType) {
            self.sent.borrow_mut().push(Sent::Launch {
                channel_id,
                content_id: content_id.to_string(),
                media_type,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::time::Instant;

    use super::*;

    #[test]
    fn keypress_url_uses_key_name() {
        assert_eq!(
            keypress_url("http://10.0.0.60:8060", RemoteKey::Select),
            "http://10.0.0.60:8060/keypress/Select"
        );
    }

    #[test]
    fn launch_url_carries_content_and_media_type() {
        assert_eq!(
            launch_url("http://h:1", 12, "81975233", MediaType::Series),
            "http://h:1/launch/12?ContentID=81975233&MediaType=series"
        );
        assert_eq!(
            launch_url("http://h:1", 5, "a b&c", MediaType::Movie),
            "http://h:1/launch/5?ContentID=a%20b%26c&MediaType=movie"
        );
    }

    #[test]
    fn launch_url_without_content_only_opens_channel() {
        assert_eq!(launch_url("http://h:1", 7, "", MediaType::Movie), "http://h:1/launch/7");
    }

    #[test]
    fn disabled_settings_give_a_silent_sender() {
        let remote = from_settings(&RemoteSettings::default());
        remote.send_key(RemoteKey::Home);
        remote.launch_content(1, "x", MediaType::Movie);
    }

    #[test]
    fn ecp_remote_posts_keypress() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let port = listener.local_addr().unwrap().port();

        let remote = EcpRemote::start("127.0.0.1", port, Duration::from_secs(2)).unwrap();
        remote.send_key(RemoteKey::Home);

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut stream = loop {
            match listener.accept() {
                Ok((stream, _)) => break stream,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    assert!(Instant::now() < deadline, "no request arrived");
                    thread::sleep(Duration::from_millis(10));
                }
                Err(err) => panic!("accept failed: {err}"),
            }
        };
        stream.set_nonblocking(false).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 512];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            assert!(n > 0, "connection closed early");
            request.extend_from_slice(&buf[..n]);
        }
        stream
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\n\r\n")
            .unwrap();

        let text = String::from_utf8_lossy(&request);
        assert!(
            text.starts_with("POST /keypress/Home HTTP/1.1\r\n"),
            "unexpected request: {text}"
        );
    }
}
