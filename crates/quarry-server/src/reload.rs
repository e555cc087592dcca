//! WebSocket-based live reload.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Path of the reload WebSocket.
pub const RELOAD_PATH: &str = "/__reload";

/// Path of the reload client script.
pub const RELOAD_SCRIPT_PATH: &str = "/__reload.js";

/// Messages sent to connected browsers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReloadMessage {
    /// Full page reload
    Reload,

    /// Stylesheet changed; swap it without reloading
    ReloadStyles,

    /// The content file no longer loads; the page keeps the last good version
    ContentError { message: String },

    /// Connection established
    Connected,
}

/// Hub for broadcasting reload messages to all connected browsers.
#[derive(Debug, Clone)]
pub struct ReloadHub {
    sender: broadcast::Sender<ReloadMessage>,
}

impl ReloadHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a message to all connected browsers.
    pub fn send(&self, msg: ReloadMessage) {
        // No receivers is fine
        let _ = self.sender.send(msg);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReloadMessage> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ReloadHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Browser side of the reload channel. Connects back to whichever host served the page.
pub fn reload_client_script() -> String {
    format!(
        r#"
(function() {{
  'use strict';

  var scheme = location.protocol === 'https:' ? 'wss://' : 'ws://';
  var ws = new WebSocket(scheme + location.host + '{path}');
  var attempts = 0;

  ws.onopen = function() {{
    attempts = 0;
  }};

  ws.onmessage = function(event) {{
    var msg = JSON.parse(event.data);

    switch (msg.type) {{
      case 'reload':
        location.reload();
        break;

      case 'reload_styles':
        document.querySelectorAll('link[rel="stylesheet"]').forEach(function(link) {{
          var url = new URL(link.href);
          url.searchParams.set('t', Date.now());
          link.href = url.toString();
        }});
        break;

      case 'content_error':
        console.error('[quarry] ' + msg.message);
        break;

      case 'connected':
        console.log('[quarry] Live reload connected');
        break;
    }}
  }};

  ws.onclose = function() {{
    if (attempts < 10) {{
      attempts++;
      setTimeout(function() {{ location.reload(); }}, 1000 * attempts);
    }}
  }};
}})();
"#,
        path = RELOAD_PATH
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hub_broadcasts_messages() {
        let hub = ReloadHub::new();
        let mut rx = hub.subscribe();

        hub.send(ReloadMessage::Reload);

        match rx.try_recv() {
            Ok(ReloadMessage::Reload) => {}
            other => panic!("Expected Reload message, got {:?}", other),
        }
    }

    #[test]
    fn send_without_subscribers_is_ignored() {
        let hub = ReloadHub::new();
        assert_eq!(hub.subscriber_count(), 0);
        hub.send(ReloadMessage::ReloadStyles);
    }

    #[test]
    fn serializes_messages() {
        let msg = ReloadMessage::ContentError {
            message: "Profile lists no services".to_string(),
        };

        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r#"{"type":"content_error","message":"Profile lists no services"}"#
        );
        assert_eq!(
            serde_json::to_string(&ReloadMessage::ReloadStyles).unwrap(),
            r#"{"type":"reload_styles"}"#
        );
    }

    #[test]
    fn client_uses_page_host() {
        let script = reload_client_script();
        assert!(script.contains("location.host + '/__reload'"));
        assert!(script.contains("'reload_styles'"));
    }
}
