//! Remote control session
//!
//! Polls the remote link for one inbound token at a time, echoes it back and
//! parses it. Outbound notifications go through the same session. Any send or
//! receive failure drops the client; until the transport reports a new
//! connection the robot behaves as if there were no remote at all.

use crate::system::board::RemoteLink;
use crate::system::event::Event;
use crate::system::remote_command::RemoteCommand;

#[derive(Debug, Default)]
pub struct RemoteSession {
    connected: bool,
}

impl RemoteSession {
    pub const fn new() -> Self {
        Self { connected: false }
    }

    /// Takes at most one inbound token, echoes it and returns the parsed command
    pub fn poll<L: RemoteLink>(&mut self, link: &mut L) -> Option<RemoteCommand> {
        if !self.check_connection(link) {
            return None;
        }

        let message = match link.receive() {
            Ok(Some(message)) => message,
            Ok(None) => return None,
            Err(err) => {
                warn!("remote receive failed: {:?}", err);
                self.drop_link(link);
                return None;
            }
        };

        let token = message.trim();
        self.send(link, token);
        let command = RemoteCommand::parse(token);
        info!("remote command {:?}", command);
        Some(command)
    }

    /// Sends a notification if a client is attached
    pub fn notify<L: RemoteLink>(&mut self, link: &mut L, event: Event<'_>) {
        self.send(link, event.render().as_str());
    }

    fn send<L: RemoteLink>(&mut self, link: &mut L, message: &str) {
        if !self.check_connection(link) {
            return;
        }
        if let Err(err) = link.send(message) {
            warn!("remote send failed: {:?}", err);
            self.drop_link(link);
        }
    }

    /// Tracks connection changes reported by the transport
    fn check_connection<L: RemoteLink>(&mut self, link: &L) -> bool {
        let connected = link.is_connected();
        if connected != self.connected {
            if connected {
                info!("remote connected");
            } else {
                info!("remote disconnected");
            }
            self.connected = connected;
        }
        connected
    }

    fn drop_link<L: RemoteLink>(&mut self, link: &mut L) {
        link.close();
        self.connected = false;
    }
}
